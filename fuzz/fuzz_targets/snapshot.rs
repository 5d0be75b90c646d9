#![no_main]

use hll_cardinality::{CardinalityEstimator, Murmur3};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut estimator) = CardinalityEstimator::<Murmur3>::from_bytes(data) {
        assert_eq!(estimator.to_bytes(), data);
        estimator.add(b"1");
        // saturated registers push the estimate past the 32-bit hash space
        let estimate = estimator.estimate();
        assert!(estimate > 0.0 || estimate.is_nan(), "estimate = {estimate}");
    }
});
