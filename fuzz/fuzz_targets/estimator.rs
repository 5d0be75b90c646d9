#![no_main]

use hll_cardinality::{CardinalityEstimator, Murmur3};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);
    let precision = 4 + data[0] % 13;

    let mut estimator1 = CardinalityEstimator::<Murmur3>::new(precision).unwrap();
    for chunk in first_half.chunks(4) {
        estimator1.add(chunk);
        assert!(estimator1.estimate() > 0.0);
    }

    let mut estimator2 = CardinalityEstimator::<Murmur3>::new(precision).unwrap();
    for chunk in second_half.chunks(4) {
        estimator2.add(chunk);
        assert!(estimator2.estimate() > 0.0);
    }

    let rhs_before = estimator2.clone();
    estimator1.merge(&estimator2).unwrap();
    assert_eq!(estimator2, rhs_before);

    let restored = CardinalityEstimator::<Murmur3>::from_bytes(&estimator1.to_bytes()).unwrap();
    assert_eq!(restored, estimator1);

    estimator1.clear();
    assert_eq!(estimator1.estimate(), 0.0);
});
