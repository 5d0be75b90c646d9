use hll_cardinality::{CardinalityEstimator, Murmur3};

fn main() -> Result<(), hll_cardinality::Error> {
    let mut estimator1 = CardinalityEstimator::<Murmur3>::new(12)?;
    for i in 0..10u32 {
        estimator1.add(&i.to_le_bytes());
    }
    println!("estimator1 estimate = {:.2}", estimator1.estimate());

    let mut estimator2 = CardinalityEstimator::<Murmur3>::new(12)?;
    for i in 10..15u32 {
        estimator2.add(&i.to_le_bytes());
    }
    println!("estimator2 estimate = {:.2}", estimator2.estimate());

    estimator1.merge(&estimator2)?;
    println!("merged estimate = {:.2}", estimator1.estimate());

    let mut snapshot = Vec::new();
    estimator1.dump(&mut snapshot)?;
    let restored = CardinalityEstimator::<Murmur3>::restore(&mut snapshot.as_slice())?;
    println!(
        "restored estimate = {:.2} from {} snapshot bytes",
        restored.estimate(),
        snapshot.len()
    );

    Ok(())
}
