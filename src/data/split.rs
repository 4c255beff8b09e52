use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::core::DonationRecord;
use crate::error::{DonorError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub train: Vec<DonationRecord>,
    pub test: Vec<DonationRecord>,
}

/// Stratified holdout split: each class gives `round(n_c * test_size)` rows to
/// the holdout, but always keeps at least one row in training. Both partitions
/// keep the input order.
pub fn stratified_split(
    records: &[DonationRecord],
    test_size: f64,
    seed: u64,
) -> Result<Partition> {
    if records.len() < 2 {
        return Err(DonorError::EmptyDataset(format!(
            "dataset with {} record(s)",
            records.len()
        )));
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DonorError::Config(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut in_test = vec![false; records.len()];
    for class in [false, true] {
        let mut idx: Vec<usize> = (0..records.len())
            .filter(|&i| records[i].target == class)
            .collect();
        idx.shuffle(&mut rng);
        let n_test = ((idx.len() as f64 * test_size).round() as usize)
            .min(idx.len().saturating_sub(1));
        for &i in &idx[..n_test] {
            in_test[i] = true;
        }
    }

    let (test, train): (Vec<_>, Vec<_>) = records
        .iter()
        .zip(&in_test)
        .partition(|(_, t)| **t);
    let partition = Partition {
        train: train.into_iter().map(|(r, _)| *r).collect(),
        test: test.into_iter().map(|(r, _)| *r).collect(),
    };

    if partition.test.is_empty() {
        return Err(DonorError::EmptyDataset("holdout partition".into()));
    }
    Ok(partition)
}
