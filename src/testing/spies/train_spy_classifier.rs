use crate::classifiers::Classifier;
use crate::core::FeatureRow;
use crate::error::Result;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct TrainSpyHandle(Arc<AtomicU64>);
impl TrainSpyHandle {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counts `train` calls and answers every query with a fixed probability.
pub struct TrainSpyClassifier {
    count: Arc<AtomicU64>,
    probability: f64,
}

impl TrainSpyClassifier {
    pub fn new(probability: f64) -> (Self, TrainSpyHandle) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                count: counter.clone(),
                probability,
            },
            TrainSpyHandle(counter),
        )
    }
}

impl Classifier for TrainSpyClassifier {
    fn train(&mut self, _rows: &[FeatureRow], _labels: &[bool]) -> Result<()> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn get_votes_for_instance(&self, _row: &FeatureRow) -> Vec<f64> {
        vec![1.0 - self.probability, self.probability]
    }
}
