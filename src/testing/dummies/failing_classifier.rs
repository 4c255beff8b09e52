use crate::classifiers::Classifier;
use crate::core::FeatureRow;
use crate::error::{DonorError, Result};

#[derive(Default)]
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn train(&mut self, _rows: &[FeatureRow], _labels: &[bool]) -> Result<()> {
        Err(DonorError::EmptyDataset("stub training partition".into()))
    }

    fn get_votes_for_instance(&self, _row: &FeatureRow) -> Vec<f64> {
        Vec::new()
    }
}
