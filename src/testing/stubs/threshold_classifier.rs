use crate::classifiers::Classifier;
use crate::core::FeatureRow;
use crate::error::Result;

/// Uses one (normalized) feature directly as the positive-class probability.
pub struct ThresholdClassifier {
    feature: usize,
}

impl ThresholdClassifier {
    pub fn new(feature: usize) -> Self {
        Self { feature }
    }
}

impl Classifier for ThresholdClassifier {
    fn train(&mut self, _rows: &[FeatureRow], _labels: &[bool]) -> Result<()> {
        Ok(())
    }

    fn get_votes_for_instance(&self, row: &FeatureRow) -> Vec<f64> {
        let p = row[self.feature].clamp(0.0, 1.0);
        vec![1.0 - p, p]
    }
}
