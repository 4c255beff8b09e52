use crate::core::FeatureRow;
use crate::error::Result;

/// Fixed probability cut-off for the boolean "will donate again" verdict.
pub const DECISION_THRESHOLD: f64 = 0.5;

pub trait Classifier {
    fn train(&mut self, rows: &[FeatureRow], labels: &[bool]) -> Result<()>;

    /// Class votes `[negative, positive]`; empty when the model has not been trained.
    fn get_votes_for_instance(&self, row: &FeatureRow) -> Vec<f64>;

    fn predict_proba(&self, row: &FeatureRow) -> f64 {
        let votes = self.get_votes_for_instance(row);
        if votes.len() < 2 {
            return 0.0;
        }
        let total: f64 = votes.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        (votes[1] / total).clamp(0.0, 1.0)
    }

    fn predict(&self, row: &FeatureRow) -> bool {
        self.predict_proba(row) >= DECISION_THRESHOLD
    }

    fn name(&self) -> &str {
        "classifier"
    }
}
