mod holdout;
pub mod metrics;

pub use holdout::{HoldoutReport, evaluate_holdout};
pub use metrics::{accuracy, roc_auc};
