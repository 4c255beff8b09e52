#[allow(clippy::module_inception)]
pub mod random_forest;

pub use random_forest::{RandomForest, balanced_class_weights};
