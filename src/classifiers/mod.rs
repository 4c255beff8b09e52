pub mod classifier;
pub mod decision_tree;
pub mod random_forest;

pub use classifier::{Classifier, DECISION_THRESHOLD};
pub use decision_tree::DecisionTree;
pub use random_forest::RandomForest;
