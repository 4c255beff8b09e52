#[allow(clippy::module_inception)]
pub mod decision_tree;
pub mod node;
pub mod split_criteria;

pub use decision_tree::{DecisionTree, TreeParams};
pub use node::Node;
