/// Arena-allocated tree node. Children are indices into the owning tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Normalized class distribution `[negative, positive]`.
        distribution: [f64; 2],
    },
}

impl Node {
    pub fn leaf_from_weights(weights: [f64; 2]) -> Node {
        let total = weights[0] + weights[1];
        let distribution = if total > 0.0 {
            [weights[0] / total, weights[1] / total]
        } else {
            [0.5, 0.5]
        };
        Node::Leaf { distribution }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}
