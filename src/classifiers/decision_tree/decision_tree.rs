use log::trace;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::classifiers::Classifier;
use crate::classifiers::decision_tree::node::Node;
use crate::classifiers::decision_tree::split_criteria::{GiniSplitCriterion, SplitCriterion};
use crate::core::{FEATURE_COUNT, FeatureRow};
use crate::error::{DonorError, Result};

/// Feature values closer than this are treated as equal when placing thresholds.
const FEATURE_THRESHOLD: f64 = 1e-7;
const IMPURITY_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Non-constant features examined per split.
    pub max_features: usize,
    pub seed: u64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            max_features: FEATURE_COUNT,
            seed: 42,
        }
    }
}

/// CART classification tree over the four donor features, grown with Gini
/// impurity and per-sample weights.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    params: TreeParams,
    nodes: Vec<Node>,
    depth: usize,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    merit: f64,
}

struct TreeBuilder<'a> {
    rows: &'a [FeatureRow],
    labels: &'a [bool],
    weights: &'a [f64],
    params: TreeParams,
    criterion: GiniSplitCriterion,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
    depth: usize,
}

impl DecisionTree {
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            nodes: Vec::new(),
            depth: 0,
        }
    }

    /// Grow the tree on the rows with a positive weight. A bootstrap sample is
    /// expressed as integer draw counts in `weights`, scaled by class weights.
    pub fn fit_weighted(
        &mut self,
        rows: &[FeatureRow],
        labels: &[bool],
        weights: &[f64],
        rng: &mut StdRng,
    ) -> Result<()> {
        if rows.len() != labels.len() || rows.len() != weights.len() {
            return Err(DonorError::ShapeMismatch {
                rows: rows.len(),
                labels: labels.len().min(weights.len()),
            });
        }

        let indices: Vec<usize> = (0..rows.len()).filter(|&i| weights[i] > 0.0).collect();
        if indices.is_empty() {
            return Err(DonorError::EmptyDataset("tree training sample".into()));
        }

        let mut builder = TreeBuilder {
            rows,
            labels,
            weights,
            params: self.params,
            criterion: GiniSplitCriterion::new(),
            rng,
            nodes: Vec::new(),
            depth: 0,
        };
        builder.build(indices, 0);

        self.nodes = builder.nodes;
        self.depth = builder.depth;
        trace!(
            "grew tree with {} nodes, depth {}",
            self.nodes.len(),
            self.depth
        );
        Ok(())
    }

    /// Class distribution of the leaf `row` falls into, or `None` if untrained.
    pub fn leaf_distribution(&self, row: &FeatureRow) -> Option<[f64; 2]> {
        let mut id = 0;
        loop {
            match self.nodes.get(id)? {
                Node::Leaf { distribution } => return Some(*distribution),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }
}

impl Classifier for DecisionTree {
    fn train(&mut self, rows: &[FeatureRow], labels: &[bool]) -> Result<()> {
        let weights = vec![1.0; rows.len()];
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.fit_weighted(rows, labels, &weights, &mut rng)
    }

    fn get_votes_for_instance(&self, row: &FeatureRow) -> Vec<f64> {
        self.leaf_distribution(row)
            .map(|d| d.to_vec())
            .unwrap_or_default()
    }

    fn name(&self) -> &str {
        "decision-tree"
    }
}

impl TreeBuilder<'_> {
    fn class_weights(&self, indices: &[usize]) -> [f64; 2] {
        let mut dist = [0.0; 2];
        for &i in indices {
            dist[usize::from(self.labels[i])] += self.weights[i];
        }
        dist
    }

    fn push_leaf(&mut self, dist: [f64; 2], depth: usize) -> usize {
        self.depth = self.depth.max(depth);
        self.nodes.push(Node::leaf_from_weights(dist));
        self.nodes.len() - 1
    }

    fn build(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let dist = self.class_weights(&indices);
        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        if depth_reached
            || indices.len() < self.params.min_samples_split
            || self.criterion.impurity(&dist) <= IMPURITY_EPS
        {
            return self.push_leaf(dist, depth);
        }

        let Some(split) = self.find_best_split(&indices, &dist) else {
            return self.push_leaf(dist, depth);
        };

        let rows = self.rows;
        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| rows[i][split.feature] <= split.threshold);

        // reserve the parent slot so the root stays at index 0
        let id = self.nodes.len();
        self.nodes.push(Node::leaf_from_weights(dist));
        let left = self.build(left_idx, depth + 1);
        let right = self.build(right_idx, depth + 1);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn find_best_split(&mut self, indices: &[usize], parent: &[f64; 2]) -> Option<SplitCandidate> {
        let rows = self.rows;
        let mut features: Vec<usize> = (0..FEATURE_COUNT).collect();
        features.shuffle(&mut *self.rng);

        let mut sorted = indices.to_vec();
        let mut best: Option<SplitCandidate> = None;
        let mut visited = 0;

        for f in features {
            // keep looking past max_features until some valid split exists
            if visited >= self.params.max_features && best.is_some() {
                break;
            }

            sorted.sort_by(|&a, &b| rows[a][f].total_cmp(&rows[b][f]));
            let lo = rows[sorted[0]][f];
            let hi = rows[sorted[sorted.len() - 1]][f];
            if hi - lo <= FEATURE_THRESHOLD {
                // constant inside this node; does not count towards max_features
                continue;
            }
            visited += 1;

            let mut left = [0.0; 2];
            for k in 0..sorted.len() - 1 {
                let i = sorted[k];
                left[usize::from(self.labels[i])] += self.weights[i];

                let v = rows[i][f];
                let next = rows[sorted[k + 1]][f];
                if next - v <= FEATURE_THRESHOLD {
                    continue;
                }

                let right = [
                    (parent[0] - left[0]).max(0.0),
                    (parent[1] - left[1]).max(0.0),
                ];
                let merit = self.criterion.get_merit_of_split(parent, &[left, right]);
                if best.is_none_or(|b| merit > b.merit) {
                    let mut threshold = v + (next - v) / 2.0;
                    if threshold >= next {
                        threshold = v;
                    }
                    best = Some(SplitCandidate {
                        feature: f,
                        threshold,
                        merit,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<FeatureRow>, Vec<bool>) {
        let rows = vec![
            [0.1, 0.5, 0.5, 0.5],
            [0.2, 0.4, 0.5, 0.5],
            [0.3, 0.6, 0.5, 0.5],
            [0.7, 0.5, 0.5, 0.5],
            [0.8, 0.4, 0.5, 0.5],
            [0.9, 0.6, 0.5, 0.5],
        ];
        let labels = vec![true, true, true, false, false, false];
        (rows, labels)
    }

    #[test]
    fn learns_a_single_threshold() {
        let (rows, labels) = separable();
        let mut tree = DecisionTree::new(TreeParams::default());
        tree.train(&rows, &labels).unwrap();

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.leaf_distribution(&[0.15, 0.5, 0.5, 0.5]), Some([0.0, 1.0]));
        assert_eq!(tree.leaf_distribution(&[0.85, 0.5, 0.5, 0.5]), Some([1.0, 0.0]));
        // threshold sits halfway between 0.3 and 0.7
        assert!(tree.predict(&[0.49, 0.0, 0.0, 0.0]));
        assert!(!tree.predict(&[0.51, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn fully_grown_tree_fits_training_data() {
        let rows = vec![
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0],
        ];
        let labels = vec![false, true, true, false];
        let mut tree = DecisionTree::new(TreeParams::default());
        tree.train(&rows, &labels).unwrap();
        for (r, y) in rows.iter().zip(&labels) {
            assert_eq!(tree.predict(r), *y);
        }
    }

    #[test]
    fn max_depth_limits_growth() {
        let rows = vec![
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0],
        ];
        let labels = vec![false, true, true, false];
        let params = TreeParams {
            max_depth: Some(1),
            ..TreeParams::default()
        };
        let mut tree = DecisionTree::new(params);
        tree.train(&rows, &labels).unwrap();
        assert_eq!(tree.depth(), 1);
        let d = tree.leaf_distribution(&[0.0, 0.0, 0.0, 0.0]).unwrap();
        assert!((d[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn single_class_yields_one_leaf() {
        let rows = vec![[0.1, 0.2, 0.3, 0.4], [0.5, 0.6, 0.7, 0.8]];
        let mut tree = DecisionTree::new(TreeParams::default());
        tree.train(&rows, &[true, true]).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_proba(&[0.9, 0.9, 0.9, 0.9]), 1.0);
    }

    #[test]
    fn zero_weight_rows_are_ignored() {
        let (rows, mut labels) = separable();
        // flip a label on a row that carries no weight
        labels[0] = false;
        let weights = vec![0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let mut tree = DecisionTree::new(TreeParams::default());
        let mut rng = StdRng::seed_from_u64(1);
        tree.fit_weighted(&rows, &labels, &weights, &mut rng).unwrap();
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn untrained_tree_has_no_votes() {
        let tree = DecisionTree::new(TreeParams::default());
        assert!(tree.get_votes_for_instance(&[0.0; 4]).is_empty());
        assert_eq!(tree.predict_proba(&[0.0; 4]), 0.0);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut tree = DecisionTree::new(TreeParams::default());
        let err = tree.train(&[[0.0; 4]], &[true, false]).unwrap_err();
        assert!(matches!(err, DonorError::ShapeMismatch { .. }));
    }
}
