//! Bagged ensemble of [`DecisionTree`]s.
//!
//! Each tree sees its own bootstrap sample and draws its split features from
//! its own seeded RNG; the tree seeds come from a single forest RNG, so a
//! forest is fully reproducible from `ForestParams::seed` and the training
//! rows. The positive-class probability is the mean of the per-tree leaf
//! probabilities.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::classifiers::Classifier;
use crate::classifiers::decision_tree::{DecisionTree, TreeParams};
use crate::config::{ClassWeight, ForestParams};
use crate::core::{FEATURE_COUNT, FeatureRow};
use crate::error::{DonorError, Result};

#[derive(Debug, Clone)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
        }
    }

    fn tree_params(&self, seed: u64) -> TreeParams {
        TreeParams {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            max_features: self.params.max_features.resolve(FEATURE_COUNT),
            seed,
        }
    }

    /// Bootstrap draw counts (or all ones without bootstrapping).
    fn sample_counts(&self, n: usize, rng: &mut StdRng) -> Vec<f64> {
        if !self.params.bootstrap {
            return vec![1.0; n];
        }
        let mut counts = vec![0.0; n];
        for _ in 0..n {
            counts[rng.random_range(0..n)] += 1.0;
        }
        counts
    }

    /// Individual tree probabilities for a single row.
    pub fn tree_probabilities(&self, row: &FeatureRow) -> Vec<f64> {
        self.trees
            .iter()
            .filter_map(|t| t.leaf_distribution(row))
            .map(|d| d[1])
            .collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn is_trained(&self) -> bool {
        !self.trees.is_empty()
    }

    pub fn avg_depth(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: usize = self.trees.iter().map(DecisionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }

    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }
}

/// `n / (n_classes * count_c)` over the classes present, weighted by `counts`.
pub fn balanced_class_weights(labels: &[bool], counts: &[f64]) -> [f64; 2] {
    let mut per_class = [0.0; 2];
    for (y, c) in labels.iter().zip(counts) {
        per_class[usize::from(*y)] += c;
    }
    let total: f64 = per_class.iter().sum();
    let present = per_class.iter().filter(|&&c| c > 0.0).count();
    let mut weights = [1.0; 2];
    for (w, c) in weights.iter_mut().zip(per_class) {
        if c > 0.0 {
            *w = total / (present as f64 * c);
        }
    }
    weights
}

impl Classifier for RandomForest {
    fn train(&mut self, rows: &[FeatureRow], labels: &[bool]) -> Result<()> {
        if rows.len() != labels.len() {
            return Err(DonorError::ShapeMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        if rows.is_empty() {
            return Err(DonorError::EmptyDataset("training partition".into()));
        }

        info!(
            "training random forest: {} trees on {} rows (class_weight={}, max_features={})",
            self.params.n_estimators,
            rows.len(),
            self.params.class_weight,
            self.params.max_features
        );

        let n = rows.len();
        let full_weights = balanced_class_weights(labels, &vec![1.0; n]);
        let mut forest_rng = StdRng::seed_from_u64(self.params.seed);
        let mut trees = Vec::with_capacity(self.params.n_estimators);

        for t in 0..self.params.n_estimators {
            let tree_seed: u64 = forest_rng.random();
            let mut rng = StdRng::seed_from_u64(tree_seed);
            let counts = self.sample_counts(n, &mut rng);

            let class_weights = match self.params.class_weight {
                ClassWeight::None => [1.0, 1.0],
                ClassWeight::Balanced => full_weights,
                ClassWeight::BalancedSubsample => balanced_class_weights(labels, &counts),
            };
            let weights: Vec<f64> = counts
                .iter()
                .zip(labels)
                .map(|(c, y)| c * class_weights[usize::from(*y)])
                .collect();

            let mut tree = DecisionTree::new(self.tree_params(tree_seed));
            tree.fit_weighted(rows, labels, &weights, &mut rng)?;
            if (t + 1) % 100 == 0 {
                debug!("fitted {} / {} trees", t + 1, self.params.n_estimators);
            }
            trees.push(tree);
        }

        self.trees = trees;
        debug!(
            "forest ready: {} nodes, average depth {:.1}",
            self.total_nodes(),
            self.avg_depth()
        );
        Ok(())
    }

    fn get_votes_for_instance(&self, row: &FeatureRow) -> Vec<f64> {
        let probs = self.tree_probabilities(row);
        if probs.is_empty() {
            return Vec::new();
        }
        let p = probs.iter().sum::<f64>() / probs.len() as f64;
        vec![1.0 - p, p]
    }

    fn name(&self) -> &str {
        "random-forest"
    }
}
