use crate::classifiers::decision_tree::split_criteria::split_criterion::SplitCriterion;

#[derive(Debug, Default, Clone, Copy)]
pub struct GiniSplitCriterion;

impl GiniSplitCriterion {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_gini(&self, distribution: &[f64], distribution_sum_of_weights: f64) -> f64 {
        if distribution_sum_of_weights <= 0.0 {
            return 0.0;
        }
        let mut gini = 1.0;
        for w in distribution {
            let rel_freq = w / distribution_sum_of_weights;
            gini -= rel_freq * rel_freq;
        }
        gini
    }
}

impl SplitCriterion for GiniSplitCriterion {
    fn impurity(&self, distribution: &[f64]) -> f64 {
        self.compute_gini(distribution, distribution.iter().sum())
    }

    /// Gini decrease of the split relative to the parent node.
    fn get_merit_of_split(
        &self,
        pre_split_distribution: &[f64],
        post_split_dists: &[[f64; 2]],
    ) -> f64 {
        let mut total_weight = 0.0;
        let mut dist_weights = Vec::with_capacity(post_split_dists.len());

        for dist in post_split_dists.iter() {
            let w: f64 = dist.iter().sum();
            dist_weights.push(w);
            total_weight += w;
        }

        if total_weight <= 0.0 {
            return 0.0;
        }

        let mut gini = 0.0;
        for (dist, w) in post_split_dists.iter().zip(&dist_weights) {
            gini += (w / total_weight) * self.compute_gini(dist, *w);
        }

        self.impurity(pre_split_distribution) - gini
    }
}
