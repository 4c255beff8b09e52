pub trait SplitCriterion {
    /// Impurity of a single class distribution.
    fn impurity(&self, distribution: &[f64]) -> f64;

    /// Merit of partitioning into `post_split_dists`; higher is better.
    fn get_merit_of_split(
        &self,
        pre_split_distribution: &[f64],
        post_split_dists: &[[f64; 2]],
    ) -> f64;
}
