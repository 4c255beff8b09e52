use cpu_time::ThreadTime;
use log::info;
use serde::Serialize;

use crate::classifiers::{Classifier, DECISION_THRESHOLD, RandomForest};
use crate::config::ScoringParams;
use crate::core::{DonationRecord, DonorHistory, feature_matrix, labels};
use crate::data::stratified_split;
use crate::error::Result;
use crate::evaluation::{HoldoutReport, evaluate_holdout};
use crate::preprocessing::{self, NormalizationStats};

/// Probability that a donor gives blood again, with the thresholded verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub probability: f64,
    pub likely: bool,
    /// Probability of the predicted outcome.
    pub confidence: f64,
}

impl Prediction {
    fn from_probability(probability: f64) -> Self {
        let likely = probability >= DECISION_THRESHOLD;
        Self {
            probability,
            likely,
            confidence: if likely { probability } else { 1.0 - probability },
        }
    }
}

/// A fitted normalizer and classifier plus their holdout evaluation.
pub struct Scorer {
    stats: NormalizationStats,
    model: Box<dyn Classifier>,
    report: HoldoutReport,
}

impl Scorer {
    /// Split, normalize and train the random forest described by `params`.
    pub fn train(records: &[DonationRecord], params: &ScoringParams) -> Result<Self> {
        Self::train_with(records, params, Box::new(RandomForest::new(params.forest.clone())))
    }

    pub fn train_with(
        records: &[DonationRecord],
        params: &ScoringParams,
        mut model: Box<dyn Classifier>,
    ) -> Result<Self> {
        let partition = stratified_split(records, params.test_size, params.split_seed)?;

        let train_raw = feature_matrix(&partition.train);
        let stats = preprocessing::fit(&train_raw, params.degenerate_policy)?;
        let train_rows = preprocessing::apply_all(&stats, &train_raw);
        let train_labels = labels(&partition.train);

        let start = ThreadTime::now();
        model.train(&train_rows, &train_labels)?;
        let train_seconds = start.elapsed().as_secs_f64();

        let test_rows = preprocessing::apply_all(&stats, &feature_matrix(&partition.test));
        let report = evaluate_holdout(
            model.as_ref(),
            &test_rows,
            &labels(&partition.test),
            partition.train.len(),
            train_seconds,
        )?;
        info!("{}: {report}", model.name());

        Ok(Self {
            stats,
            model,
            report,
        })
    }

    pub fn predict(&self, history: &DonorHistory) -> Prediction {
        let row = preprocessing::apply(&self.stats, &history.features());
        Prediction::from_probability(self.model.predict_proba(&row))
    }

    pub fn report(&self) -> &HoldoutReport {
        &self.report
    }

    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}
