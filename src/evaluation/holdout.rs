use std::fmt::{Display, Formatter, Result as FmtResult};

use log::warn;
use serde::Serialize;

use crate::classifiers::Classifier;
use crate::core::FeatureRow;
use crate::error::{DonorError, Result};
use crate::evaluation::metrics::{accuracy, roc_auc};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HoldoutReport {
    pub n_train: usize,
    pub n_test: usize,
    pub accuracy: f64,
    /// `None` when the holdout holds a single class.
    pub roc_auc: Option<f64>,
    pub positive_rate: f64,
    pub train_seconds: f64,
}

impl HoldoutReport {
    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }

    pub fn accuracy_pct(&self) -> String {
        format!("{:.1}%", self.accuracy * 100.0)
    }

    /// AUC as a percentage, or a dash when unavailable.
    pub fn roc_auc_pct(&self) -> String {
        match self.roc_auc {
            Some(v) => format!("{:.1}%", v * 100.0),
            None => "—".to_string(),
        }
    }
}

impl Display for HoldoutReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "train={}, test={}, acc={}, auc={}, pos_rate={}, t={:.6}s",
            self.n_train,
            self.n_test,
            Self::fmtv(self.accuracy),
            self.roc_auc
                .map(Self::fmtv)
                .unwrap_or_else(|| "unavailable".into()),
            Self::fmtv(self.positive_rate),
            self.train_seconds
        )
    }
}

/// Score an already trained model on the (normalized) holdout rows.
pub fn evaluate_holdout(
    model: &dyn Classifier,
    rows: &[FeatureRow],
    labels: &[bool],
    n_train: usize,
    train_seconds: f64,
) -> Result<HoldoutReport> {
    let probs: Vec<f64> = rows.iter().map(|r| model.predict_proba(r)).collect();
    let predicted: Vec<bool> = rows.iter().map(|r| model.predict(r)).collect();

    let acc = accuracy(&predicted, labels)?;
    let auc = match roc_auc(&probs, labels) {
        Ok(v) => Some(v),
        Err(e @ DonorError::UndefinedMetric { .. }) => {
            warn!("{e}");
            None
        }
        Err(e) => return Err(e),
    };
    let positives = labels.iter().filter(|&&y| y).count();

    Ok(HoldoutReport {
        n_train,
        n_test: labels.len(),
        accuracy: acc,
        roc_auc: auc,
        positive_rate: positives as f64 / labels.len() as f64,
        train_seconds,
    })
}
