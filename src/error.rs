use std::io;
use thiserror::Error;

pub type Result<T, E = DonorError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DonorError {
    #[error("missing columns in {source_name}: {}", .columns.join(", "))]
    MissingColumn {
        source_name: String,
        columns: Vec<String>,
    },

    #[error("feature '{feature}' is constant in the training data (min = max = {value})")]
    DegenerateFeature { feature: String, value: f64 },

    #[error("{metric} is unavailable: {reason}")]
    UndefinedMetric {
        metric: &'static str,
        reason: String,
    },

    #[error("cooldown must be between {min} and {max} days, got {value}")]
    InvalidCooldown { value: i64, min: u32, max: u32 },

    #[error("{0} is empty")]
    EmptyDataset(String),

    #[error("invalid value '{value}' for column '{column}' at row {row}: {reason}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("{rows} feature rows but {labels} labels")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DonorError {
    pub fn missing_columns<I, S>(source_name: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        columns.sort();
        DonorError::MissingColumn {
            source_name: source_name.to_string(),
            columns,
        }
    }

    pub fn is_missing_column(&self) -> bool {
        matches!(self, DonorError::MissingColumn { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_are_sorted_in_message() {
        let err = DonorError::missing_columns("donor roster", ["gender", "blood_group"]);
        assert_eq!(
            err.to_string(),
            "missing columns in donor roster: blood_group, gender"
        );
        assert!(err.is_missing_column());
    }

    #[test]
    fn undefined_metric_mentions_reason() {
        let err = DonorError::UndefinedMetric {
            metric: "ROC AUC",
            reason: "holdout contains a single class".into(),
        };
        assert_eq!(
            err.to_string(),
            "ROC AUC is unavailable: holdout contains a single class"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DonorError>();
    }
}
