use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

pub const FEATURE_COUNT: usize = 4;

pub type FeatureRow = [f64; FEATURE_COUNT];

/// Donation-history features in the column order the model is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Feature {
    Recency,
    Frequency,
    Monetary,
    Time,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Recency,
        Feature::Frequency,
        Feature::Monetary,
        Feature::Time,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// The four features of one donor, without a label. Used for inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DonorHistory {
    pub recency: u32,
    pub frequency: u32,
    pub monetary: u32,
    pub time: u32,
}

impl DonorHistory {
    pub fn new(recency: u32, frequency: u32, monetary: u32, time: u32) -> Self {
        Self {
            recency,
            frequency,
            monetary,
            time,
        }
    }

    pub fn features(&self) -> FeatureRow {
        [
            self.recency as f64,
            self.frequency as f64,
            self.monetary as f64,
            self.time as f64,
        ]
    }
}

/// A labelled historical record: did the donor give blood again?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRecord {
    pub history: DonorHistory,
    pub target: bool,
}

impl DonationRecord {
    pub fn new(recency: u32, frequency: u32, monetary: u32, time: u32, target: bool) -> Self {
        Self {
            history: DonorHistory::new(recency, frequency, monetary, time),
            target,
        }
    }

    #[inline]
    pub fn features(&self) -> FeatureRow {
        self.history.features()
    }
}

pub fn feature_matrix(records: &[DonationRecord]) -> Vec<FeatureRow> {
    records.iter().map(DonationRecord::features).collect()
}

pub fn labels(records: &[DonationRecord]) -> Vec<bool> {
    records.iter().map(|r| r.target).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_order_matches_indices() {
        for (i, f) in Feature::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
        }
        assert_eq!(Feature::Monetary.name(), "Monetary");
    }

    #[test]
    fn record_features_follow_declared_order() {
        let r = DonationRecord::new(2, 50, 12_500, 98, true);
        assert_eq!(r.features(), [2.0, 50.0, 12_500.0, 98.0]);
        assert_eq!(labels(&[r]), vec![true]);
    }
}
