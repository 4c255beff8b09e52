//! Min/max feature scaling fitted on the training split.
//!
//! `NormalizationStats` is learned once and then reused verbatim for the
//! holdout and for every inference request, so no statistic is ever derived
//! from data the model did not train on.

use log::debug;
use serde::Serialize;

use crate::config::DegeneratePolicy;
use crate::core::{FEATURE_COUNT, Feature, FeatureRow};
use crate::error::{DonorError, Result};

/// Per-feature bounds observed in the training partition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizationStats {
    pub min: FeatureRow,
    pub max: FeatureRow,
}

impl NormalizationStats {
    #[inline]
    pub fn range(&self, feature: usize) -> f64 {
        self.max[feature] - self.min[feature]
    }

    pub fn is_degenerate(&self, feature: usize) -> bool {
        self.range(feature).abs() < f64::EPSILON
    }

    pub fn degenerate_features(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| self.is_degenerate(f.index()))
            .collect()
    }
}

/// Fit min/max bounds from the training rows.
///
/// With [`DegeneratePolicy::Reject`] a constant feature is an error; with
/// [`DegeneratePolicy::Zero`] it is kept and [`apply`] maps it to 0.0.
pub fn fit(rows: &[FeatureRow], policy: DegeneratePolicy) -> Result<NormalizationStats> {
    if rows.is_empty() {
        return Err(DonorError::EmptyDataset("training partition".into()));
    }

    let mut min = [f64::INFINITY; FEATURE_COUNT];
    let mut max = [f64::NEG_INFINITY; FEATURE_COUNT];
    for row in rows {
        for c in 0..FEATURE_COUNT {
            min[c] = min[c].min(row[c]);
            max[c] = max[c].max(row[c]);
        }
    }

    let stats = NormalizationStats { min, max };
    for feature in stats.degenerate_features() {
        let value = stats.min[feature.index()];
        if policy == DegeneratePolicy::Reject {
            return Err(DonorError::DegenerateFeature {
                feature: feature.name().to_string(),
                value,
            });
        }
        debug!("feature {feature} is constant ({value}); it will scale to 0.0");
    }

    Ok(stats)
}

/// Scale one row into [0, 1] using previously fitted stats.
pub fn apply(stats: &NormalizationStats, row: &FeatureRow) -> FeatureRow {
    let mut out = [0.0; FEATURE_COUNT];
    for c in 0..FEATURE_COUNT {
        if stats.is_degenerate(c) {
            continue;
        }
        out[c] = ((row[c] - stats.min[c]) / stats.range(c)).clamp(0.0, 1.0);
    }
    out
}

pub fn apply_all(stats: &NormalizationStats, rows: &[FeatureRow]) -> Vec<FeatureRow> {
    rows.iter().map(|r| apply(stats, r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<FeatureRow> {
        vec![
            [0.0, 1.0, 250.0, 2.0],
            [10.0, 5.0, 1250.0, 40.0],
            [20.0, 9.0, 2250.0, 98.0],
        ]
    }

    #[test]
    fn fit_records_column_bounds() {
        let s = fit(&rows(), DegeneratePolicy::Zero).unwrap();
        assert_eq!(s.min, [0.0, 1.0, 250.0, 2.0]);
        assert_eq!(s.max, [20.0, 9.0, 2250.0, 98.0]);
    }

    #[test]
    fn apply_maps_bounds_to_unit_interval() {
        let s = fit(&rows(), DegeneratePolicy::Zero).unwrap();
        let lo = apply(&s, &rows()[0]);
        let mid = apply(&s, &rows()[1]);
        let hi = apply(&s, &rows()[2]);
        assert_eq!(lo, [0.0; 4]);
        assert_eq!(hi, [1.0; 4]);
        assert!((mid[0] - 0.5).abs() < 1e-12);
        assert!((mid[1] - 0.5).abs() < 1e-12);
        assert!((mid[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn values_within_training_bounds_stay_in_range() {
        let s = fit(&rows(), DegeneratePolicy::Zero).unwrap();
        for r in 0..=20 {
            for f in 1..=9 {
                let row = [r as f64, f as f64, 250.0 + 100.0 * f as f64, 2.0 + 4.0 * r as f64];
                for v in apply(&s, &row) {
                    assert!((0.0..=1.0).contains(&v), "{v} out of range for {row:?}");
                }
            }
        }
    }

    #[test]
    fn values_outside_training_bounds_are_clipped() {
        let s = fit(&rows(), DegeneratePolicy::Zero).unwrap();
        let out = apply(&s, &[50.0, 0.0, 10_000.0, 1.0]);
        assert_eq!(out, [1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn constant_feature_scales_to_zero_by_default() {
        let data = vec![[3.0, 1.0, 250.0, 2.0], [3.0, 4.0, 1000.0, 9.0]];
        let s = fit(&data, DegeneratePolicy::Zero).unwrap();
        assert_eq!(s.degenerate_features(), vec![Feature::Recency]);
        let out = apply(&s, &[3.0, 4.0, 1000.0, 9.0]);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 1.0);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn constant_feature_is_rejected_when_asked() {
        let data = vec![[3.0, 1.0, 250.0, 2.0], [3.0, 4.0, 1000.0, 9.0]];
        match fit(&data, DegeneratePolicy::Reject) {
            Err(DonorError::DegenerateFeature { feature, value }) => {
                assert_eq!(feature, "Recency");
                assert_eq!(value, 3.0);
            }
            other => panic!("expected DegenerateFeature, got {other:?}"),
        }
    }

    #[test]
    fn empty_training_set_is_an_error() {
        assert!(matches!(
            fit(&[], DegeneratePolicy::Zero),
            Err(DonorError::EmptyDataset(_))
        ));
    }
}
