use crate::error::{DonorError, Result};

/// Fraction of predictions matching the labels.
pub fn accuracy(predicted: &[bool], actual: &[bool]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(DonorError::ShapeMismatch {
            rows: predicted.len(),
            labels: actual.len(),
        });
    }
    if actual.is_empty() {
        return Err(DonorError::EmptyDataset("holdout partition".into()));
    }
    let correct = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();
    Ok(correct as f64 / actual.len() as f64)
}

/// Probability that a random positive outscores a random negative (ties count
/// one half). Computed from average ranks, i.e. the Mann-Whitney U statistic.
pub fn roc_auc(scores: &[f64], actual: &[bool]) -> Result<f64> {
    if scores.len() != actual.len() {
        return Err(DonorError::ShapeMismatch {
            rows: scores.len(),
            labels: actual.len(),
        });
    }

    let n_pos = actual.iter().filter(|&&y| y).count();
    let n_neg = actual.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(DonorError::UndefinedMetric {
            metric: "ROC AUC",
            reason: "holdout contains a single class".into(),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // 1-based ranks, ties share their average rank
    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = ranks
        .iter()
        .zip(actual)
        .filter(|(_, y)| **y)
        .map(|(r, _)| r)
        .sum();
    let n_pos_f = n_pos as f64;
    let u = pos_rank_sum - n_pos_f * (n_pos_f + 1.0) / 2.0;
    Ok(u / (n_pos_f * n_neg as f64))
}
