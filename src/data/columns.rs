use csv::StringRecord;

use crate::error::{DonorError, Result};

pub(crate) fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').to_lowercase()
}

/// Index of the first header matching any of `names` (trimmed, case-folded).
pub(crate) fn find_any_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = normalize_header(h);
        names.iter().any(|n| normalize_header(n) == h)
    })
}

pub(crate) fn cell<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or_default().trim()
}

/// Non-negative integer cell; accepts integral floats such as `250.0`.
pub(crate) fn parse_count(raw: &str, row: usize, column: &str) -> Result<u32> {
    if let Ok(v) = raw.parse::<u32>() {
        return Ok(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(v as u32),
        _ => Err(invalid(raw, row, column, "expected a non-negative integer")),
    }
}

pub(crate) fn invalid(raw: &str, row: usize, column: &str, reason: &str) -> DonorError {
    DonorError::InvalidValue {
        row,
        column: column.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    }
}
