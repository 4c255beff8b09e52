//! Historical donation records in the UCI "Blood Transfusion Service Center"
//! layout, with the known header variants mapped onto the model features.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::ScoringParams;
use crate::core::{DonationRecord, DonorHistory, Feature};
use crate::data::columns::{cell, find_any_column, invalid, parse_count};
use crate::data::synthetic::synthetic_transfusion;
use crate::error::{DonorError, Result};

const TARGET: &str = "Target";

fn aliases(feature: Feature) -> &'static [&'static str] {
    match feature {
        Feature::Recency => &["Recency", "Recency (months)"],
        Feature::Frequency => &["Frequency", "Frequency (times)"],
        Feature::Monetary => &["Monetary", "Monetary (c.c. blood)"],
        Feature::Time => &["Time", "Time (months)"],
    }
}

const TARGET_ALIASES: &[&str] = &[TARGET, "whether he/she donated blood in March 2007"];

pub fn read_transfusion_csv<P: AsRef<Path>>(path: P) -> Result<Vec<DonationRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_transfusion(file, &path.display().to_string())
}

/// Parse a transfusion table. Every feature and the label must be present
/// under a known name; no column is assumed to be the label by position.
pub fn read_transfusion<R: Read>(reader: R, source_name: &str) -> Result<Vec<DonationRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut missing = Vec::new();
    let mut feature_idx = [0usize; 4];
    for feature in Feature::ALL {
        match find_any_column(&headers, aliases(feature)) {
            Some(i) => feature_idx[feature.index()] = i,
            None => missing.push(feature.name()),
        }
    }
    let target_idx = find_any_column(&headers, TARGET_ALIASES);
    if target_idx.is_none() {
        missing.push(TARGET);
    }
    let Some(target_idx) = target_idx.filter(|_| missing.is_empty()) else {
        return Err(DonorError::missing_columns(source_name, missing));
    };

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result?;

        let mut values = [0u32; 4];
        for feature in Feature::ALL {
            let raw = cell(&record, feature_idx[feature.index()]);
            values[feature.index()] = parse_count(raw, row, feature.name())?;
        }
        let target = parse_target(cell(&record, target_idx), row)?;

        records.push(DonationRecord {
            history: DonorHistory::new(values[0], values[1], values[2], values[3]),
            target,
        });
    }

    if records.is_empty() {
        return Err(DonorError::EmptyDataset(source_name.to_string()));
    }
    Ok(records)
}

fn parse_target(raw: &str, row: usize) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        _ => Err(invalid(raw, row, TARGET, "expected 0/1 or true/false")),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    File(PathBuf),
    Synthetic { rows: usize, seed: u64 },
}

#[derive(Debug)]
pub struct DatasetLoad {
    pub records: Vec<DonationRecord>,
    pub source: DatasetSource,
    /// Why the file was not used, when the synthetic set stands in for it.
    pub warning: Option<DonorError>,
}

/// Load the training records, falling back to the seeded synthetic set when
/// no file is given or the file fails validation.
pub fn load_transfusion_or_synthetic(path: Option<&Path>, params: &ScoringParams) -> DatasetLoad {
    let synthetic = |warning: Option<DonorError>| {
        let seed = params.split_seed;
        DatasetLoad {
            records: synthetic_transfusion(params.synthetic_rows, seed),
            source: DatasetSource::Synthetic {
                rows: params.synthetic_rows,
                seed,
            },
            warning,
        }
    };

    let Some(path) = path else {
        info!(
            "no transfusion dataset given; using {} synthetic records",
            params.synthetic_rows
        );
        return synthetic(None);
    };

    match read_transfusion_csv(path) {
        Ok(records) => {
            info!("loaded {} records from {}", records.len(), path.display());
            DatasetLoad {
                records,
                source: DatasetSource::File(path.to_path_buf()),
                warning: None,
            }
        }
        Err(e) => {
            warn!(
                "cannot use {}: {e}; falling back to synthetic records",
                path.display()
            );
            synthetic(Some(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const UCI: &str = "\
Recency (months),Frequency (times),Monetary (c.c. blood),Time (months),\"whether he/she donated blood in March 2007\"
2,50,12500,98,1
0,13,3250,28,1
16,2,500,16,0
";

    #[test]
    fn reads_uci_header_variant() {
        let records = read_transfusion(UCI.as_bytes(), "uci").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], DonationRecord::new(2, 50, 12_500, 98, true));
        assert_eq!(records[2], DonationRecord::new(16, 2, 500, 16, false));
    }

    #[test]
    fn reads_canonical_headers_in_any_order() {
        let csv = "target,time,monetary,frequency,recency\ntrue,10,500,2,4\n";
        let records = read_transfusion(csv.as_bytes(), "canon").unwrap();
        assert_eq!(records, vec![DonationRecord::new(4, 2, 500, 10, true)]);
    }

    #[test]
    fn unnamed_label_column_is_an_error_not_a_guess() {
        let csv = "Recency,Frequency,Monetary,Time,donated\n2,50,12500,98,1\n";
        match read_transfusion(csv.as_bytes(), "noname") {
            Err(DonorError::MissingColumn { columns, .. }) => {
                assert_eq!(columns, vec!["Target".to_string()])
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn reports_every_missing_feature() {
        let csv = "Recency,Target\n1,0\n";
        let err = read_transfusion(csv.as_bytes(), "partial").unwrap_err();
        let msg = err.to_string();
        for col in ["Frequency", "Monetary", "Time"] {
            assert!(msg.contains(col), "{msg}");
        }
    }

    #[test]
    fn bad_cells_name_row_and_column() {
        let csv = "Recency,Frequency,Monetary,Time,Target\n1,2,500,4,1\n1,-2,500,4,0\n";
        match read_transfusion(csv.as_bytes(), "bad") {
            Err(DonorError::InvalidValue { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Frequency");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }

        let csv = "Recency,Frequency,Monetary,Time,Target\n1,2,500,4,maybe\n";
        assert!(matches!(
            read_transfusion(csv.as_bytes(), "bad"),
            Err(DonorError::InvalidValue { .. })
        ));
    }

    #[test]
    fn header_only_file_is_empty() {
        let csv = "Recency,Frequency,Monetary,Time,Target\n";
        assert!(matches!(
            read_transfusion(csv.as_bytes(), "empty"),
            Err(DonorError::EmptyDataset(_))
        ));
    }

    #[test]
    fn invalid_file_falls_back_to_synthetic() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "a,b,c\n1,2,3").unwrap();
        let params = ScoringParams::default();
        let load = load_transfusion_or_synthetic(Some(f.path()), &params);
        assert!(load.warning.as_ref().is_some_and(DonorError::is_missing_column));
        assert_eq!(load.records.len(), params.synthetic_rows);
        assert_eq!(
            load.source,
            DatasetSource::Synthetic {
                rows: params.synthetic_rows,
                seed: 42
            }
        );
    }

    #[test]
    fn valid_file_is_used() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(UCI.as_bytes()).unwrap();
        let load = load_transfusion_or_synthetic(Some(f.path()), &ScoringParams::default());
        assert!(load.warning.is_none());
        assert_eq!(load.records.len(), 3);
        assert_eq!(load.source, DatasetSource::File(f.path().to_path_buf()));
    }
}
