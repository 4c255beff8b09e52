use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{info, warn};

use crate::config::RosterParams;
use crate::core::{BloodGroup, Donor, Gender};
use crate::data::columns::{cell, find_any_column, invalid, parse_count};
use crate::data::synthetic::sample_donors;
use crate::error::{DonorError, Result};

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "name",
    "gender",
    "blood_group",
    "last_donation_date",
    "total_donations",
];

const SCORE_COLUMN: &str = "contribution_score";

pub fn read_roster_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Donor>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_roster(file, &path.display().to_string())
}

/// Parse a roster table. Column names are matched case-insensitively and the
/// row order of the file is kept.
pub fn read_roster<R: Read>(reader: R, source_name: &str) -> Result<Vec<Donor>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut idx = [0usize; REQUIRED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, column) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        match find_any_column(&headers, &[column]) {
            Some(i) => *slot = i,
            None => missing.push(column),
        }
    }
    if !missing.is_empty() {
        return Err(DonorError::missing_columns(source_name, missing));
    }
    let [name_i, gender_i, group_i, date_i, total_i] = idx;
    let score_i = find_any_column(&headers, &[SCORE_COLUMN]);

    let mut donors = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result?;

        let name = cell(&record, name_i);
        if name.is_empty() {
            return Err(invalid(name, row, "name", "name must not be empty"));
        }

        let raw = cell(&record, gender_i);
        let gender = Gender::from_str(raw)
            .map_err(|_| invalid(raw, row, "gender", "expected Male, Female or Other"))?;

        let raw = cell(&record, group_i);
        let blood_group = BloodGroup::from_str(raw)
            .map_err(|_| invalid(raw, row, "blood_group", "unknown blood group"))?;

        let raw = cell(&record, date_i);
        let last_donation_date = parse_date(raw)
            .ok_or_else(|| invalid(raw, row, "last_donation_date", "expected YYYY-MM-DD"))?;

        let total_donations = parse_count(cell(&record, total_i), row, "total_donations")?;

        let contribution_score = match score_i.map(|i| cell(&record, i)) {
            None | Some("") => Donor::default_score(total_donations),
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => return Err(invalid(raw, row, SCORE_COLUMN, "expected a number")),
            },
        };

        donors.push(Donor {
            name: name.to_string(),
            gender,
            blood_group,
            last_donation_date,
            total_donations,
            contribution_score,
        });
    }

    if donors.is_empty() {
        return Err(DonorError::EmptyDataset(source_name.to_string()));
    }
    Ok(donors)
}

/// Plain dates, or ISO datetimes truncated to their date.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Writes the roster with a header row, dates in ISO form.
pub fn write_roster<W: Write>(writer: W, donors: &[Donor]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for donor in donors {
        writer.serialize(donor)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum RosterSource {
    File(PathBuf),
    Sample { rows: usize, seed: u64 },
}

#[derive(Debug)]
pub struct RosterLoad {
    pub donors: Vec<Donor>,
    pub source: RosterSource,
    pub warning: Option<DonorError>,
}

/// Load the roster file, or the synthetic sample roster when there is none
/// or it fails validation.
pub fn load_roster_or_sample(
    path: Option<&Path>,
    params: &RosterParams,
    today: NaiveDate,
) -> RosterLoad {
    let sample = |warning: Option<DonorError>| RosterLoad {
        donors: sample_donors(params.sample_size, params.seed, today),
        source: RosterSource::Sample {
            rows: params.sample_size,
            seed: params.seed,
        },
        warning,
    };

    let Some(path) = path else {
        info!("no roster given; using {} sample donors", params.sample_size);
        return sample(None);
    };

    match read_roster_csv(path) {
        Ok(donors) => {
            info!("loaded {} donors from {}", donors.len(), path.display());
            RosterLoad {
                donors,
                source: RosterSource::File(path.to_path_buf()),
                warning: None,
            }
        }
        Err(e) => {
            warn!("cannot use roster {}: {e}; using sample donors", path.display());
            sample(Some(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    const ROSTER: &str = "\
Name,Gender,Blood_Group,Last_Donation_Date,Total_Donations,Contribution_Score
Asha,Female,B+,2025-03-01,7,140
Ravi,male,o-,2025-01-15T09:30:00,2,
";

    #[test]
    fn reads_roster_with_optional_score() {
        let donors = read_roster(ROSTER.as_bytes(), "roster").unwrap();
        assert_eq!(donors.len(), 2);
        assert_eq!(donors[0].name, "Asha");
        assert_eq!(donors[0].blood_group, BloodGroup::BPos);
        assert_eq!(donors[0].contribution_score, 140.0);
        assert_eq!(donors[1].gender, Gender::Male);
        assert_eq!(donors[1].blood_group, BloodGroup::ONeg);
        assert_eq!(
            donors[1].last_donation_date,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
        assert_eq!(donors[1].contribution_score, 20.0);
    }

    #[test]
    fn missing_score_column_defaults_every_row() {
        let csv = "name,gender,blood_group,last_donation_date,total_donations\nA,Other,AB+,2025-05-01,4\n";
        let donors = read_roster(csv.as_bytes(), "r").unwrap();
        assert_eq!(donors[0].contribution_score, 40.0);
    }

    #[test]
    fn lists_missing_columns_sorted() {
        let csv = "name,total_donations\nA,1\n";
        match read_roster(csv.as_bytes(), "r") {
            Err(DonorError::MissingColumn { columns, .. }) => assert_eq!(
                columns,
                vec!["blood_group", "gender", "last_donation_date"]
            ),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_blood_group_and_bad_dates() {
        let csv = "name,gender,blood_group,last_donation_date,total_donations\nA,Male,C+,2025-05-01,4\n";
        assert!(matches!(
            read_roster(csv.as_bytes(), "r"),
            Err(DonorError::InvalidValue { ref column, .. }) if column == "blood_group"
        ));
        let csv = "name,gender,blood_group,last_donation_date,total_donations\nA,Male,A+,01/05/2025,4\n";
        assert!(matches!(
            read_roster(csv.as_bytes(), "r"),
            Err(DonorError::InvalidValue { ref column, .. }) if column == "last_donation_date"
        ));
    }

    #[test]
    fn roster_without_blood_group_falls_back_to_sample() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            "name,gender,last_donation_date,total_donations\nA,Male,2025-01-01,3"
        )
        .unwrap();

        let load = load_roster_or_sample(Some(f.path()), &RosterParams::default(), today());
        match &load.warning {
            Some(DonorError::MissingColumn { columns, .. }) => {
                assert_eq!(columns, &vec!["blood_group".to_string()])
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
        assert_eq!(load.donors.len(), 200);
        assert_eq!(load.source, RosterSource::Sample { rows: 200, seed: 42 });
        assert_eq!(load.donors, sample_donors(200, 42, today()));
    }

    #[test]
    fn exported_roster_reads_back() {
        let donors = sample_donors(50, 42, today());
        let mut buf = Vec::new();
        write_roster(&mut buf, &donors).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with(
            "name,gender,blood_group,last_donation_date,total_donations,contribution_score"
        ));
        let back = read_roster(text.as_bytes(), "export").unwrap();
        assert_eq!(back, donors);
    }
}
