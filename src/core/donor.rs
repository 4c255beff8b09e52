use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    #[strum(serialize = "A+")]
    APos,
    #[serde(rename = "A-")]
    #[strum(serialize = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    #[strum(serialize = "B+")]
    BPos,
    #[serde(rename = "B-")]
    #[strum(serialize = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    #[strum(serialize = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    #[strum(serialize = "AB-")]
    AbNeg,
    #[serde(rename = "O+")]
    #[strum(serialize = "O+")]
    OPos,
    #[serde(rename = "O-")]
    #[strum(serialize = "O-")]
    ONeg,
}

/// One roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub name: String,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub last_donation_date: NaiveDate,
    pub total_donations: u32,
    pub contribution_score: f64,
}

impl Donor {
    /// Score used when the roster carries no `contribution_score` column.
    pub fn default_score(total_donations: u32) -> f64 {
        total_donations as f64 * 10.0
    }
}
