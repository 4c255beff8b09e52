use chrono::NaiveDateTime;
use serde::Serialize;

use super::{Clock, local_now, serialize_timestamp};
use crate::core::BloodGroup;
use crate::error::Result;

pub const DEFAULT_REQUEST_ID: &str = "ERK-CH-2025-0001";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub request_id: String,
    pub patient_name: String,
    pub blood_group: BloodGroup,
    pub urgency: String,
    pub hospital: String,
    pub required_units: u32,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
}

pub trait CaseRegistry {
    fn fetch_case(&self, request_id: &str) -> Result<CaseRecord>;
}

/// Answers every request with the same demo patient.
#[derive(Debug, Clone, Copy)]
pub struct DemoCaseRegistry {
    clock: Clock,
}

impl DemoCaseRegistry {
    pub fn new() -> Self {
        Self { clock: local_now }
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }
}

impl Default for DemoCaseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseRegistry for DemoCaseRegistry {
    fn fetch_case(&self, request_id: &str) -> Result<CaseRecord> {
        log::info!("demo case lookup for {request_id}");
        Ok(CaseRecord {
            request_id: request_id.to_string(),
            patient_name: "Maya".into(),
            blood_group: BloodGroup::BPos,
            urgency: "High".into(),
            hospital: "District Hospital, Chandrapur".into(),
            required_units: 2,
            created_at: (self.clock)(),
        })
    }
}
