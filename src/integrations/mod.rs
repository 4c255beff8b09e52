//! Stand-ins for the messaging gateway and the national blood-bank registry.
//! Nothing here leaves the process.

pub mod case_lookup;
pub mod notification;

use chrono::{Local, NaiveDateTime};
use serde::Serializer;

pub use case_lookup::{CaseRecord, CaseRegistry, DEFAULT_REQUEST_ID, DemoCaseRegistry};
pub use notification::{Channel, NotificationReceipt, Notifier, SimulatedNotifier, default_message};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub type Clock = fn() -> NaiveDateTime;

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn serialize_timestamp<S: Serializer>(
    ts: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

#[cfg(test)]
pub(crate) fn fixed_clock() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2025, 8, 15)
        .and_then(|d| d.and_hms_opt(10, 30, 0))
        .unwrap()
}
