use chrono::NaiveDateTime;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use super::{Clock, local_now, serialize_timestamp};
use crate::error::Result;

pub const SIMULATED_SENT: &str = "SIMULATED_SENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Channel {
    #[strum(serialize = "SMS")]
    #[serde(rename = "SMS")]
    Sms,
    WhatsApp,
    Email,
}

pub fn default_message(name: &str) -> String {
    format!(
        "Hi {name}, you're now eligible to donate blood again. A Thalassemia patient \
         nearby needs your blood type. Would you like to schedule a donation?"
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationReceipt {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub name: String,
    pub phone: String,
    pub channel: Channel,
    pub message: String,
    pub status: &'static str,
}

pub trait Notifier {
    fn send(
        &self,
        name: &str,
        phone: &str,
        channel: Channel,
        message: &str,
    ) -> Result<NotificationReceipt>;
}

/// Records what would have been sent and reports it as delivered.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedNotifier {
    clock: Clock,
}

impl SimulatedNotifier {
    pub fn new() -> Self {
        Self { clock: local_now }
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }
}

impl Default for SimulatedNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for SimulatedNotifier {
    fn send(
        &self,
        name: &str,
        phone: &str,
        channel: Channel,
        message: &str,
    ) -> Result<NotificationReceipt> {
        log::info!("simulated {channel} notification to {name}");
        Ok(NotificationReceipt {
            timestamp: (self.clock)(),
            name: name.to_string(),
            phone: phone.to_string(),
            channel,
            message: message.to_string(),
            status: SIMULATED_SENT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::fixed_clock;
    use std::str::FromStr;

    #[test]
    fn receipt_has_fixed_shape() {
        let notifier = SimulatedNotifier::with_clock(fixed_clock);
        let msg = default_message("Rohan Sharma");
        let receipt = notifier
            .send("Rohan Sharma", "+91XXXXXXXXXX", Channel::WhatsApp, &msg)
            .unwrap();

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["timestamp"], "2025-08-15 10:30:00");
        assert_eq!(json["channel"], "WhatsApp");
        assert_eq!(json["status"], "SIMULATED_SENT");
        assert_eq!(json["phone"], "+91XXXXXXXXXX");
        assert!(json["message"].as_str().unwrap().starts_with("Hi Rohan Sharma, "));
    }

    #[test]
    fn channels_parse_case_insensitively() {
        assert_eq!(Channel::from_str("sms").unwrap(), Channel::Sms);
        assert_eq!(Channel::from_str("whatsapp").unwrap(), Channel::WhatsApp);
        assert_eq!(Channel::Sms.to_string(), "SMS");
        assert!(Channel::from_str("pigeon").is_err());
    }

    #[test]
    fn default_message_mentions_the_donor() {
        assert_eq!(
            default_message("Asha"),
            "Hi Asha, you're now eligible to donate blood again. A Thalassemia patient \
             nearby needs your blood type. Would you like to schedule a donation?"
        );
    }
}
