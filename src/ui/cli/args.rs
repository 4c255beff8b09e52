use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueHint};
use serde_json::Value;

use crate::config::{AppConfig, KeyValue, parse_key_value};
use crate::core::DonorHistory;
use crate::integrations::{Channel, DEFAULT_REQUEST_ID};
use crate::ui::cli::actions::Action;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Repeat-donation scoring, eligibility and leaderboards for blood-donor drives"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override configuration values (key=value, nested keys with dots)
    #[arg(
        long = "set",
        global = true,
        value_name = "KEY=VALUE",
        value_parser = parse_key_value
    )]
    pub overrides: Vec<KeyValue>,

    /// Transfusion history CSV used to train the model
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dataset: Option<PathBuf>,

    /// Donor roster CSV
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub roster: Option<PathBuf>,

    /// Days between donations (demo only)
    #[arg(
        long,
        global = true,
        value_name = "DAYS",
        value_parser = clap::value_parser!(u32).range(30..=200),
    )]
    pub cooldown: Option<u32>,
}

impl GlobalArgs {
    /// File, then `--set` overrides, then `--cooldown`.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut overrides = self.overrides.clone();
        if let Some(days) = self.cooldown {
            overrides.push(KeyValue::new(
                "eligibility.cooldown_days",
                Value::from(days),
            ));
        }
        AppConfig::load(self.config.as_deref(), &overrides).context("failed to load configuration")
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Model accuracy, AUC, eligible donors today and roster size
    Summary,
    /// Predict whether a donor will give blood again
    Predict(PredictArgs),
    /// When can a donor give blood again?
    Eligibility(EligibilityArgs),
    /// Donors ranked by contribution score
    Leaderboard {
        /// Show only the first N donors
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },
    /// Simulate a donor notification (nothing is sent)
    Notify(NotifyArgs),
    /// Fetch a demo blood request
    Case {
        #[arg(long, default_value = DEFAULT_REQUEST_ID, value_name = "ID")]
        request_id: String,
    },
    /// Write a synthetic roster CSV
    SampleRoster {
        /// Destination file (stdout when omitted)
        #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Number of donors (defaults to roster.export_size)
        #[arg(long, value_name = "N")]
        rows: Option<usize>,
    },
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration JSON schema
    Schema,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Months since last donation
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(0..=50))]
    pub recency: u32,

    /// Number of donations
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(0..=50))]
    pub frequency: u32,

    /// Total blood donated (c.c.)
    #[arg(long, default_value_t = 750, value_parser = clap::value_parser!(u32).range(0..=20_000))]
    pub monetary: u32,

    /// Months since first donation
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(0..=200))]
    pub time: u32,
}

#[derive(Debug, Args)]
pub struct EligibilityArgs {
    #[arg(long, default_value = "Rohan")]
    pub name: String,

    /// Date of the last donation (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub last_donation: NaiveDate,
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub phone: String,

    /// sms, whatsapp or email
    #[arg(long, default_value = "SMS", value_parser = parse_channel)]
    pub channel: Channel,

    /// Message text (defaults to the eligibility reminder)
    #[arg(long)]
    pub message: Option<String>,
}

impl Command {
    pub fn into_action(self) -> Action {
        match self {
            Command::Summary => Action::Summary,
            Command::Predict(a) => {
                Action::Predict(DonorHistory::new(a.recency, a.frequency, a.monetary, a.time))
            }
            Command::Eligibility(a) => Action::Eligibility {
                name: a.name,
                last_donation: a.last_donation,
            },
            Command::Leaderboard { top } => Action::Leaderboard { top },
            Command::Notify(a) => Action::Notify {
                name: a.name,
                phone: a.phone,
                channel: a.channel,
                message: a.message,
            },
            Command::Case { request_id } => Action::Case { request_id },
            Command::SampleRoster { output, rows } => Action::SampleRoster { output, rows },
            Command::Config { action } => match action {
                ConfigAction::Show => Action::ConfigShow,
                ConfigAction::Schema => Action::ConfigSchema,
            },
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| format!("{e} (use YYYY-MM-DD)"))
}

fn parse_channel(raw: &str) -> Result<Channel, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("unknown channel '{raw}' (sms, whatsapp, email)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn predict_flags_map_to_history() {
        let cli = Cli::try_parse_from([
            "donorcast", "predict", "--recency", "2", "--frequency", "10", "--monetary", "2500",
            "--time", "30",
        ])
        .unwrap();
        assert_eq!(
            cli.command.unwrap().into_action(),
            Action::Predict(DonorHistory::new(2, 10, 2500, 30))
        );
    }

    #[test]
    fn predict_rejects_out_of_range_inputs() {
        assert!(Cli::try_parse_from(["donorcast", "predict", "--recency", "51"]).is_err());
        assert!(Cli::try_parse_from(["donorcast", "predict", "--monetary", "20001"]).is_err());
    }

    #[test]
    fn cooldown_is_bounded_and_overrides_config() {
        assert!(Cli::try_parse_from(["donorcast", "--cooldown", "29", "summary"]).is_err());
        assert!(Cli::try_parse_from(["donorcast", "summary", "--cooldown", "201"]).is_err());

        let cli = Cli::try_parse_from([
            "donorcast",
            "--set",
            "eligibility.cooldown_days=60",
            "--cooldown",
            "120",
            "summary",
        ])
        .unwrap();
        assert_eq!(cli.global.load_config().unwrap().eligibility.cooldown_days, 120);
    }

    #[test]
    fn set_overrides_reach_the_config() {
        let cli = Cli::try_parse_from(["donorcast", "--set", "scoring.forest.n_estimators=50"])
            .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.global.load_config().unwrap().scoring.forest.n_estimators, 50);
    }

    #[test]
    fn eligibility_and_notify_parse_typed_values() {
        let cli = Cli::try_parse_from([
            "donorcast",
            "eligibility",
            "--name",
            "Asha",
            "--last-donation",
            "2025-02-01",
        ])
        .unwrap();
        assert_eq!(
            cli.command.unwrap().into_action(),
            Action::Eligibility {
                name: "Asha".into(),
                last_donation: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            }
        );
        assert!(
            Cli::try_parse_from(["donorcast", "eligibility", "--last-donation", "01/02/2025"])
                .is_err()
        );

        let cli = Cli::try_parse_from([
            "donorcast", "notify", "--name", "Asha", "--phone", "+91", "--channel", "whatsapp",
        ])
        .unwrap();
        match cli.command.unwrap().into_action() {
            Action::Notify {
                channel, message, ..
            } => {
                assert_eq!(channel, Channel::WhatsApp);
                assert_eq!(message, None);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn case_defaults_request_id() {
        let cli = Cli::try_parse_from(["donorcast", "case"]).unwrap();
        assert_eq!(
            cli.command.unwrap().into_action(),
            Action::Case {
                request_id: DEFAULT_REQUEST_ID.into()
            }
        );
    }
}
