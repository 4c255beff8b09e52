use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use log::info;

use crate::config::AppConfig;
use crate::core::DonorHistory;
use crate::data::{RosterLoad, load_roster_or_sample, sample_donors, write_roster};
use crate::eligibility::compute_eligibility;
use crate::integrations::{
    CaseRegistry, Channel, DemoCaseRegistry, Notifier, SimulatedNotifier, default_message,
};
use crate::leaderboard::rank_donors;
use crate::tasks::Session;
use crate::ui::cli::render;

/// A fully specified request, built either from the command line or from the
/// interactive menu.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Summary,
    Predict(DonorHistory),
    Eligibility {
        name: String,
        last_donation: NaiveDate,
    },
    Leaderboard {
        top: Option<usize>,
    },
    Notify {
        name: String,
        phone: String,
        channel: Channel,
        message: Option<String>,
    },
    Case {
        request_id: String,
    },
    SampleRoster {
        output: Option<PathBuf>,
        rows: Option<usize>,
    },
    ConfigShow,
    ConfigSchema,
}

/// Inputs shared by every action. The session is opened on first use so
/// that commands which never score anything skip model training; the
/// leaderboard only needs the roster and loads it on its own.
pub struct App {
    config: AppConfig,
    dataset: Option<PathBuf>,
    roster: Option<PathBuf>,
    today: NaiveDate,
    session: Option<Session>,
    roster_load: Option<RosterLoad>,
    notifier: Box<dyn Notifier>,
    registry: Box<dyn CaseRegistry>,
}

impl App {
    pub fn new(
        config: AppConfig,
        dataset: Option<PathBuf>,
        roster: Option<PathBuf>,
        today: NaiveDate,
    ) -> Self {
        Self {
            config,
            dataset,
            roster,
            today,
            session: None,
            roster_load: None,
            notifier: Box::new(SimulatedNotifier::new()),
            registry: Box::new(DemoCaseRegistry::new()),
        }
    }

    pub fn with_integrations(
        mut self,
        notifier: Box<dyn Notifier>,
        registry: Box<dyn CaseRegistry>,
    ) -> Self {
        self.notifier = notifier;
        self.registry = registry;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&mut self) -> &Session {
        self.session.get_or_insert_with(|| {
            Session::open(
                self.config.clone(),
                self.dataset.as_deref(),
                self.roster.as_deref(),
                self.today,
            )
        })
    }

    /// The session's roster when one is open, otherwise the roster alone.
    pub fn roster(&mut self) -> &RosterLoad {
        match &self.session {
            Some(session) => session.roster(),
            None => self.roster_load.get_or_insert_with(|| {
                load_roster_or_sample(self.roster.as_deref(), &self.config.roster, self.today)
            }),
        }
    }

    pub fn execute(&mut self, action: &Action) -> Result<String> {
        match action {
            Action::Summary => {
                let today = self.today;
                let session = self.session();
                let summary = session.summary(today);
                Ok(format!(
                    "{}\n{}",
                    render::header(session),
                    render::summary(&summary)
                ))
            }
            Action::Predict(history) => {
                let prediction = self
                    .session()
                    .predict(history)
                    .map_err(|e| anyhow!("prediction is unavailable: {e}"))?;
                Ok(render::prediction(&prediction))
            }
            Action::Eligibility {
                name,
                last_donation,
            } => {
                let e = compute_eligibility(*last_donation, self.config.cooldown(), self.today);
                Ok(render::eligibility(name, &e))
            }
            Action::Leaderboard { top } => {
                let roster = self.roster();
                let entries = rank_donors(&roster.donors, *top);
                let board = render::leaderboard(&entries);
                Ok(match render::roster_warning(roster) {
                    Some(warning) => format!("{warning}\n{board}"),
                    None => board,
                })
            }
            Action::Notify {
                name,
                phone,
                channel,
                message,
            } => {
                let message = message.clone().unwrap_or_else(|| default_message(name));
                let receipt = self
                    .notifier
                    .send(name, phone, *channel, &message)
                    .context("failed to queue notification")?;
                Ok(serde_json::to_string_pretty(&receipt)?)
            }
            Action::Case { request_id } => {
                let case = self
                    .registry
                    .fetch_case(request_id)
                    .with_context(|| format!("failed to fetch case {request_id}"))?;
                Ok(serde_json::to_string_pretty(&case)?)
            }
            Action::SampleRoster { output, rows } => {
                let params = &self.config.roster;
                let rows = rows.unwrap_or(params.export_size);
                let donors = sample_donors(rows, params.seed, self.today);
                match output {
                    Some(path) => {
                        let file = File::create(path)
                            .with_context(|| format!("failed to create {}", path.display()))?;
                        write_roster(file, &donors)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        info!("wrote {} sample donors to {}", donors.len(), path.display());
                        Ok(format!(
                            "wrote {} sample donors to {}",
                            donors.len(),
                            path.display()
                        ))
                    }
                    None => {
                        let mut buf = Vec::new();
                        write_roster(&mut buf, &donors)?;
                        Ok(String::from_utf8(buf)?.trim_end().to_string())
                    }
                }
            }
            Action::ConfigShow => Ok(serde_json::to_string_pretty(&self.config)?),
            Action::ConfigSchema => Ok(serde_json::to_string_pretty(&AppConfig::schema())?),
        }
    }
}
