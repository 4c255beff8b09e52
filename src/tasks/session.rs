//! Everything one run of the app needs, built once up front and passed
//! around explicitly.

use std::path::Path;

use chrono::NaiveDate;
use log::{error, info};
use serde::Serialize;

use crate::config::AppConfig;
use crate::core::DonorHistory;
use crate::data::{DatasetSource, RosterLoad, load_roster_or_sample, load_transfusion_or_synthetic};
use crate::eligibility::{CooldownDays, count_eligible};
use crate::error::{DonorError, Result};
use crate::tasks::scorer::{Prediction, Scorer};

pub struct Session {
    config: AppConfig,
    dataset: DatasetSource,
    dataset_warning: Option<DonorError>,
    roster: RosterLoad,
    scoring: Result<Scorer>,
}

/// Headline numbers shown above every view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub accuracy: Option<f64>,
    pub roc_auc: Option<f64>,
    pub accuracy_label: String,
    pub roc_auc_label: String,
    pub eligible_today: usize,
    pub total_donors: usize,
    pub cooldown_days: u32,
}

impl Session {
    pub fn open(
        config: AppConfig,
        dataset: Option<&Path>,
        roster: Option<&Path>,
        today: NaiveDate,
    ) -> Self {
        let load = load_transfusion_or_synthetic(dataset, &config.scoring);
        let scoring = Scorer::train(&load.records, &config.scoring);
        if let Err(e) = &scoring {
            error!("model training failed, prediction is disabled: {e}");
        }
        let roster = load_roster_or_sample(roster, &config.roster, today);
        info!("session ready with {} donors", roster.donors.len());

        Self {
            config,
            dataset: load.source,
            dataset_warning: load.warning,
            roster,
            scoring,
        }
    }

    /// Assembles a session from parts that are already loaded.
    pub fn from_parts(
        config: AppConfig,
        dataset: DatasetSource,
        roster: RosterLoad,
        scoring: Result<Scorer>,
    ) -> Self {
        Self {
            config,
            dataset,
            dataset_warning: None,
            roster,
            scoring,
        }
    }

    pub fn cooldown(&self) -> CooldownDays {
        self.config.cooldown()
    }

    pub fn dataset_source(&self) -> &DatasetSource {
        &self.dataset
    }

    pub fn dataset_warning(&self) -> Option<&DonorError> {
        self.dataset_warning.as_ref()
    }

    pub fn roster(&self) -> &RosterLoad {
        &self.roster
    }

    pub fn scorer(&self) -> std::result::Result<&Scorer, &DonorError> {
        self.scoring.as_ref()
    }

    pub fn predict(&self, history: &DonorHistory) -> std::result::Result<Prediction, &DonorError> {
        self.scorer().map(|s| s.predict(history))
    }

    pub fn summary(&self, today: NaiveDate) -> Summary {
        let report = self.scorer().ok().map(Scorer::report);
        Summary {
            accuracy: report.map(|r| r.accuracy),
            roc_auc: report.and_then(|r| r.roc_auc),
            accuracy_label: report.map_or_else(|| "—".to_string(), |r| r.accuracy_pct()),
            roc_auc_label: report.map_or_else(|| "—".to_string(), |r| r.roc_auc_pct()),
            eligible_today: count_eligible(&self.roster.donors, self.cooldown(), today),
            total_donors: self.roster.donors.len(),
            cooldown_days: self.cooldown().days(),
        }
    }
}
