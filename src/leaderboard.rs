use chrono::NaiveDate;
use serde::Serialize;
use strum_macros::Display;

use crate::core::{BloodGroup, Donor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display)]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Badge {
    pub fn min_donations(self) -> u32 {
        match self {
            Badge::Bronze => 3,
            Badge::Silver => 6,
            Badge::Gold => 10,
            Badge::Platinum => 15,
        }
    }

    /// Highest tier reached, if any.
    pub fn for_donations(total_donations: u32) -> Option<Badge> {
        [Badge::Platinum, Badge::Gold, Badge::Silver, Badge::Bronze]
            .into_iter()
            .find(|b| total_donations >= b.min_donations())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub blood_group: BloodGroup,
    pub total_donations: u32,
    pub last_donation_date: NaiveDate,
    pub contribution_score: f64,
    pub badge: Option<Badge>,
}

/// Ranks donors by contribution score, highest first. Equal scores keep their
/// roster order.
pub fn rank_donors(donors: &[Donor], top: Option<usize>) -> Vec<LeaderboardEntry> {
    let mut order: Vec<&Donor> = donors.iter().collect();
    order.sort_by(|a, b| b.contribution_score.total_cmp(&a.contribution_score));

    order
        .into_iter()
        .take(top.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, d)| LeaderboardEntry {
            rank: i + 1,
            name: d.name.clone(),
            blood_group: d.blood_group,
            total_donations: d.total_donations,
            last_donation_date: d.last_donation_date,
            contribution_score: d.contribution_score,
            badge: Badge::for_donations(d.total_donations),
        })
        .collect()
}
