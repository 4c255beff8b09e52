use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::core::Donor;
use crate::error::{DonorError, Result};

/// Demo-only minimum interval between donations, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CooldownDays(u32);

impl CooldownDays {
    pub const MIN: u32 = 30;
    pub const MAX: u32 = 200;

    pub fn new(days: i64) -> Result<Self> {
        if days < Self::MIN as i64 || days > Self::MAX as i64 {
            return Err(DonorError::InvalidCooldown {
                value: days,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(days as u32))
    }

    pub fn saturating(days: u32) -> Self {
        Self(days.clamp(Self::MIN, Self::MAX))
    }

    pub fn days(self) -> u32 {
        self.0
    }
}

impl Default for CooldownDays {
    fn default() -> Self {
        Self(90)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Eligibility {
    pub eligible: bool,
    pub next_eligible_date: NaiveDate,
    pub days_left: u32,
}

pub fn compute_eligibility(
    last_donation: NaiveDate,
    cooldown: CooldownDays,
    today: NaiveDate,
) -> Eligibility {
    // the cooldown range is far too small to leave chrono's date range
    let next_eligible_date = last_donation
        .checked_add_days(Days::new(cooldown.days() as u64))
        .unwrap_or(NaiveDate::MAX);
    let eligible = today >= next_eligible_date;
    let days_left = if eligible {
        0
    } else {
        (next_eligible_date - today).num_days().max(0) as u32
    };

    Eligibility {
        eligible,
        next_eligible_date,
        days_left,
    }
}

/// Roster members who may donate on `today`.
pub fn count_eligible(donors: &[Donor], cooldown: CooldownDays, today: NaiveDate) -> usize {
    donors
        .iter()
        .filter(|d| compute_eligibility(d.last_donation_date, cooldown, today).eligible)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BloodGroup, Gender};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn donor_last(days_ago: u64) -> Donor {
        Donor {
            name: format!("d{days_ago}"),
            gender: Gender::Female,
            blood_group: BloodGroup::OPos,
            last_donation_date: today() - Days::new(days_ago),
            total_donations: 1,
            contribution_score: 10.0,
        }
    }

    #[test]
    fn donated_long_ago_is_eligible_now() {
        let cooldown = CooldownDays::new(90).unwrap();
        let last = today() - Days::new(120);
        let e = compute_eligibility(last, cooldown, today());
        assert!(e.eligible);
        assert_eq!(e.days_left, 0);
        assert_eq!(e.next_eligible_date, last + Days::new(90));
    }

    #[test]
    fn recent_donation_waits_out_the_cooldown() {
        let cooldown = CooldownDays::new(90).unwrap();
        let e = compute_eligibility(today() - Days::new(10), cooldown, today());
        assert!(!e.eligible);
        assert_eq!(e.days_left, 80);
        assert_eq!(e.next_eligible_date, today() + Days::new(80));
    }

    #[test]
    fn eligible_exactly_on_the_boundary_day() {
        let cooldown = CooldownDays::new(30).unwrap();
        let e = compute_eligibility(today() - Days::new(30), cooldown, today());
        assert!(e.eligible);
        assert_eq!(e.days_left, 0);
        assert_eq!(e.next_eligible_date, today());
    }

    #[test]
    fn cooldown_outside_range_is_rejected() {
        assert!(CooldownDays::new(29).is_err());
        assert!(CooldownDays::new(201).is_err());
        assert!(CooldownDays::new(-5).is_err());
        assert_eq!(CooldownDays::new(200).unwrap().days(), 200);
        assert_eq!(CooldownDays::saturating(5).days(), 30);
        assert_eq!(CooldownDays::default().days(), 90);
    }

    #[test]
    fn counts_only_eligible_donors() {
        let donors = vec![donor_last(120), donor_last(10), donor_last(90), donor_last(89)];
        let n = count_eligible(&donors, CooldownDays::new(90).unwrap(), today());
        assert_eq!(n, 2);
    }
}
