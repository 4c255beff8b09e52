use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{BloodGroup, DonationRecord, Donor, Gender};

const GENDERS: [(Gender, f64); 2] = [(Gender::Male, 0.6), (Gender::Female, 0.4)];

const BLOOD_GROUPS: [(BloodGroup, f64); 8] = [
    (BloodGroup::APos, 0.28),
    (BloodGroup::ANeg, 0.04),
    (BloodGroup::BPos, 0.29),
    (BloodGroup::BNeg, 0.03),
    (BloodGroup::AbPos, 0.08),
    (BloodGroup::AbNeg, 0.02),
    (BloodGroup::OPos, 0.22),
    (BloodGroup::ONeg, 0.04),
];

/// ml drawn per donation in the UCI data set.
const CC_PER_DONATION: u32 = 250;

fn pick_weighted<T: Copy>(rng: &mut StdRng, table: &[(T, f64)]) -> T {
    let total: f64 = table.iter().map(|(_, p)| p).sum();
    let mut draw = rng.random::<f64>() * total;
    for (value, p) in table {
        if draw < *p {
            return *value;
        }
        draw -= p;
    }
    table[table.len() - 1].0
}

/// Synthetic roster: `Donor-001`.. with scores `total * 10 + (365 - days_ago)`.
pub fn sample_donors(n: usize, seed: u64, today: NaiveDate) -> Vec<Donor> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let gender = pick_weighted(&mut rng, &GENDERS);
            let blood_group = pick_weighted(&mut rng, &BLOOD_GROUPS);
            let days_ago: u32 = rng.random_range(1..365);
            let total_donations: u32 = rng.random_range(1..15);
            Donor {
                name: format!("Donor-{:03}", i + 1),
                gender,
                blood_group,
                last_donation_date: today - Days::new(days_ago as u64),
                total_donations,
                contribution_score: (total_donations * 10 + (365 - days_ago)) as f64,
            }
        })
        .collect()
}

/// Seeded stand-in for the transfusion data set. Donors who gave recently and
/// often are more likely to be labelled as returning.
pub fn synthetic_transfusion(n: usize, seed: u64) -> Vec<DonationRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let frequency = 1 + (rng.random::<f64>().powi(3) * 49.0) as u32;
            let recency = (rng.random::<f64>().powi(2) * 50.0) as u32;
            let spacing: u32 = rng.random_range(1..=4);
            let time = (recency + frequency * spacing + rng.random_range(0..=10)).min(200);

            let z = -1.0 - 0.12 * recency as f64 + 0.15 * frequency as f64 - 0.01 * time as f64;
            let p = 1.0 / (1.0 + (-z).exp());
            let target = rng.random::<f64>() < p;

            DonationRecord::new(recency, frequency, frequency * CC_PER_DONATION, time, target)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn sample_roster_follows_naming_and_ranges() {
        let donors = sample_donors(200, 42, today());
        assert_eq!(donors.len(), 200);
        assert_eq!(donors[0].name, "Donor-001");
        assert_eq!(donors[199].name, "Donor-200");
        for d in &donors {
            let days_ago = (today() - d.last_donation_date).num_days();
            assert!((1..=364).contains(&days_ago));
            assert!((1..=14).contains(&d.total_donations));
            let expected = (d.total_donations as i64 * 10 + 365 - days_ago) as f64;
            assert_eq!(d.contribution_score, expected);
        }
    }

    #[test]
    fn sample_roster_is_reproducible() {
        assert_eq!(sample_donors(20, 42, today()), sample_donors(20, 42, today()));
        assert_ne!(sample_donors(20, 42, today()), sample_donors(20, 43, today()));
    }

    #[test]
    fn weighted_pick_respects_zero_weights() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(pick_weighted(&mut rng, &[(1, 0.0), (2, 1.0), (3, 0.0)]), 2);
        }
    }

    #[test]
    fn synthetic_transfusion_is_plausible() {
        let records = synthetic_transfusion(748, 42);
        assert_eq!(records.len(), 748);
        let positives = records.iter().filter(|r| r.target).count();
        assert!(positives > 0 && positives < records.len());
        for r in &records {
            let h = r.history;
            assert!(h.frequency >= 1 && h.frequency <= 50);
            assert_eq!(h.monetary, h.frequency * 250);
            assert!(h.time >= h.recency);
            assert!(h.recency <= 50);
        }
        assert_eq!(records, synthetic_transfusion(748, 42));
    }
}
