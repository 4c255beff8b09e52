pub mod donation_record;
pub mod donor;

pub use donation_record::{
    DonationRecord, DonorHistory, FEATURE_COUNT, Feature, FeatureRow, feature_matrix, labels,
};
pub use donor::{BloodGroup, Donor, Gender};
