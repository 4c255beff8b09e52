pub mod classifiers;
pub mod config;
pub mod core;
pub mod data;
pub mod eligibility;
pub mod error;
pub mod evaluation;
pub mod integrations;
pub mod leaderboard;
pub mod preprocessing;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{DonorError, Result};
