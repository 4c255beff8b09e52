mod columns;
pub mod roster;
pub mod split;
pub mod synthetic;
pub mod transfusion;

pub use roster::{RosterLoad, RosterSource, load_roster_or_sample, read_roster_csv, write_roster};
pub use split::{Partition, stratified_split};
pub use synthetic::{sample_donors, synthetic_transfusion};
pub use transfusion::{DatasetLoad, DatasetSource, load_transfusion_or_synthetic};
