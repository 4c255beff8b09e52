pub mod min_max;

pub use min_max::{NormalizationStats, apply, apply_all, fit};
