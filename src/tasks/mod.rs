pub mod scorer;
pub mod session;

pub use scorer::{Prediction, Scorer};
pub use session::{Session, Summary};
