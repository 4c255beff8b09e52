pub mod dummies {
    mod failing_classifier;
    pub use failing_classifier::FailingClassifier;
}

pub mod spies {
    mod train_spy_classifier;
    pub use train_spy_classifier::{TrainSpyClassifier, TrainSpyHandle};
}

pub mod stubs {
    mod threshold_classifier;
    pub use threshold_classifier::ThresholdClassifier;
}
