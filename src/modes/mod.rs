pub mod train;

pub use train::{TrainConfig, Trainer, TrainingReport};
