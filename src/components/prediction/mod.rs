mod component;
mod poll;
mod status;

pub use component::PredictionProgress;
pub use status::{PredictionCommand, PredictionStatus};
