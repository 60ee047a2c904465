pub mod network;
pub mod prediction;
