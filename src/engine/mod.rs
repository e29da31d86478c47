pub mod level;
pub mod metrics;
pub mod scoring;

pub use level::{ArcadeLevel, LevelProgression, Tier};
