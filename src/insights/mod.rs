//! Descriptive analytics over the normalized table.

pub mod hypotheses;
pub mod overview;

pub use hypotheses::{evaluate_hypotheses, GroupMean, HypothesisResult};
pub use overview::{AttributeStats, DataOverview};
