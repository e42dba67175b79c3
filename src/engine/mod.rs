pub mod baseline;
pub mod classifier;
pub mod filter;
pub mod pricing;
pub mod recommender;

pub use filter::{AppliedBounds, Bounds, FilterConfig, Range};
pub use recommender::{recommend, Recommendation};
