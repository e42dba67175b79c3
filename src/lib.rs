//! House Rocket: buy/resell recommendations from historical property sales.
//!
//! `normalize` turns raw sales rows into records with calendar and
//! categorical features; `recommend` flags under-priced properties in good
//! condition, prices their resale and applies the caller's filters.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod insights;
pub mod loader;
pub mod normalizer;
pub mod types;

#[cfg(test)]
mod test_support;

pub use engine::{recommend, Bounds, FilterConfig, Recommendation};
pub use error::{AppError, Result};
pub use normalizer::normalize;
