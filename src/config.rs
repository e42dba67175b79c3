use crate::error::{AppError, Result};

pub const DATA_PATH: &str = "kc_house_data.csv";

/// Default page size for `/recommendations` when the caller passes no `limit`.
pub const RECOMMENDATION_LIMIT: usize = 500;

/// Resale markup multipliers applied to a buy candidate's purchase price.
pub mod markup {
    /// Candidate is still below its region+season median.
    pub const UNDERVALUED: f64 = 1.10;
    /// Candidate is at or above its region+season median.
    pub const STANDARD: f64 = 1.30;
}

/// Ordinal condition (1-5) boundaries.
pub mod condition_thresholds {
    pub const GOOD_MIN: u8 = 4;
    pub const AVERAGE: u8 = 3;
}

/// Ordinal grade boundaries. Kept literal; the class edges do not track the 1-13 grade scale.
pub mod grade_thresholds {
    pub const LOW_MAX: u8 = 3;
    pub const HIGH_MIN: u8 = 11;
}

/// Ordinal view (0-4) boundaries.
pub mod view_thresholds {
    pub const AVERAGE: u8 = 2;
}

/// Ratios a hypothesis must reach to be reported as holding.
pub mod hypothesis_thresholds {
    pub const WATERFRONT_PREMIUM: f64 = 2.0;
    pub const OLD_BUILD_DISCOUNT: f64 = 0.5;
    pub const OLD_BUILD_CUTOFF_YEAR: u16 = 1955;
    pub const BAD_CONDITION_GOOD_VIEW_DISCOUNT: f64 = 0.8;
    pub const YEAR_OVER_YEAR_GROWTH: f64 = 0.10;
    pub const MONTH_OVER_MONTH_GROWTH: f64 = 0.15;
    pub const MONTH_OVER_MONTH_BATHROOMS: f64 = 3.0;
    pub const RENOVATION_PREMIUM: f64 = 1.4;
    pub const WARM_SEASON_PREMIUM: f64 = 1.1;
    pub const BASEMENT_PREMIUM: f64 = 1.4;
    pub const GRADE_STEP_GROWTH: f64 = 1.2;
    pub const GOOD_VIEW_PREMIUM: f64 = 1.2;
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the sales CSV (DATA_PATH)
    pub data_path: String,
    pub log_level: String,
    pub api_port: u16,
    /// Candidates returned per `/recommendations` call when no limit is given (RECOMMENDATION_LIMIT)
    pub recommendation_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            data_path: std::env::var("DATA_PATH").unwrap_or_else(|_| DATA_PATH.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            recommendation_limit: std::env::var("RECOMMENDATION_LIMIT")
                .unwrap_or_else(|_| RECOMMENDATION_LIMIT.to_string())
                .parse::<usize>()
                .unwrap_or(RECOMMENDATION_LIMIT),
        })
    }
}
