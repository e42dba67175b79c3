use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Malformed sale date {value:?} for property {id}")]
    MalformedDate { id: u64, value: String },

    #[error("Invalid price {price} for property {id}: must be finite and positive")]
    InvalidPrice { id: u64, price: f64 },

    #[error("Inverted {field} bounds: min {min} > max {max}")]
    InvertedBound { field: &'static str, min: f64, max: f64 },

    #[error("Invalid {field} bound: {value}")]
    InvalidBound { field: &'static str, value: f64 },

    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::InvertedBound { .. }
            | AppError::InvalidBound { .. }
            | AppError::UnknownSeason(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
