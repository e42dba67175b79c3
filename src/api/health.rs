//! Shared health state for the /health endpoint.
//! Set once at startup from the loaded table, bumped per served recommendation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

pub struct HealthState {
    rows_loaded: AtomicU64,
    rows_normalized: AtomicU64,
    requests_served: AtomicU64,
    started_at: Instant,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    pub rows_loaded: u64,
    pub rows_normalized: u64,
    pub requests_served: u64,
    pub uptime_secs: u64,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            rows_loaded: AtomicU64::new(0),
            rows_normalized: AtomicU64::new(0),
            requests_served: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn set_rows(&self, loaded: usize, normalized: usize) {
        self.rows_loaded.store(loaded as u64, Ordering::Relaxed);
        self.rows_normalized.store(normalized as u64, Ordering::Relaxed);
    }

    pub fn inc_requests_served(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> HealthResponse {
        HealthResponse {
            rows_loaded: self.rows_loaded.load(Ordering::Relaxed),
            rows_normalized: self.rows_normalized.load(Ordering::Relaxed),
            requests_served: self.requests_served(),
            uptime_secs: self.started_at.elapsed().as_secs(),
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
