use std::collections::BTreeSet;

use house_rocket::api::health::HealthResponse;
use house_rocket::engine::pricing::Markup;
use house_rocket::types::Season;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// API response types (mirror routes.rs shapes)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RangeView {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[allow(dead_code)]
pub struct AppliedView {
    pub year_built: Option<RangeView>,
    pub price: Option<RangeView>,
    pub profit: Option<RangeView>,
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct CandidateRow {
    pub id: u64,
    pub zipcode: u32,
    pub price: f64,
    pub sale_price: f64,
    pub profit: f64,
    pub region_median_price: f64,
    pub region_season_median_price: f64,
    pub markup: Markup,
    pub season: Season,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub year_built: u16,
    pub condition: u8,
    pub grade: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationsView {
    pub count: usize,
    pub total_profit: f64,
    pub applied: AppliedView,
    pub returned: usize,
    pub candidates: Vec<CandidateRow>,
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Error(String),
    Connecting,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub recommendations: RecommendationsView,
    pub health: HealthResponse,
    /// Seasons to sell in; empty shows every season.
    pub seasons: BTreeSet<Season>,
    pub last_refresh: std::time::Instant,
    pub base_url: String,
}

/// Rows requested per refresh.
const PAGE_LIMIT: usize = 200;

impl AppState {
    pub fn new(base_url: String) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            recommendations: RecommendationsView::default(),
            health: HealthResponse::default(),
            seasons: BTreeSet::new(),
            last_refresh: std::time::Instant::now(),
            base_url,
        }
    }

    pub fn toggle_season(&mut self, season: Season) {
        if !self.seasons.remove(&season) {
            self.seasons.insert(season);
        }
    }

    pub fn clear_seasons(&mut self) {
        self.seasons.clear();
    }

    pub fn recommendations_url(&self) -> String {
        let mut url = format!("{}/recommendations?limit={PAGE_LIMIT}", self.base_url);
        if !self.seasons.is_empty() {
            url.push_str("&seasons=");
            url.push_str(&season_list(&self.seasons));
        }
        url
    }

    pub async fn refresh(&mut self, client: &reqwest::Client) {
        let recs_url = self.recommendations_url();
        let health_url = format!("{}/health", self.base_url);

        let (recs_res, health_res) = tokio::join!(
            client.get(&recs_url).send(),
            client.get(&health_url).send(),
        );

        let resp = match recs_res {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                self.status = ConnectionStatus::Error(format!("HTTP {}", r.status()));
                return;
            }
            Err(e) => {
                self.status = ConnectionStatus::Error(format!("{e}"));
                return;
            }
        };

        match resp.json::<RecommendationsView>().await {
            Ok(view) => {
                self.recommendations = view;
                self.status = ConnectionStatus::Connected;
                self.last_refresh = std::time::Instant::now();
            }
            Err(e) => {
                self.status = ConnectionStatus::Error(format!("parse error: {e}"));
                return;
            }
        }

        if let Ok(h) = health_res {
            if let Ok(health) = h.json::<HealthResponse>().await {
                self.health = health;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

pub fn season_list(seasons: &BTreeSet<Season>) -> String {
    seasons
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn format_seasons(seasons: &BTreeSet<Season>) -> String {
    if seasons.is_empty() {
        "all seasons".to_string()
    } else {
        season_list(seasons)
    }
}

/// Whole dollars with thousands separators, e.g. `$1,234,567`.
pub fn format_money(v: f64) -> String {
    let whole = v.abs().round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if v < 0.0 && whole != 0 {
        format!("-${out}")
    } else {
        format!("${out}")
    }
}

pub fn format_range(range: Option<RangeView>) -> String {
    match range {
        Some(r) => format!("{} – {}", format_money(r.min), format_money(r.max)),
        None => "—".to_string(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
