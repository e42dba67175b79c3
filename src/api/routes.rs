use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::health::{HealthResponse, HealthState};
use crate::api::latency::{LatencyResponse, LatencyStats};
use crate::engine::{recommend, AppliedBounds, Bounds, FilterConfig};
use crate::error::{AppError, Result};
use crate::insights::{DataOverview, HypothesisResult};
use crate::types::{BuyCandidate, NormalizedRecord, Season};

#[derive(Clone)]
pub struct ApiState {
    pub records: Arc<Vec<NormalizedRecord>>,
    pub overview: Arc<DataOverview>,
    pub hypotheses: Arc<Vec<HypothesisResult>>,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
    pub default_limit: usize,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/recommendations", get(get_recommendations))
        .route("/overview", get(get_overview))
        .route("/hypotheses", get(get_hypotheses))
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationsQuery {
    pub year_built_min: Option<u16>,
    pub year_built_max: Option<u16>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub profit_min: Option<f64>,
    pub profit_max: Option<f64>,
    /// Comma-separated season names, e.g. `summer,fall`.
    pub seasons: Option<String>,
    pub limit: Option<usize>,
}

impl RecommendationsQuery {
    pub fn filters(&self) -> Result<FilterConfig> {
        let seasons = self
            .seasons
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<Season>)
            .collect::<Result<BTreeSet<Season>>>()?;

        Ok(FilterConfig {
            year_built: Bounds::new(self.year_built_min, self.year_built_max),
            price: Bounds::new(self.price_min, self.price_max),
            profit: Bounds::new(self.profit_min, self.profit_max),
            seasons,
        })
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RecommendationsResponse {
    /// Size of the full filtered set, independent of `limit`.
    pub count: usize,
    pub total_profit: f64,
    pub applied: AppliedBounds,
    pub returned: usize,
    pub candidates: Vec<BuyCandidate>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_recommendations(
    State(state): State<ApiState>,
    Query(params): Query<RecommendationsQuery>,
) -> std::result::Result<Json<RecommendationsResponse>, AppError> {
    let filters = params.filters()?;

    let started = Instant::now();
    let rec = recommend(&state.records, &filters)?;
    state.latency.record(started.elapsed());
    state.health.inc_requests_served();

    let limit = params.limit.unwrap_or(state.default_limit);
    let mut candidates = rec.candidates;
    candidates.truncate(limit);

    Ok(Json(RecommendationsResponse {
        count: rec.count,
        total_profit: rec.total_profit,
        applied: rec.applied,
        returned: candidates.len(),
        candidates,
    }))
}

async fn get_overview(State(state): State<ApiState>) -> Json<DataOverview> {
    Json(state.overview.as_ref().clone())
}

async fn get_hypotheses(State(state): State<ApiState>) -> Json<Vec<HypothesisResult>> {
    Json(state.hypotheses.as_ref().clone())
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(state.health.snapshot())
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    Json(state.latency.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::evaluate_hypotheses;
    use crate::test_support::record;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn state() -> ApiState {
        let records = vec![
            record(1, 98118, 100000.0, 5, 6),
            record(2, 98118, 200000.0, 5, 6),
            record(3, 98118, 80000.0, 5, 10),
            record(4, 98118, 300000.0, 3, 10),
        ];
        let health = HealthState::new();
        health.set_rows(4, 4);
        ApiState {
            overview: Arc::new(DataOverview::from_records(&records)),
            hypotheses: Arc::new(evaluate_hypotheses(&records)),
            records: Arc::new(records),
            health: Arc::new(health),
            latency: Arc::new(LatencyStats::new()),
            default_limit: 1,
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[test]
    fn query_parses_season_list() {
        let q = RecommendationsQuery {
            seasons: Some("summer, fall,,".to_string()),
            ..Default::default()
        };
        let filters = q.filters().unwrap();
        assert_eq!(
            filters.seasons.into_iter().collect::<Vec<_>>(),
            vec![Season::Summer, Season::Fall]
        );
    }

    #[test]
    fn query_rejects_unknown_season() {
        let q = RecommendationsQuery {
            seasons: Some("monsoon".to_string()),
            ..Default::default()
        };
        assert!(matches!(q.filters(), Err(AppError::UnknownSeason(_))));
    }

    #[tokio::test]
    async fn recommendations_limit_only_truncates_rows() {
        let state = state();
        let (status, body) = get_json(router(state.clone()), "/recommendations").await;
        assert_eq!(status, StatusCode::OK);
        // region median 150000: ids 1 and 3 are buys
        assert_eq!(body["count"], 2);
        assert_eq!(body["returned"], 1);
        assert_eq!(body["candidates"].as_array().unwrap().len(), 1);
        assert_eq!(state.health.requests_served(), 1);
        assert_eq!(state.latency.len(), 1);
    }

    #[tokio::test]
    async fn recommendations_filter_by_season() {
        let (status, body) =
            get_json(router(state()), "/recommendations?seasons=fall&limit=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["candidates"][0]["id"], 3);
        assert_eq!(body["candidates"][0]["season"], "fall");
        // alone in (98118, fall): its seasonal median is its own price
        assert_eq!(body["candidates"][0]["markup"], "standard");
        assert_eq!(body["applied"]["seasons"][0], "fall");
    }

    #[tokio::test]
    async fn inverted_bounds_are_bad_request() {
        let (status, _) =
            get_json(router(state()), "/recommendations?price_min=500000&price_max=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_match_is_ok_with_zero_profit() {
        let (status, body) =
            get_json(router(state()), "/recommendations?price_min=1&price_max=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
        assert_eq!(body["total_profit"], 0.0);
    }

    #[tokio::test]
    async fn health_reports_rows() {
        let (status, body) = get_json(router(state()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows_loaded"], 4);
        assert_eq!(body["rows_normalized"], 4);
    }

    #[tokio::test]
    async fn overview_and_hypotheses_are_served() {
        let (status, body) = get_json(router(state()), "/overview").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"], 4);

        let (status, body) = get_json(router(state()), "/hypotheses").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 10);
    }
}
