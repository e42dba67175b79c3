use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use house_rocket::api::health::HealthState;
use house_rocket::api::latency::LatencyStats;
use house_rocket::api::{router, ApiState};
use house_rocket::config::Config;
use house_rocket::engine::{recommend, FilterConfig};
use house_rocket::error::Result;
use house_rocket::insights::{evaluate_hypotheses, DataOverview, HypothesisResult};
use house_rocket::loader::load_csv;
use house_rocket::normalizer::normalize;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Dataset ---
    let raw = load_csv(&cfg.data_path)?;
    let rows_loaded = raw.len();
    let records = normalize(raw)?;
    info!(
        rows_loaded,
        rows_normalized = records.len(),
        "Dataset ready from {}",
        cfg.data_path
    );

    // --- Insights (static for the lifetime of the process) ---
    let overview = DataOverview::from_records(&records);
    if let (Some(first), Some(last)) = (overview.first_sale, overview.last_sale) {
        info!("Sales interval: {first} to {last}");
    }
    let hypotheses = evaluate_hypotheses(&records);
    log_hypotheses(&hypotheses);

    // --- Unfiltered recommendation summary ---
    let summary = recommend(&records, &FilterConfig::default())?;
    if summary.count == 0 {
        warn!("No buy candidates in the dataset; /recommendations will return an empty set");
    }

    // --- HTTP API ---
    let health = HealthState::new();
    health.set_rows(rows_loaded, records.len());

    let api_state = ApiState {
        records: Arc::new(records),
        overview: Arc::new(overview),
        hypotheses: Arc::new(hypotheses),
        health: Arc::new(health),
        latency: Arc::new(LatencyStats::new()),
        default_limit: cfg.recommendation_limit,
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_hypotheses(results: &[HypothesisResult]) {
    for h in results {
        let verdict = match h.verdict {
            Some(true) => "true",
            Some(false) => "false",
            None => "n/a",
        };
        info!(
            hypothesis = h.id,
            verdict,
            groups = h.groups.len(),
            "{} | {} | {}",
            h.id,
            verdict,
            h.statement,
        );
    }
}
