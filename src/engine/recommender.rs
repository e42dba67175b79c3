use serde::Serialize;
use tracing::{debug, info};

use crate::engine::baseline::{RegionBaselines, RegionSeasonBaselines};
use crate::engine::classifier::is_buy;
use crate::engine::filter::{apply_filters, AppliedBounds, FilterConfig};
use crate::engine::pricing::price_resale;
use crate::error::Result;
use crate::types::{BuyCandidate, NormalizedRecord};

/// Filtered candidates plus the aggregates a host displays alongside them.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub candidates: Vec<BuyCandidate>,
    pub count: usize,
    pub total_profit: f64,
    pub applied: AppliedBounds,
}

/// Full recommendation pass: baselines, buy classification, resale pricing,
/// then the caller's filters. Bounds are validated before anything runs.
pub fn recommend(records: &[NormalizedRecord], filters: &FilterConfig) -> Result<Recommendation> {
    filters.validate()?;

    let priced = price_candidates(records);
    let priced_count = priced.len();
    let (candidates, applied) = apply_filters(priced, filters);

    let count = candidates.len();
    let total_profit = candidates.iter().fold(0.0, |acc, c| acc + c.profit);

    info!(
        records = records.len(),
        priced = priced_count,
        count,
        total_profit,
        "Recommended {count} properties, estimated profit ${total_profit:.0}"
    );

    Ok(Recommendation {
        candidates,
        count,
        total_profit,
        applied,
    })
}

/// Buy-flagged, priced candidates before any caller filter.
pub fn price_candidates(records: &[NormalizedRecord]) -> Vec<BuyCandidate> {
    let regions = RegionBaselines::build(records);
    price_with_baselines(records, &regions)
}

/// Records whose region has no baseline are left out rather than compared
/// against a made-up value.
pub fn price_with_baselines(
    records: &[NormalizedRecord],
    regions: &RegionBaselines,
) -> Vec<BuyCandidate> {
    let buys: Vec<(&NormalizedRecord, f64)> = records
        .iter()
        .filter_map(|r| {
            let region_median = regions.get(r.record.zipcode)?;
            is_buy(r, region_median).then_some((r, region_median))
        })
        .collect();

    let region_seasons = RegionSeasonBaselines::build(buys.iter().map(|(r, _)| *r));
    debug!(
        regions = regions.len(),
        buy_flagged = buys.len(),
        region_season_groups = region_seasons.len(),
        "baselines computed"
    );

    buys.into_iter()
        .filter_map(|(r, region_median_price)| {
            let region_season_median_price =
                region_seasons.get(r.record.zipcode, r.features.season)?;
            let resale = price_resale(r.record.price, region_season_median_price);
            Some(BuyCandidate {
                record: r.record.clone(),
                features: r.features,
                region_median_price,
                buy: true,
                region_season_median_price,
                markup: resale.markup,
                sale_price: resale.sale_price,
                profit: resale.profit,
            })
        })
        .collect()
}
