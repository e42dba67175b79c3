//! Caller-adjustable range filters over priced buy candidates.
//!
//! Stages run in a fixed order: year built, price, profit, seasons. A bound
//! side the caller leaves out is taken from the set that reaches that stage,
//! so default price bounds reflect the year-filtered set, and so on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::types::{BuyCandidate, Season};

/// Optional inclusive bounds for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self { min: None, max: None }
    }
}

impl<T> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Effective inclusive range used by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub year_built: Bounds<u16>,
    #[serde(default)]
    pub price: Bounds<f64>,
    #[serde(default)]
    pub profit: Bounds<f64>,
    /// Empty means every season passes.
    #[serde(default)]
    pub seasons: BTreeSet<Season>,
}

impl FilterConfig {
    /// Reject bounds that could only ever produce an empty result by mistake.
    pub fn validate(&self) -> Result<()> {
        check_bounds("year_built", &self.year_built)?;
        check_bounds("price", &self.price)?;
        check_bounds("profit", &self.profit)?;
        Ok(())
    }
}

fn check_bounds<T: Into<f64> + Copy>(field: &'static str, bounds: &Bounds<T>) -> Result<()> {
    let min: Option<f64> = bounds.min.map(Into::into);
    let max: Option<f64> = bounds.max.map(Into::into);
    for value in [min, max].into_iter().flatten() {
        if !value.is_finite() {
            return Err(AppError::InvalidBound { field, value });
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(AppError::InvertedBound { field, min, max });
        }
    }
    Ok(())
}

/// Effective bounds each stage applied. `None` when the stage saw no rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedBounds {
    pub year_built: Option<Range<u16>>,
    pub price: Option<Range<f64>>,
    pub profit: Option<Range<f64>>,
    pub seasons: Vec<Season>,
}

fn observed_range<T, F>(set: &[BuyCandidate], key: &F) -> Option<Range<T>>
where
    T: PartialOrd + Copy,
    F: Fn(&BuyCandidate) -> T,
{
    let mut values = set.iter().map(key);
    let first = values.next()?;
    Some(values.fold(Range { min: first, max: first }, |acc, v| Range {
        min: if v < acc.min { v } else { acc.min },
        max: if v > acc.max { v } else { acc.max },
    }))
}

fn filter_stage<T, F>(
    set: Vec<BuyCandidate>,
    bounds: &Bounds<T>,
    key: F,
) -> (Vec<BuyCandidate>, Option<Range<T>>)
where
    T: PartialOrd + Copy,
    F: Fn(&BuyCandidate) -> T,
{
    let Some(observed) = observed_range(&set, &key) else {
        return (set, None);
    };
    let effective = Range {
        min: bounds.min.unwrap_or(observed.min),
        max: bounds.max.unwrap_or(observed.max),
    };
    let kept = set
        .into_iter()
        .filter(|c| effective.contains(key(c)))
        .collect();
    (kept, Some(effective))
}

fn filter_seasons(set: Vec<BuyCandidate>, seasons: &BTreeSet<Season>) -> Vec<BuyCandidate> {
    if seasons.is_empty() {
        return set;
    }
    set.into_iter()
        .filter(|c| seasons.contains(&c.features.season))
        .collect()
}

/// Run every stage in order. Bounds must already be validated.
pub fn apply_filters(
    candidates: Vec<BuyCandidate>,
    filters: &FilterConfig,
) -> (Vec<BuyCandidate>, AppliedBounds) {
    let before = candidates.len();

    let (set, year_built) =
        filter_stage(candidates, &filters.year_built, |c| c.record.year_built);
    let after_year = set.len();

    let (set, price) = filter_stage(set, &filters.price, |c| c.record.price);
    let after_price = set.len();

    let (set, profit) = filter_stage(set, &filters.profit, |c| c.profit);
    let after_profit = set.len();

    let set = filter_seasons(set, &filters.seasons);

    debug!(
        before,
        after_year,
        after_price,
        after_profit,
        after_seasons = set.len(),
        "filter stages applied"
    );

    (
        set,
        AppliedBounds {
            year_built,
            price,
            profit,
            seasons: filters.seasons.iter().copied().collect(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pricing::price_resale;
    use crate::test_support::built;

    fn candidate(id: u64, price: f64, month: u32, year_built: u16, seasonal_median: f64) -> BuyCandidate {
        let r = built(id, 98001, price, month, year_built);
        let resale = price_resale(price, seasonal_median);
        BuyCandidate {
            record: r.record,
            features: r.features,
            region_median_price: price * 2.0,
            buy: true,
            region_season_median_price: seasonal_median,
            markup: resale.markup,
            sale_price: resale.sale_price,
            profit: resale.profit,
        }
    }

    fn pool() -> Vec<BuyCandidate> {
        vec![
            candidate(1, 100000.0, 6, 1950, 200000.0),
            candidate(2, 250000.0, 3, 1975, 100000.0),
            candidate(3, 400000.0, 10, 1990, 500000.0),
            candidate(4, 600000.0, 1, 2005, 100000.0),
            candidate(5, 150000.0, 7, 2010, 100000.0),
        ]
    }

    fn ids(set: &[BuyCandidate]) -> Vec<u64> {
        set.iter().map(|c| c.record.id).collect()
    }

    #[test]
    fn no_filters_passes_everything_and_reports_data_bounds() {
        let (set, applied) = apply_filters(pool(), &FilterConfig::default());
        assert_eq!(ids(&set), vec![1, 2, 3, 4, 5]);
        assert_eq!(applied.year_built, Some(Range { min: 1950, max: 2010 }));
        assert_eq!(applied.price, Some(Range { min: 100000.0, max: 600000.0 }));
        assert!(applied.seasons.is_empty());
    }

    #[test]
    fn bounds_are_inclusive() {
        let filters = FilterConfig {
            price: Bounds::between(150000.0, 400000.0),
            ..Default::default()
        };
        let (set, _) = apply_filters(pool(), &filters);
        assert_eq!(ids(&set), vec![2, 3, 5]);
    }

    #[test]
    fn default_price_bounds_come_from_year_filtered_set() {
        let filters = FilterConfig {
            year_built: Bounds::between(1970, 1995),
            ..Default::default()
        };
        let (set, applied) = apply_filters(pool(), &filters);
        assert_eq!(ids(&set), vec![2, 3]);
        assert_eq!(applied.price, Some(Range { min: 250000.0, max: 400000.0 }));
    }

    #[test]
    fn one_sided_bound_fills_other_side_from_data() {
        let filters = FilterConfig {
            price: Bounds::new(Some(200000.0), None),
            ..Default::default()
        };
        let (set, applied) = apply_filters(pool(), &filters);
        assert_eq!(ids(&set), vec![2, 3, 4]);
        assert_eq!(applied.price, Some(Range { min: 200000.0, max: 600000.0 }));
    }

    #[test]
    fn empty_season_set_is_pass_through() {
        let (set, _) = apply_filters(pool(), &FilterConfig::default());
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn season_set_keeps_only_members() {
        let filters = FilterConfig {
            seasons: [Season::Summer, Season::Fall].into_iter().collect(),
            ..Default::default()
        };
        let (set, applied) = apply_filters(pool(), &filters);
        assert_eq!(ids(&set), vec![1, 3, 5]);
        assert_eq!(applied.seasons, vec![Season::Summer, Season::Fall]);
    }

    #[test]
    fn explicit_range_filters_commute() {
        let year = Bounds::between(1960u16, 2010);
        let price = Bounds::between(120000.0, 500000.0);
        let profit = Bounds::between(20000.0, 200000.0);

        let (a, _) = filter_stage(pool(), &year, |c| c.record.year_built);
        let (a, _) = filter_stage(a, &price, |c| c.record.price);
        let (a, _) = filter_stage(a, &profit, |c| c.profit);

        let (b, _) = filter_stage(pool(), &profit, |c| c.profit);
        let (b, _) = filter_stage(b, &price, |c| c.record.price);
        let (b, _) = filter_stage(b, &year, |c| c.record.year_built);

        assert_eq!(ids(&a), ids(&b));
        assert_eq!(ids(&a), vec![2, 3, 5]);
    }

    fn profit_of(id: u64) -> f64 {
        pool().into_iter().find(|c| c.record.id == id).unwrap().profit
    }

    #[test]
    fn default_profit_bounds_come_from_price_filtered_set() {
        let filters = FilterConfig {
            price: Bounds::between(150000.0, 400000.0),
            ..Default::default()
        };
        let (set, applied) = apply_filters(pool(), &filters);
        assert_eq!(ids(&set), vec![2, 3, 5]);
        // 3 has the lowest and 2 the highest profit among the survivors;
        // the whole pool would span 1 (10000) to 4 (180000).
        assert_eq!(
            applied.profit,
            Some(Range { min: profit_of(3), max: profit_of(2) })
        );
        assert!(profit_of(1) < profit_of(3));
        assert!(profit_of(4) > profit_of(2));
    }

    #[test]
    fn profit_min_only_takes_max_from_price_filtered_set() {
        let filters = FilterConfig {
            price: Bounds::between(150000.0, 400000.0),
            profit: Bounds::new(Some(42000.0), None),
            ..Default::default()
        };
        let (set, applied) = apply_filters(pool(), &filters);
        assert_eq!(ids(&set), vec![2, 5]);
        assert_eq!(
            applied.profit,
            Some(Range { min: 42000.0, max: profit_of(2) })
        );
    }

    #[test]
    fn empty_input_reports_no_bounds() {
        let (set, applied) = apply_filters(Vec::new(), &FilterConfig::default());
        assert!(set.is_empty());
        assert_eq!(applied.year_built, None);
        assert_eq!(applied.price, None);
        assert_eq!(applied.profit, None);
    }

    #[test]
    fn inverted_bound_is_rejected() {
        let filters = FilterConfig {
            profit: Bounds::between(5000.0, 1000.0),
            ..Default::default()
        };
        match filters.validate() {
            Err(AppError::InvertedBound { field, min, max }) => {
                assert_eq!(field, "profit");
                assert_eq!(min, 5000.0);
                assert_eq!(max, 1000.0);
            }
            other => panic!("expected InvertedBound, got {other:?}"),
        }
    }

    #[test]
    fn inverted_year_bound_is_rejected() {
        let filters = FilterConfig {
            year_built: Bounds::between(2000, 1990),
            ..Default::default()
        };
        assert!(matches!(
            filters.validate(),
            Err(AppError::InvertedBound { field: "year_built", .. })
        ));
    }

    #[test]
    fn non_finite_bound_is_rejected() {
        let filters = FilterConfig {
            price: Bounds::new(Some(f64::NAN), None),
            ..Default::default()
        };
        assert!(matches!(
            filters.validate(),
            Err(AppError::InvalidBound { field: "price", .. })
        ));
    }
}
