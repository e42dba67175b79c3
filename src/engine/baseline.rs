//! Median price baselines per region and per region+season.
//!
//! Both lookups are built in one pass before any record is priced and are
//! never mutated afterwards.

use std::collections::HashMap;
use std::hash::Hash;

use crate::types::{NormalizedRecord, Season};

/// Median with the usual even-count rule (mean of the two middle values).
/// `None` for an empty input.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn group_medians<K: Hash + Eq>(items: impl IntoIterator<Item = (K, f64)>) -> HashMap<K, f64> {
    let mut groups: HashMap<K, Vec<f64>> = HashMap::new();
    for (key, price) in items {
        groups.entry(key).or_default().push(price);
    }
    groups
        .into_iter()
        .filter_map(|(key, prices)| median(prices).map(|m| (key, m)))
        .collect()
}

/// Median price per zipcode over the whole table.
#[derive(Debug, Clone, Default)]
pub struct RegionBaselines {
    by_region: HashMap<u32, f64>,
}

impl RegionBaselines {
    pub fn build<'a>(records: impl IntoIterator<Item = &'a NormalizedRecord>) -> Self {
        Self {
            by_region: group_medians(records.into_iter().map(|r| (r.record.zipcode, r.record.price))),
        }
    }

    pub fn get(&self, zipcode: u32) -> Option<f64> {
        self.by_region.get(&zipcode).copied()
    }

    pub fn len(&self) -> usize {
        self.by_region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }
}

/// Median price per (zipcode, season) over whatever records it is built from.
/// The recommender builds it from buy-flagged records only.
#[derive(Debug, Clone, Default)]
pub struct RegionSeasonBaselines {
    by_group: HashMap<(u32, Season), f64>,
}

impl RegionSeasonBaselines {
    pub fn build<'a>(records: impl IntoIterator<Item = &'a NormalizedRecord>) -> Self {
        Self {
            by_group: group_medians(
                records
                    .into_iter()
                    .map(|r| ((r.record.zipcode, r.features.season), r.record.price)),
            ),
        }
    }

    pub fn get(&self, zipcode: u32, season: Season) -> Option<f64> {
        self.by_group.get(&(zipcode, season)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_group.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(vec![7.0]), Some(7.0));
    }

    #[test]
    fn median_of_nothing_is_undefined() {
        assert_eq!(median(Vec::new()), None);
    }

    #[test]
    fn region_medians_are_per_zipcode() {
        let records = vec![
            record(1, 98001, 100000.0, 5, 6),
            record(2, 98001, 200000.0, 5, 6),
            record(3, 98002, 500000.0, 3, 1),
        ];
        let baselines = RegionBaselines::build(&records);
        assert_eq!(baselines.len(), 2);
        assert_eq!(baselines.get(98001), Some(150000.0));
        assert_eq!(baselines.get(98002), Some(500000.0));
        assert_eq!(baselines.get(98003), None);
    }

    #[test]
    fn region_season_medians_split_by_season() {
        let records = vec![
            record(1, 98001, 100000.0, 5, 6),
            record(2, 98001, 80000.0, 5, 7),
            record(3, 98001, 300000.0, 5, 10),
        ];
        let baselines = RegionSeasonBaselines::build(&records);
        assert_eq!(baselines.get(98001, Season::Summer), Some(90000.0));
        assert_eq!(baselines.get(98001, Season::Fall), Some(300000.0));
        assert_eq!(baselines.get(98001, Season::Spring), None);
    }
}
