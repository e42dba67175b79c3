//! Dataset overview: size, sale date interval and descriptive statistics
//! for every numeric attribute except the id.
//!
//! Only source columns are described. Derived features (month, year,
//! season and the classes) are not counted in `attributes` and get no
//! statistics.

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::baseline::median;
use crate::types::{NormalizedRecord, PropertyRecord, RAW_COLUMNS};

type Extractor = fn(&PropertyRecord) -> f64;

const NUMERIC_ATTRIBUTES: &[(&str, Extractor)] = &[
    ("price", |r| r.price),
    ("bedrooms", |r| f64::from(r.bedrooms)),
    ("bathrooms", |r| r.bathrooms),
    ("sqft_living", |r| f64::from(r.sqft_living)),
    ("sqft_lot", |r| f64::from(r.sqft_lot)),
    ("floors", |r| r.floors),
    ("waterfront", |r| f64::from(r.waterfront)),
    ("view", |r| f64::from(r.view)),
    ("condition", |r| f64::from(r.condition)),
    ("grade", |r| f64::from(r.grade)),
    ("sqft_above", |r| f64::from(r.sqft_above)),
    ("sqft_basement", |r| f64::from(r.sqft_basement)),
    ("yr_built", |r| f64::from(r.year_built)),
    ("yr_renovated", |r| f64::from(r.year_renovated)),
    ("zipcode", |r| f64::from(r.zipcode)),
    ("lat", |r| r.lat),
    ("long", |r| r.long),
    ("sqft_living15", |r| f64::from(r.sqft_living15)),
    ("sqft_lot15", |r| f64::from(r.sqft_lot15)),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeStats {
    pub attribute: &'static str,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
}

impl AttributeStats {
    pub fn from_values(attribute: &'static str, values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let std = (values.len() > 1).then(|| {
            let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        });
        let median = median(values)?;

        Some(Self {
            attribute,
            max,
            min,
            mean,
            median,
            std,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataOverview {
    pub rows: usize,
    pub attributes: usize,
    pub first_sale: Option<NaiveDate>,
    pub last_sale: Option<NaiveDate>,
    pub statistics: Vec<AttributeStats>,
}

impl DataOverview {
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let first_sale = records.iter().map(|r| r.record.sale_date).min();
        let last_sale = records.iter().map(|r| r.record.sale_date).max();

        let statistics = NUMERIC_ATTRIBUTES
            .iter()
            .filter_map(|(name, extract)| {
                let values = records.iter().map(|r| extract(&r.record)).collect();
                AttributeStats::from_values(*name, values)
            })
            .collect();

        Self {
            rows: records.len(),
            attributes: RAW_COLUMNS.len(),
            first_sale,
            last_sale,
            statistics,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeStats> {
        self.statistics.iter().find(|s| s.attribute == name)
    }
}
