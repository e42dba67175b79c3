use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::engine::pricing::Markup;
use crate::error::AppError;

// ---------------------------------------------------------------------------
// Source rows
// ---------------------------------------------------------------------------

/// One row of the sales CSV, as it appears on disk. The sale date is kept
/// as text until normalization parses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: u64,
    pub date: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft_living: u32,
    pub sqft_lot: u32,
    pub floors: f64,
    pub waterfront: u8,
    pub view: u8,
    pub condition: u8,
    pub grade: u8,
    pub sqft_above: u32,
    pub sqft_basement: u32,
    pub yr_built: u16,
    pub yr_renovated: u16,
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,
    pub sqft_living15: u32,
    pub sqft_lot15: u32,
}

/// Column names the loader requires in the CSV header.
pub const RAW_COLUMNS: [&str; 21] = [
    "id",
    "date",
    "price",
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "sqft_lot",
    "floors",
    "waterfront",
    "view",
    "condition",
    "grade",
    "sqft_above",
    "sqft_basement",
    "yr_built",
    "yr_renovated",
    "zipcode",
    "lat",
    "long",
    "sqft_living15",
    "sqft_lot15",
];

/// A typed sale record. Structural attributes are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: u64,
    pub sale_date: NaiveDate,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft_living: u32,
    pub sqft_lot: u32,
    pub floors: f64,
    pub waterfront: u8,
    pub view: u8,
    pub condition: u8,
    pub grade: u8,
    pub sqft_above: u32,
    /// 0 = no basement
    pub sqft_basement: u32,
    pub year_built: u16,
    /// 0 = never renovated
    pub year_renovated: u16,
    /// Region key used for every price baseline.
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,
    pub sqft_living15: u32,
    pub sqft_lot15: u32,
}

impl PropertyRecord {
    pub fn is_renovated(&self) -> bool {
        self.year_renovated != 0
    }

    pub fn has_basement(&self) -> bool {
        self.sqft_basement != 0
    }

    pub fn has_waterfront(&self) -> bool {
        self.waterfront != 0
    }
}

// ---------------------------------------------------------------------------
// Derived calendar features
// ---------------------------------------------------------------------------

/// Year + month key used for monthly aggregation. Displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Maps a calendar month (1-12) to its season. Only 6-7 are summer, 3-4
    /// spring and 9-11 fall; every other month (including 5 and 8) is winter.
    pub fn from_month(month: u32) -> Self {
        match month {
            6..=7 => Season::Summer,
            3..=4 => Season::Spring,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Season {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            _ => Err(AppError::UnknownSeason(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Categorical classes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionClass {
    /// condition <= 2
    Bad,
    /// condition == 3
    Average,
    /// condition >= 4
    Good,
}

impl ConditionClass {
    pub fn from_condition(condition: u8) -> Self {
        use crate::config::condition_thresholds::*;
        if condition >= GOOD_MIN {
            ConditionClass::Good
        } else if condition == AVERAGE {
            ConditionClass::Average
        } else {
            ConditionClass::Bad
        }
    }
}

impl std::fmt::Display for ConditionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConditionClass::Bad => "bad",
            ConditionClass::Average => "average",
            ConditionClass::Good => "good",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeClass {
    /// grade <= 3
    Low,
    /// grade 4-10
    Average,
    /// grade >= 11
    High,
}

impl GradeClass {
    pub fn from_grade(grade: u8) -> Self {
        use crate::config::grade_thresholds::*;
        if grade <= LOW_MAX {
            GradeClass::Low
        } else if grade < HIGH_MIN {
            GradeClass::Average
        } else {
            GradeClass::High
        }
    }
}

impl std::fmt::Display for GradeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GradeClass::Low => "low",
            GradeClass::Average => "average",
            GradeClass::High => "high",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewClass {
    /// view 0-1
    Bad,
    /// view == 2
    Average,
    /// view 3-4
    Good,
}

impl ViewClass {
    pub fn from_view(view: u8) -> Self {
        use crate::config::view_thresholds::*;
        if view < AVERAGE {
            ViewClass::Bad
        } else if view == AVERAGE {
            ViewClass::Average
        } else {
            ViewClass::Good
        }
    }
}

impl std::fmt::Display for ViewClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ViewClass::Bad => "bad",
            ViewClass::Average => "average",
            ViewClass::Good => "good",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Normalized and recommended rows
// ---------------------------------------------------------------------------

/// Attributes derived from a `PropertyRecord`. Every field is a pure function
/// of the record, so deriving twice yields the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub month: u32,
    pub year: i32,
    pub year_month: YearMonth,
    pub season: Season,
    pub condition_class: ConditionClass,
    pub grade_class: GradeClass,
    pub view_class: ViewClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(flatten)]
    pub record: PropertyRecord,
    #[serde(flatten)]
    pub features: Features,
}

/// A buy-flagged property with its baselines, resale price and profit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyCandidate {
    #[serde(flatten)]
    pub record: PropertyRecord,
    #[serde(flatten)]
    pub features: Features,
    pub region_median_price: f64,
    pub buy: bool,
    pub region_season_median_price: f64,
    pub markup: Markup,
    pub sale_price: f64,
    pub profit: f64,
}
