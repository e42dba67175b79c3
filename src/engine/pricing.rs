use serde::{Deserialize, Serialize};

use crate::config::markup;

/// Which resale markup a candidate gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Markup {
    /// Region+season median is above the purchase price: conservative 10%.
    Undervalued,
    /// Purchase price is at or above the region+season median: 30%.
    Standard,
}

impl Markup {
    pub fn for_price(price: f64, region_season_median_price: f64) -> Self {
        if region_season_median_price > price {
            Markup::Undervalued
        } else {
            Markup::Standard
        }
    }

    pub fn rate(self) -> f64 {
        match self {
            Markup::Undervalued => markup::UNDERVALUED,
            Markup::Standard => markup::STANDARD,
        }
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Markup::Undervalued => write!(f, "undervalued"),
            Markup::Standard => write!(f, "standard"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resale {
    pub markup: Markup,
    pub sale_price: f64,
    pub profit: f64,
}

pub fn price_resale(price: f64, region_season_median_price: f64) -> Resale {
    let markup = Markup::for_price(price, region_season_median_price);
    let sale_price = price * markup.rate();
    Resale {
        markup,
        sale_price,
        profit: sale_price - price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_seasonal_median_gets_ten_percent() {
        let r = price_resale(80000.0, 90000.0);
        assert_eq!(r.markup, Markup::Undervalued);
        assert_eq!(r.sale_price, 80000.0 * 1.10);
        assert_eq!(r.profit, r.sale_price - 80000.0);
    }

    #[test]
    fn at_or_above_seasonal_median_gets_thirty_percent() {
        let at = price_resale(100000.0, 100000.0);
        assert_eq!(at.markup, Markup::Standard);
        assert_eq!(at.sale_price, 100000.0 * 1.30);

        let above = price_resale(100000.0, 90000.0);
        assert_eq!(above.markup, Markup::Standard);
        assert_eq!(above.sale_price, 100000.0 * 1.30);
        assert_eq!(above.profit, above.sale_price - 100000.0);
    }
}
