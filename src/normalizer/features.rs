use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::{AppError, Result};
use crate::types::{
    ConditionClass, Features, GradeClass, PropertyRecord, RawRecord, Season, ViewClass, YearMonth,
};

/// Date-time layouts seen in sales exports, tried in order.
const DATETIME_FORMATS: &[&str] = &["%Y%m%dT%H%M%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parse the raw sale date of property `id`.
pub fn parse_sale_date(id: u64, raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Ok(d);
        }
    }
    Err(AppError::MalformedDate {
        id,
        value: raw.to_string(),
    })
}

/// Convert a CSV row into a typed record, rejecting unusable dates and prices.
pub fn parse_raw(raw: RawRecord) -> Result<PropertyRecord> {
    let sale_date = parse_sale_date(raw.id, &raw.date)?;
    if !raw.price.is_finite() || raw.price <= 0.0 {
        return Err(AppError::InvalidPrice {
            id: raw.id,
            price: raw.price,
        });
    }

    Ok(PropertyRecord {
        id: raw.id,
        sale_date,
        price: raw.price,
        bedrooms: raw.bedrooms,
        bathrooms: raw.bathrooms,
        sqft_living: raw.sqft_living,
        sqft_lot: raw.sqft_lot,
        floors: raw.floors,
        waterfront: raw.waterfront,
        view: raw.view,
        condition: raw.condition,
        grade: raw.grade,
        sqft_above: raw.sqft_above,
        sqft_basement: raw.sqft_basement,
        year_built: raw.yr_built,
        year_renovated: raw.yr_renovated,
        zipcode: raw.zipcode,
        lat: raw.lat,
        long: raw.long,
        sqft_living15: raw.sqft_living15,
        sqft_lot15: raw.sqft_lot15,
    })
}

pub fn derive_features(record: &PropertyRecord) -> Features {
    let month = record.sale_date.month();
    let year = record.sale_date.year();
    Features {
        month,
        year,
        year_month: YearMonth { year, month },
        season: Season::from_month(month),
        condition_class: ConditionClass::from_condition(record.condition),
        grade_class: GradeClass::from_grade(record.grade),
        view_class: ViewClass::from_view(record.view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compact_dataset_format() {
        let d = parse_sale_date(1, "20141013T000000").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2014, 10, 13).unwrap());
    }

    #[test]
    fn parses_iso_date_and_datetime() {
        let expected = NaiveDate::from_ymd_opt(2015, 2, 25).unwrap();
        assert_eq!(parse_sale_date(1, "2015-02-25").unwrap(), expected);
        assert_eq!(parse_sale_date(1, "2015-02-25T00:00:00").unwrap(), expected);
    }

    #[test]
    fn malformed_date_names_row() {
        match parse_sale_date(42, "13/45/2014") {
            Err(AppError::MalformedDate { id, value }) => {
                assert_eq!(id, 42);
                assert_eq!(value, "13/45/2014");
            }
            other => panic!("expected MalformedDate, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_price_rejected() {
        let raw = RawRecord {
            id: 9,
            date: "20140502T000000".to_string(),
            price: 0.0,
            bedrooms: 3,
            bathrooms: 1.0,
            sqft_living: 1000,
            sqft_lot: 5000,
            floors: 1.0,
            waterfront: 0,
            view: 0,
            condition: 3,
            grade: 7,
            sqft_above: 1000,
            sqft_basement: 0,
            yr_built: 1960,
            yr_renovated: 0,
            zipcode: 98001,
            lat: 47.3,
            long: -122.2,
            sqft_living15: 1000,
            sqft_lot15: 5000,
        };
        assert!(matches!(parse_raw(raw), Err(AppError::InvalidPrice { id: 9, .. })));
    }

    #[test]
    fn features_follow_sale_date_and_ordinals() {
        let raw = RawRecord {
            id: 1,
            date: "20150815T000000".to_string(),
            price: 450000.0,
            bedrooms: 4,
            bathrooms: 2.5,
            sqft_living: 2400,
            sqft_lot: 6000,
            floors: 2.0,
            waterfront: 0,
            view: 3,
            condition: 4,
            grade: 11,
            sqft_above: 2400,
            sqft_basement: 0,
            yr_built: 2001,
            yr_renovated: 0,
            zipcode: 98052,
            lat: 47.6,
            long: -122.1,
            sqft_living15: 2300,
            sqft_lot15: 6100,
        };
        let record = parse_raw(raw).unwrap();
        let f = derive_features(&record);
        assert_eq!(f.month, 8);
        assert_eq!(f.year, 2015);
        assert_eq!(f.year_month.to_string(), "2015-08");
        assert_eq!(f.season, Season::Winter);
        assert_eq!(f.condition_class, ConditionClass::Good);
        assert_eq!(f.grade_class, GradeClass::High);
        assert_eq!(f.view_class, ViewClass::Good);
        assert_eq!(derive_features(&record), f);
    }
}
