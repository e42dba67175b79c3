//! Record builders shared by unit tests.

use chrono::NaiveDate;

use crate::normalizer::derive_features;
use crate::types::{NormalizedRecord, PropertyRecord};

/// A normalized record sold on the 15th of `month` 2014.
pub fn record(id: u64, zipcode: u32, price: f64, condition: u8, month: u32) -> NormalizedRecord {
    let sale_date = NaiveDate::from_ymd_opt(2014, month, 15).expect("valid test date");
    normalized(PropertyRecord {
        id,
        sale_date,
        price,
        bedrooms: 3,
        bathrooms: 2.0,
        sqft_living: 1800,
        sqft_lot: 5000,
        floors: 1.0,
        waterfront: 0,
        view: 0,
        condition,
        grade: 7,
        sqft_above: 1800,
        sqft_basement: 0,
        year_built: 1980,
        year_renovated: 0,
        zipcode,
        lat: 47.5,
        long: -122.3,
        sqft_living15: 1800,
        sqft_lot15: 5000,
    })
}

pub fn normalized(record: PropertyRecord) -> NormalizedRecord {
    let features = derive_features(&record);
    NormalizedRecord { record, features }
}

/// Same as `record`, with a build year.
pub fn built(id: u64, zipcode: u32, price: f64, month: u32, year_built: u16) -> NormalizedRecord {
    let mut r = record(id, zipcode, price, 5, month);
    r.record.year_built = year_built;
    r
}
