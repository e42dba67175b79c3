use crate::types::{ConditionClass, NormalizedRecord};

/// A property is a buy candidate when it sells strictly below its region's
/// median price and is in good condition.
pub fn is_buy(record: &NormalizedRecord, region_median_price: f64) -> bool {
    record.record.price < region_median_price
        && record.features.condition_class == ConditionClass::Good
}
