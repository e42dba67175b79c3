//! Business hypotheses H1-H10, evaluated as group means with a verdict.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::hypothesis_thresholds::*;
use crate::types::{ConditionClass, GradeClass, NormalizedRecord, Season, ViewClass};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub label: String,
    /// `None` when no record falls in the group.
    pub mean: Option<f64>,
    pub count: usize,
}

impl GroupMean {
    fn of<'a>(label: impl Into<String>, records: impl IntoIterator<Item = &'a NormalizedRecord>) -> Self {
        let (sum, count) = records
            .into_iter()
            .fold((0.0, 0usize), |(sum, n), r| (sum + r.record.price, n + 1));
        Self {
            label: label.into(),
            mean: (count > 0).then(|| sum / count as f64),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypothesisResult {
    pub id: &'static str,
    pub statement: &'static str,
    pub groups: Vec<GroupMean>,
    /// `None` when a compared group is empty.
    pub verdict: Option<bool>,
}

/// `test(numerator / denominator)`, or `None` when either mean is missing.
fn ratio_verdict(numerator: &GroupMean, denominator: &GroupMean, test: impl Fn(f64) -> bool) -> Option<bool> {
    let num = numerator.mean?;
    let den = denominator.mean?;
    if den == 0.0 {
        return None;
    }
    Some(test(num / den))
}

/// Every consecutive group must reach `min_ratio` times the previous mean.
fn series_verdict(groups: &[GroupMean], min_ratio: f64) -> Option<bool> {
    if groups.len() < 2 {
        return None;
    }
    let means = groups.iter().map(|g| g.mean).collect::<Option<Vec<f64>>>()?;
    Some(means.windows(2).all(|w| w[0] > 0.0 && w[1] / w[0] >= min_ratio))
}

fn pair(
    id: &'static str,
    statement: &'static str,
    first: GroupMean,
    second: GroupMean,
    verdict: impl Fn(&GroupMean, &GroupMean) -> Option<bool>,
) -> HypothesisResult {
    let verdict = verdict(&first, &second);
    HypothesisResult {
        id,
        statement,
        groups: vec![first, second],
        verdict,
    }
}

pub fn evaluate_hypotheses(records: &[NormalizedRecord]) -> Vec<HypothesisResult> {
    let good_condition = |r: &&NormalizedRecord| r.features.condition_class == ConditionClass::Good;

    let h1 = pair(
        "H1",
        "Properties with waterfront are 100% more expensive, on average",
        GroupMean::of("no waterfront", records.iter().filter(|r| !r.record.has_waterfront())),
        GroupMean::of("waterfront", records.iter().filter(|r| r.record.has_waterfront())),
        |no, yes| ratio_verdict(yes, no, |x| x >= WATERFRONT_PREMIUM),
    );

    let h2 = pair(
        "H2",
        "Properties built in or before 1955 are 50% cheaper, on average",
        GroupMean::of(
            format!("<= {OLD_BUILD_CUTOFF_YEAR}"),
            records.iter().filter(|r| r.record.year_built <= OLD_BUILD_CUTOFF_YEAR),
        ),
        GroupMean::of(
            format!("> {OLD_BUILD_CUTOFF_YEAR}"),
            records.iter().filter(|r| r.record.year_built > OLD_BUILD_CUTOFF_YEAR),
        ),
        |old, new| ratio_verdict(old, new, |x| x <= OLD_BUILD_DISCOUNT),
    );

    let h3 = pair(
        "H3",
        "Properties in bad condition but with good view are 20% cheaper than properties in average condition with average view",
        GroupMean::of(
            "bad condition / good view",
            records.iter().filter(|r| {
                r.features.condition_class == ConditionClass::Bad && r.features.view_class == ViewClass::Good
            }),
        ),
        GroupMean::of(
            "average condition / average view",
            records.iter().filter(|r| {
                r.features.condition_class == ConditionClass::Average
                    && r.features.view_class == ViewClass::Average
            }),
        ),
        |bad_good, avg_avg| ratio_verdict(bad_good, avg_avg, |x| x <= BAD_CONDITION_GOOD_VIEW_DISCOUNT),
    );

    let h4 = {
        let mut by_year: BTreeMap<i32, Vec<&NormalizedRecord>> = BTreeMap::new();
        for r in records {
            by_year.entry(r.features.year).or_default().push(r);
        }
        let groups: Vec<GroupMean> = by_year
            .into_iter()
            .map(|(year, rs)| GroupMean::of(year.to_string(), rs))
            .collect();
        let verdict = series_verdict(&groups, 1.0 + YEAR_OVER_YEAR_GROWTH);
        HypothesisResult {
            id: "H4",
            statement: "Property price grows 10% year over year",
            groups,
            verdict,
        }
    };

    let h5 = {
        let mut by_month = BTreeMap::new();
        for r in records.iter().filter(|r| r.record.bathrooms == MONTH_OVER_MONTH_BATHROOMS) {
            by_month
                .entry(r.features.year_month)
                .or_insert_with(Vec::new)
                .push(r);
        }
        let groups: Vec<GroupMean> = by_month
            .into_iter()
            .map(|(ym, rs)| GroupMean::of(ym.to_string(), rs))
            .collect();
        let verdict = series_verdict(&groups, 1.0 + MONTH_OVER_MONTH_GROWTH);
        HypothesisResult {
            id: "H5",
            statement: "Properties with 3 bathrooms grow 15% month over month",
            groups,
            verdict,
        }
    };

    let h6 = pair(
        "H6",
        "Renovated properties are 40% more expensive, on average",
        GroupMean::of("not renovated", records.iter().filter(|r| !r.record.is_renovated())),
        GroupMean::of("renovated", records.iter().filter(|r| r.record.is_renovated())),
        |plain, renovated| ratio_verdict(renovated, plain, |x| x >= RENOVATION_PREMIUM),
    );

    let h7 = pair(
        "H7",
        "The average property price is 10% higher during summer and spring",
        GroupMean::of(
            "summer & spring",
            records
                .iter()
                .filter(|r| matches!(r.features.season, Season::Summer | Season::Spring)),
        ),
        GroupMean::of(
            "winter & fall",
            records
                .iter()
                .filter(|r| matches!(r.features.season, Season::Winter | Season::Fall)),
        ),
        |warm, cold| ratio_verdict(warm, cold, |x| x >= WARM_SEASON_PREMIUM),
    );

    let h8 = pair(
        "H8",
        "Properties in good condition with basement are 40% more expensive than those without",
        GroupMean::of(
            "no basement",
            records
                .iter()
                .filter(good_condition)
                .filter(|r| !r.record.has_basement()),
        ),
        GroupMean::of(
            "basement",
            records
                .iter()
                .filter(good_condition)
                .filter(|r| r.record.has_basement()),
        ),
        |without, with| ratio_verdict(with, without, |x| x >= BASEMENT_PREMIUM),
    );

    let h9 = {
        let groups: Vec<GroupMean> = [GradeClass::Low, GradeClass::Average, GradeClass::High]
            .into_iter()
            .map(|grade| {
                GroupMean::of(
                    grade.to_string(),
                    records
                        .iter()
                        .filter(good_condition)
                        .filter(|r| r.features.grade_class == grade),
                )
            })
            .collect();
        let verdict = series_verdict(&groups, GRADE_STEP_GROWTH);
        HypothesisResult {
            id: "H9",
            statement: "Price of properties in good condition grows 20% with each grade class",
            groups,
            verdict,
        }
    };

    let h10 = pair(
        "H10",
        "Properties in good condition with good view are 20% more expensive than those with average view",
        GroupMean::of(
            "good condition / good view",
            records
                .iter()
                .filter(good_condition)
                .filter(|r| r.features.view_class == ViewClass::Good),
        ),
        GroupMean::of(
            "good condition / average view",
            records
                .iter()
                .filter(good_condition)
                .filter(|r| r.features.view_class == ViewClass::Average),
        ),
        |good, avg| ratio_verdict(good, avg, |x| x >= GOOD_VIEW_PREMIUM),
    );

    vec![h1, h2, h3, h4, h5, h6, h7, h8, h9, h10]
}
