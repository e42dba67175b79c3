//! Feature normalizer: dedup by id, parse sale dates, derive calendar and
//! categorical attributes.

pub mod dedup;
pub mod features;

use tracing::info;

use crate::error::Result;
use crate::types::{NormalizedRecord, PropertyRecord, RawRecord};

pub use features::{derive_features, parse_sale_date};

/// A row the normalizer accepts. Already-normalized rows qualify, which is
/// what makes `normalize` idempotent.
pub trait SourceRow {
    fn id(&self) -> u64;
    fn into_record(self) -> Result<PropertyRecord>;
}

impl SourceRow for RawRecord {
    fn id(&self) -> u64 {
        self.id
    }

    fn into_record(self) -> Result<PropertyRecord> {
        features::parse_raw(self)
    }
}

impl SourceRow for PropertyRecord {
    fn id(&self) -> u64 {
        self.id
    }

    fn into_record(self) -> Result<PropertyRecord> {
        Ok(self)
    }
}

impl SourceRow for NormalizedRecord {
    fn id(&self) -> u64 {
        self.record.id
    }

    // Derived features are recomputed from the record, never trusted.
    fn into_record(self) -> Result<PropertyRecord> {
        Ok(self.record)
    }
}

/// Normalize a raw table. Any malformed row fails the whole call.
pub fn normalize<R: SourceRow>(rows: impl IntoIterator<Item = R>) -> Result<Vec<NormalizedRecord>> {
    let (rows, duplicates) = dedup::dedup_by_id(rows);
    let rows_kept = rows.len();

    let normalized = rows
        .into_iter()
        .map(|row| -> Result<NormalizedRecord> {
            let record = row.into_record()?;
            let features = derive_features(&record);
            Ok(NormalizedRecord { record, features })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        rows_in = rows_kept + duplicates,
        rows_out = normalized.len(),
        duplicates,
        "Normalized {} rows ({} duplicate ids dropped)",
        normalized.len(),
        duplicates,
    );
    Ok(normalized)
}
