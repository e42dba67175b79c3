use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::info;

use crate::error::{AppError, Result};
use crate::types::{RawRecord, RAW_COLUMNS};

/// Load the sales CSV at `path`. Fails on the first row that does not match
/// the raw schema; no partial table is returned.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let file = File::open(&path)?;
    let records = read_records(BufReader::new(file))?;
    info!(
        path = %path.as_ref().display(),
        rows = records.len(),
        "Loaded {} sales rows",
        records.len()
    );
    Ok(records)
}

/// Deserialize raw rows from any CSV source with a header line.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if let Some(missing) = RAW_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(AppError::MissingColumn((*missing).to_string()));
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RawRecord = row?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,date,price,bedrooms,bathrooms,sqft_living,sqft_lot,floors,waterfront,view,condition,grade,sqft_above,sqft_basement,yr_built,yr_renovated,zipcode,lat,long,sqft_living15,sqft_lot15";

    #[test]
    fn reads_rows_in_input_order() {
        let csv = format!(
            "{HEADER}\n\
             7129300520,20141013T000000,221900,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5112,-122.257,1340,5650\n\
             6414100192,20141209T000000,538000,3,2.25,2570,7242,2,0,0,3,7,2170,400,1951,1991,98125,47.721,-122.319,1690,7639\n"
        );
        let rows = read_records(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 7129300520);
        assert_eq!(rows[0].date, "20141013T000000");
        assert!((rows[1].bathrooms - 2.25).abs() < 1e-9);
        assert_eq!(rows[1].yr_renovated, 1991);
        assert_eq!(rows[1].zipcode, 98125);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let header_without_zip = HEADER.replace(",zipcode", "");
        let csv = format!("{header_without_zip}\n");
        match read_records(csv.as_bytes()) {
            Err(AppError::MissingColumn(col)) => assert_eq!(col, "zipcode"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_field_is_fatal() {
        let csv = format!(
            "{HEADER}\n\
             1,20141013T000000,not-a-price,3,1,1180,5650,1,0,0,3,7,1180,0,1955,0,98178,47.5,-122.2,1340,5650\n"
        );
        assert!(matches!(read_records(csv.as_bytes()), Err(AppError::Csv(_))));
    }

    #[test]
    fn header_only_yields_empty_table() {
        let csv = format!("{HEADER}\n");
        assert!(read_records(csv.as_bytes()).unwrap().is_empty());
    }
}
