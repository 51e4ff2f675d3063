//! Dataset loading.
//!
//! The whole input file is decoded into memory before anything else
//! happens; a failure anywhere means no records at all.

use crate::error::SalesError;
use crate::models::SaleRecord;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Load every sale record from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<SaleRecord>, SalesError> {
    debug!("Reading sales data from {}", path.display());

    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            SalesError::NotFound(path.to_path_buf())
        } else {
            SalesError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let records = parse_record_bytes(&bytes).map_err(|source| SalesError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded {} sale records from {}", records.len(), path.display());
    Ok(records)
}

/// Decode a JSON array of sale records held in memory.
pub fn parse_records(content: &str) -> Result<Vec<SaleRecord>, serde_json::Error> {
    parse_record_bytes(content.as_bytes())
}

/// Decode raw file bytes; invalid UTF-8 is reported by the JSON decoder.
fn parse_record_bytes(bytes: &[u8]) -> Result<Vec<SaleRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        write_temp_bytes(content.as_bytes())
    }

    fn write_temp_bytes(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_load_records_keeps_file_order() {
        let file = write_temp(
            r#"[
                {"id": 2, "car": {"car_make": "Ford", "car_model": "Ka", "car_year": 2001}, "price": "$1.00", "total_sales": 3},
                {"id": 1, "car": {"car_make": "Audi", "car_model": "A4", "car_year": 2010}, "price": "$2.00", "total_sales": 4},
                {"id": 1, "car": {"car_make": "BMW", "car_model": "M3", "car_year": 2012}, "price": "$3.00", "total_sales": 5}
            ]"#,
        );

        let records = load_records(file.path()).unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1, 1]);
        assert_eq!(records[1].car.car_make, "Audi");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("car_sales.json");

        let err = load_records(&missing).unwrap_err();
        assert!(matches!(err, SalesError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_load_malformed_json() {
        let file = write_temp(r#"[{"id": 1, "car": "#);
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, SalesError::Parse { .. }));
    }

    #[test]
    fn test_load_invalid_utf8_is_a_parse_error() {
        let file = write_temp_bytes(b"[{\"id\": 1, \"car\": \xff\xfe}]");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, SalesError::Parse { path, .. } if path == file.path()));

        let file = write_temp_bytes(
            b"[{\"id\": 1, \"car\": {\"car_make\": \"Fo\xffd\", \"car_model\": \"Ka\", \"car_year\": 2001}, \"price\": \"$1.00\", \"total_sales\": 3}]",
        );
        assert!(matches!(
            load_records(file.path()),
            Err(SalesError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_wrong_shape() {
        let file = write_temp(r#"{"id": 1}"#);
        assert!(matches!(
            load_records(file.path()),
            Err(SalesError::Parse { .. })
        ));

        let file = write_temp(r#"[{"id": 1, "price": "$1.00", "total_sales": 3}]"#);
        assert!(matches!(
            load_records(file.path()),
            Err(SalesError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_empty_array() {
        let file = write_temp("[]");
        assert!(load_records(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_fixture_dataset_parses() {
        let records = parse_records(include_str!("../fixtures/car_sales.json")).unwrap();
        assert!(records.len() >= 10);
        assert!(records.iter().all(|r| r.price.starts_with('$')));
    }
}
