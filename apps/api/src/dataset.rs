//! Dataset loader: reads the restaurant-inspection CSV once at startup.
//!
//! Missing columns and empty cells are normalized to empty strings so the
//! selector never has to deal with absent values. Zip codes are normalized to
//! integer strings ("10036.0" → "10036", missing → "0").

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::restaurant::Restaurant;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read dataset header: {0}")]
    Header(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "RESTAURANT", default)]
    restaurant: Option<String>,
    #[serde(rename = "CUISINE_DESCRIPTION", default)]
    cuisine_description: Option<String>,
    #[serde(rename = "STREET", default)]
    street: Option<String>,
    #[serde(rename = "BUILDING", default)]
    building: Option<String>,
    #[serde(rename = "ZIPCODE", default)]
    zipcode: Option<String>,
    #[serde(rename = "PHONE", default)]
    phone: Option<String>,
    #[serde(rename = "CRITICALFLAG", default)]
    critical_flag: Option<String>,
}

impl From<RawRow> for Restaurant {
    fn from(row: RawRow) -> Self {
        Restaurant {
            name: row.restaurant.unwrap_or_default(),
            cuisine: row.cuisine_description.unwrap_or_default(),
            street: row.street.unwrap_or_default(),
            building: row.building.unwrap_or_default(),
            zipcode: normalize_zipcode(row.zipcode.as_deref()),
            phone: row.phone.unwrap_or_default(),
            critical_flag: row.critical_flag.unwrap_or_default(),
        }
    }
}

/// The immutable, once-loaded record set. Shared read-only across requests.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Restaurant>,
}

impl Dataset {
    pub fn from_records(records: Vec<Restaurant>) -> Self {
        Self { records }
    }

    /// Loads the dataset from a CSV file on disk.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        info!("Loading restaurant dataset from {}", path.display());

        let reader = csv_builder()
            .from_path(path)
            .map_err(|source| DatasetError::Open {
                path: path.display().to_string(),
                source,
            })?;

        let dataset = Self::from_csv_reader(reader)?;
        info!("Loaded {} restaurant records", dataset.len());
        Ok(dataset)
    }

    /// Loads the dataset from any CSV byte source (used by tests and `load_csv`).
    pub fn from_reader<R: Read>(source: R) -> Result<Self, DatasetError> {
        Self::from_csv_reader(csv_builder().from_reader(source))
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DatasetError> {
        reader.headers()?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in reader.deserialize::<RawRow>() {
            match row {
                Ok(row) => records.push(Restaurant::from(row)),
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping malformed dataset row: {e}");
                }
            }
        }
        if skipped > 0 {
            warn!("Skipped {skipped} malformed dataset rows");
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[Restaurant] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct cuisine descriptions in first-seen order. Empty descriptions are skipped.
    pub fn distinct_cuisines(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.cuisine.as_str())
            .filter(|c| !c.trim().is_empty() && seen.insert(*c))
            .collect()
    }
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true).trim(csv::Trim::All);
    builder
}

/// Zip codes arrive as integers, floats ("10036.0") or blanks.
fn normalize_zipcode(raw: Option<&str>) -> String {
    let parsed = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|z| z.is_finite());

    match parsed {
        Some(z) => format!("{}", z.trunc() as i64),
        None => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
RESTAURANT,CUISINE_DESCRIPTION,STREET,BUILDING,ZIPCODE,PHONE,CRITICALFLAG
Golden Dragon,Chinese,W 44th St,210,10036.0,2125550101,Critical
Pasta Bene,Italian,Broadway,1650,10019,2125550102,Not Critical
Mystery Spot,,,,,,
";

    #[test]
    fn test_from_reader_parses_all_rows() {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[0].name, "Golden Dragon");
        assert_eq!(dataset.records()[1].cuisine, "Italian");
    }

    #[test]
    fn test_float_zipcode_is_normalized() {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].zipcode, "10036");
        assert_eq!(dataset.records()[1].zipcode, "10019");
    }

    #[test]
    fn test_missing_values_become_empty_strings_and_zero_zip() {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let blank = &dataset.records()[2];
        assert_eq!(blank.name, "Mystery Spot");
        assert_eq!(blank.cuisine, "");
        assert_eq!(blank.phone, "");
        assert_eq!(blank.critical_flag, "");
        assert_eq!(blank.zipcode, "0");
    }

    #[test]
    fn test_missing_columns_default_to_empty() {
        let csv = "RESTAURANT,CUISINE_DESCRIPTION\nCorner Cafe,Coffee/Tea\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.cuisine, "Coffee/Tea");
        assert_eq!(record.street, "");
        assert_eq!(record.zipcode, "0");
    }

    #[test]
    fn test_distinct_cuisines_preserves_first_seen_order_and_skips_blank() {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.distinct_cuisines(), vec!["Chinese", "Italian"]);
    }

    #[test]
    fn test_normalize_zipcode_variants() {
        assert_eq!(normalize_zipcode(Some("10025")), "10025");
        assert_eq!(normalize_zipcode(Some(" 10025.0 ")), "10025");
        assert_eq!(normalize_zipcode(Some("N/A")), "0");
        assert_eq!(normalize_zipcode(Some("")), "0");
        assert_eq!(normalize_zipcode(None), "0");
    }

    #[test]
    fn test_load_csv_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

        let dataset = Dataset::load_csv(file.path()).unwrap();
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_load_csv_missing_file_is_an_error() {
        let result = Dataset::load_csv("/definitely/not/here.csv");
        assert!(matches!(result, Err(DatasetError::Open { .. })));
    }
}
