//! District records and the dataset loader.
//!
//! The dataset is a JSON array of `{"output": {...}}` entries. Every record is
//! validated eagerly at load time so a malformed dataset never reaches the
//! index.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// One district-year-scenario observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub district: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub year: i32,
    pub scenario: String,
    pub population_estimate: u64,
    pub avg_annual_rainfall_mm: f64,
    pub groundwater_level_m: f64,
}

impl Record {
    fn from_fields(index: usize, fields: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            district: string_field(index, fields, "district")?,
            latitude: float_field(index, fields, "lat")?,
            longitude: float_field(index, fields, "lon")?,
            year: year_field(index, fields, "year")?,
            scenario: string_field(index, fields, "scenario")?,
            population_estimate: count_field(index, fields, "population_estimate")?,
            avg_annual_rainfall_mm: float_field(index, fields, "avg_annual_rainfall_mm")?,
            groundwater_level_m: float_field(index, fields, "groundwater_level_m")?,
        })
    }
}

fn required<'a>(index: usize, fields: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value> {
    match fields.get(field) {
        None => Err(Error::DataField {
            index,
            field,
            reason: "is missing".to_string(),
        }),
        Some(Value::Null) => Err(Error::DataField {
            index,
            field,
            reason: "is null".to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn type_error(index: usize, field: &'static str, expected: &str, value: &Value) -> Error {
    Error::DataField {
        index,
        field,
        reason: format!("must be {}, got {}", expected, value),
    }
}

fn string_field(index: usize, fields: &Map<String, Value>, field: &'static str) -> Result<String> {
    let value = required(index, fields, field)?;
    match value.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(type_error(index, field, "a non-empty string", value)),
    }
}

fn float_field(index: usize, fields: &Map<String, Value>, field: &'static str) -> Result<f64> {
    let value = required(index, fields, field)?;
    match value.as_f64() {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(type_error(index, field, "a finite number", value)),
    }
}

fn year_field(index: usize, fields: &Map<String, Value>, field: &'static str) -> Result<i32> {
    let value = required(index, fields, field)?;
    value
        .as_i64()
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| type_error(index, field, "an integer year", value))
}

fn count_field(index: usize, fields: &Map<String, Value>, field: &'static str) -> Result<u64> {
    let value = required(index, fields, field)?;
    value
        .as_u64()
        .ok_or_else(|| type_error(index, field, "a non-negative integer", value))
}

/// The loaded, immutable dataset
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Load and validate the dataset at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::error!("Dataset not found: {}", path.display());
            return Err(Error::DataNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&content)?;
        tracing::debug!("Loaded {} entries from {}", store.len(), path.display());
        Ok(store)
    }

    /// Parse and validate a dataset held in memory
    pub fn from_json_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(Error::DataFormat("dataset is empty".to_string()));
        }

        let parsed: Value = serde_json::from_str(content)
            .map_err(|e| Error::DataFormat(format!("invalid JSON: {}", e)))?;

        let entries = parsed
            .as_array()
            .ok_or_else(|| Error::DataFormat("top level must be an array of entries".to_string()))?;

        if entries.is_empty() {
            return Err(Error::DataFormat("dataset contains no records".to_string()));
        }

        let records = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let fields = entry
                    .get("output")
                    .and_then(Value::as_object)
                    .ok_or_else(|| {
                        Error::DataFormat(format!("entry {} has no 'output' object", index))
                    })?;
                Record::from_fields(index, fields)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { records })
    }

    /// Build a store from records that are already typed
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::DataFormat("dataset contains no records".to_string()));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct district names, in first-seen order
    pub fn districts(&self) -> Vec<&str> {
        let mut seen = ahash::AHashSet::new();
        self.records
            .iter()
            .map(|r| r.district.as_str())
            .filter(|d| seen.insert(*d))
            .collect()
    }
}
