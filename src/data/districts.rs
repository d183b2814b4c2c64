//! Static district lookup table
//!
//! The selectable districts come from a small JSON table shaped like
//! `{ "areas": [ { "area": "중구,Jung-gu" }, ... ] }`. The text before the
//! first comma is the value matched against the dataset; the full string
//! is the label shown to the user.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// District table shipped with the binary (the 25 districts of Seoul)
const EMBEDDED_AREAS: &str = include_str!("../../assets/areas.json");

/// Errors that can occur when loading the district table
#[derive(Debug, Error)]
pub enum DistrictError {
    /// The table file could not be read
    #[error("Failed to read district table: {0}")]
    Io(#[from] std::io::Error),

    /// The table is not valid JSON of the expected shape
    #[error("Failed to parse district table: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry has nothing before its first comma
    #[error("District entry '{0}' has an empty name")]
    EmptyValue(String),

    /// The table contains no entries
    #[error("District table contains no entries")]
    Empty,
}

/// A selectable district
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct District {
    /// Name matched against `AREA_GU`, e.g. "중구"
    pub value: String,
    /// Full display label, e.g. "중구,Jung-gu"
    pub label: String,
}

#[derive(Debug, Deserialize)]
struct AreaTable {
    areas: Vec<AreaEntry>,
}

#[derive(Debug, Deserialize)]
struct AreaEntry {
    area: String,
}

impl District {
    /// Builds a district from a raw `area` string
    fn from_area(area: &str) -> Result<Self, DistrictError> {
        let value = area.split(',').next().unwrap_or_default().trim();
        if value.is_empty() {
            return Err(DistrictError::EmptyValue(area.to_string()));
        }
        Ok(Self {
            value: value.to_string(),
            label: area.to_string(),
        })
    }
}

/// Parses a district table from JSON text
pub fn parse_districts(json: &str) -> Result<Vec<District>, DistrictError> {
    let table: AreaTable = serde_json::from_str(json)?;
    if table.areas.is_empty() {
        return Err(DistrictError::Empty);
    }
    table
        .areas
        .iter()
        .map(|entry| District::from_area(&entry.area))
        .collect()
}

/// Loads a district table from a file on disk
pub fn load_districts(path: &Path) -> Result<Vec<District>, DistrictError> {
    let content = fs::read_to_string(path)?;
    parse_districts(&content)
}

/// Returns the embedded district table
pub fn default_districts() -> Result<Vec<District>, DistrictError> {
    parse_districts(EMBEDDED_AREAS)
}

/// Finds the index of the district with the given value
pub fn position_of(districts: &[District], value: &str) -> Option<usize> {
    districts.iter().position(|d| d.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_value_is_text_before_first_comma() {
        let districts =
            parse_districts(r#"{"areas": [{"area": "중구,Jung-gu"}, {"area": "강남구,Gangnam,South"}]}"#)
                .unwrap();

        assert_eq!(districts.len(), 2);
        assert_eq!(districts[0].value, "중구");
        assert_eq!(districts[0].label, "중구,Jung-gu");
        assert_eq!(districts[1].value, "강남구");
        assert_eq!(districts[1].label, "강남구,Gangnam,South");
    }

    #[test]
    fn test_value_is_trimmed() {
        let districts = parse_districts(r#"{"areas": [{"area": " 중구 ,Jung-gu"}]}"#).unwrap();
        assert_eq!(districts[0].value, "중구");
        assert_eq!(districts[0].label, " 중구 ,Jung-gu");
    }

    #[test]
    fn test_area_without_comma_uses_whole_string() {
        let districts = parse_districts(r#"{"areas": [{"area": "마포구"}]}"#).unwrap();
        assert_eq!(districts[0].value, "마포구");
        assert_eq!(districts[0].label, "마포구");
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let result = parse_districts(r#"{"areas": [{"area": ",Nowhere"}]}"#);
        assert!(matches!(result, Err(DistrictError::EmptyValue(_))));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let result = parse_districts(r#"{"areas": []}"#);
        assert!(matches!(result, Err(DistrictError::Empty)));
    }

    #[test]
    fn test_malformed_table_is_parse_error() {
        let result = parse_districts(r#"{"districts": ["중구"]}"#);
        assert!(matches!(result, Err(DistrictError::Parse(_))));
    }

    #[test]
    fn test_default_table_has_all_seoul_districts() {
        let districts = default_districts().expect("embedded table should parse");
        assert_eq!(districts.len(), 25);
        assert!(position_of(&districts, "중구").is_some());
        assert!(position_of(&districts, "강남구").is_some());
        assert!(position_of(&districts, "Jung-gu").is_none());
    }

    #[test]
    fn test_load_districts_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("areas.json");
        fs::write(&path, r#"{"areas": [{"area": "종로구,Jongno-gu"}]}"#).unwrap();

        let districts = load_districts(&path).unwrap();
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].value, "종로구");
    }

    #[test]
    fn test_load_districts_missing_file_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = load_districts(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(DistrictError::Io(_))));
    }
}
