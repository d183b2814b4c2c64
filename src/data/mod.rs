//! Core data models for Seoul Walk Finder
//!
//! This module contains the selection types the user drives, the typed
//! dataset row returned by the Seoul open-data API, and the static
//! district lookup table.

pub mod districts;
pub mod trails;

pub use districts::{default_districts, load_districts, parse_districts, District, DistrictError};
pub use trails::{find_first_match, matches, TrailError, TrailsClient};

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// District selected when nothing else is requested
pub const DEFAULT_DISTRICT: &str = "중구";

/// Course difficulty levels used by the `COURSE_LEVEL` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// All levels in display order
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// The exact string the dataset uses for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "초급",
            Level::Intermediate => "중급",
            Level::Advanced => "고급",
        }
    }

    /// English name shown next to the Korean label
    pub fn english_name(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    /// Parses a level from its dataset label or an English alias
    ///
    /// Accepted values (case-insensitive for the English forms):
    /// - "초급", "beginner", "easy"
    /// - "중급", "intermediate", "medium"
    /// - "고급", "advanced", "hard"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "초급" | "beginner" | "easy" => Some(Level::Beginner),
            "중급" | "intermediate" | "medium" => Some(Level::Intermediate),
            "고급" | "advanced" | "hard" => Some(Level::Advanced),
            _ => None,
        }
    }

    /// Next level, wrapping from Advanced back to Beginner
    pub fn next(&self) -> Self {
        match self {
            Level::Beginner => Level::Intermediate,
            Level::Intermediate => Level::Advanced,
            Level::Advanced => Level::Beginner,
        }
    }

    /// Previous level, wrapping from Beginner to Advanced
    pub fn previous(&self) -> Self {
        match self {
            Level::Beginner => Level::Advanced,
            Level::Intermediate => Level::Beginner,
            Level::Advanced => Level::Intermediate,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when building a selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The district must be a non-empty string
    #[error("District must not be empty")]
    EmptyDistrict,
}

/// The (level, district) pair that drives a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Course difficulty, compared exactly against `COURSE_LEVEL`
    pub level: Level,
    /// District name, matched as a substring of `AREA_GU`
    district: String,
}

impl Selection {
    /// Creates a selection, rejecting an empty district
    pub fn new(level: Level, district: impl Into<String>) -> Result<Self, SelectionError> {
        let district = district.into();
        if district.trim().is_empty() {
            return Err(SelectionError::EmptyDistrict);
        }
        Ok(Self { level, district })
    }

    /// The selected district name
    pub fn district(&self) -> &str {
        &self.district
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            level: Level::default(),
            district: DEFAULT_DISTRICT.to_string(),
        }
    }
}

/// A single walking trail row from the `walkSesonInfo` dataset
///
/// Only the fields the finder filters on or displays are mapped; the
/// remaining columns of the dataset are ignored during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrailRecord {
    /// Course name
    #[serde(rename = "COURSE_NAME")]
    pub name: String,
    /// Difficulty label, e.g. "초급"
    #[serde(rename = "COURSE_LEVEL")]
    pub level: String,
    /// Comma-joined list of districts the course passes through
    #[serde(rename = "AREA_GU")]
    pub districts: String,
    /// Expected walking time
    #[serde(rename = "LEAD_TIME")]
    pub duration: String,
    /// Step-by-step route description
    #[serde(rename = "DETAIL_COURSE")]
    pub route_description: String,
    /// Course length, when published
    #[serde(rename = "DISTANCE", default)]
    pub distance: Option<String>,
    /// Nearby subway stations
    #[serde(rename = "RELATE_SUBWAY", default)]
    pub nearby_subway: Option<String>,
    /// Public transport directions
    #[serde(rename = "TRAFFIC_INFO", default)]
    pub traffic_info: Option<String>,
    /// Free-text course introduction
    #[serde(rename = "CONTENT", default)]
    pub content: Option<String>,
    /// Course category name
    #[serde(rename = "COURSE_CATEGORY_NM", default)]
    pub category: Option<String>,
}
