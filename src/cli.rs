//! Command-line interface parsing for Seoul Walk Finder
//!
//! This module handles parsing of CLI arguments using clap and resolves
//! them, together with the environment, into a [`StartupConfig`].

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::districts::position_of;
use crate::data::trails::DEFAULT_BASE_URL;
use crate::data::{
    default_districts, load_districts, District, DistrictError, Level, Selection, SelectionError,
    DEFAULT_DISTRICT,
};

/// Environment variable holding the open-data API key
pub const API_KEY_ENV: &str = "SEOUL_API_KEY";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified level name is not recognized
    #[error("Invalid level: '{0}'. Valid levels: 초급/beginner, 중급/intermediate, 고급/advanced")]
    InvalidLevel(String),

    /// The specified district is not in the district table
    #[error("Unknown district: '{0}'")]
    UnknownDistrict(String),

    /// The district argument is empty
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// No API key was given on the command line or in the environment
    #[error("Missing API key: pass --api-key or set SEOUL_API_KEY")]
    MissingApiKey,

    /// The district table could not be loaded
    #[error(transparent)]
    Districts(#[from] DistrictError),
}

/// Seoul Walk Finder - Browse Seoul walking trails by level and district
#[derive(Parser, Debug, Default)]
#[command(name = "walkfinder")]
#[command(about = "Find a Seoul walking trail by difficulty and district")]
#[command(version)]
pub struct Cli {
    /// Access key for the Seoul open-data API
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Initial course level (초급, 중급, 고급 or beginner, intermediate, advanced)
    #[arg(long, value_name = "LEVEL")]
    pub level: Option<String>,

    /// Initial district, e.g. 중구
    #[arg(long, value_name = "DISTRICT")]
    pub district: Option<String>,

    /// JSON file replacing the built-in district table
    #[arg(long, value_name = "PATH")]
    pub districts: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Print the result of a single query and exit
    #[arg(long)]
    pub once: bool,

    /// Write logs to this file instead of the default cache location
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// API access key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Selection queried on startup
    pub selection: Selection,
    /// Selectable districts
    pub districts: Vec<District>,
    /// Whether to run a single query and exit
    pub once: bool,
    /// Explicit log file location
    pub log_file: Option<PathBuf>,
}

/// Parses a level string argument into a Level enum.
///
/// # Returns
/// * `Ok(Level)` if the string matches a valid level
/// * `Err(CliError::InvalidLevel)` if the string doesn't match
pub fn parse_level_arg(s: &str) -> Result<Level, CliError> {
    Level::from_str(s).ok_or_else(|| CliError::InvalidLevel(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the resolved settings
    /// * `Err(CliError)` if an argument is invalid, the API key is missing,
    ///   or the district table cannot be loaded
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(CliError::MissingApiKey)?
            .to_string();

        let districts = match &cli.districts {
            Some(path) => load_districts(path)?,
            None => default_districts()?,
        };

        let level = match &cli.level {
            Some(level) => parse_level_arg(level)?,
            None => Level::default(),
        };

        let district = match &cli.district {
            Some(district) => {
                let district = district.trim();
                if district.is_empty() {
                    return Err(SelectionError::EmptyDistrict.into());
                }
                if position_of(&districts, district).is_none() {
                    return Err(CliError::UnknownDistrict(district.to_string()));
                }
                district.to_string()
            }
            None => initial_district(&districts),
        };

        Ok(StartupConfig {
            api_key,
            base_url: cli
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            selection: Selection::new(level, district)?,
            districts,
            once: cli.once,
            log_file: cli.log_file.clone(),
        })
    }
}

/// The default district if the table has it, otherwise the first entry
fn initial_district(districts: &[District]) -> String {
    if position_of(districts, DEFAULT_DISTRICT).is_some() {
        return DEFAULT_DISTRICT.to_string();
    }
    districts
        .first()
        .map(|d| d.value.clone())
        .unwrap_or_else(|| DEFAULT_DISTRICT.to_string())
}
