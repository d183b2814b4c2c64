//! Seoul Walk Finder Library
//!
//! Exposes the query core, data models, CLI parsing, and the terminal view
//! for use by the binary and by integration tests.

pub mod app;
pub mod cli;
pub mod data;
pub mod finder;
pub mod logging;
pub mod ui;
