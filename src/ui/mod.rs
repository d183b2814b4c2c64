//! UI rendering module for Seoul Walk Finder
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod trail_view;

pub use help_overlay::render as render_help_overlay;
pub use trail_view::render as render_trail_view;
