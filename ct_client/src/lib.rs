//! Front end modules for the card tracker.
//!
//! This library provides configuration, command parsing, rendering and the
//! TUI/headless loops used by the ct_client binary, plus the output format
//! of the ct_probe tool.

pub mod commands;
pub mod config;
pub mod controller;
pub mod headless;
pub mod logging;
pub mod probe;
pub mod render;
pub mod tui_app;
