//! Scenecast Common Utilities
//!
//! Shared infrastructure for all Scenecast crates:
//! - Error types and result aliases
//! - Frame clock and pacing utilities for capture and live streams
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
