//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the loader:
//! - Math types for colors and texture transforms
//! - Logging setup

pub mod math;
pub mod logging;
