//! # Core Module
//!
//! Shared configuration for the loader and the tools built on it.
//!
//! ## Organization
//!
//! - **Config**: [`LoaderConfig`] and the file-format plumbing behind it

pub mod config;

pub use config::{Config, ConfigError, LoaderConfig};
