//! # MTL Loader
//!
//! Loads Wavefront MTL material libraries into renderer-neutral material
//! records.
//!
//! ## Features
//!
//! - **Capability Negotiation**: Every effect is gated by what the active shading system supports
//! - **Texture Options**: `-bm`, `-o`, `-s` and friends are skipped correctly to find the texture path
//! - **Lenient Parsing**: Malformed statements are reported and skipped, never fatal
//! - **Pluggable Storage**: Textures come from the filesystem or from memory
//! - **Configurable**: TOML and RON configuration files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mtl_loader::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LoaderConfig::default();
//!     let textures = TextureResolver::new(config.file_store());
//!     let parser = MtlParser::new(&config.profile, &textures).with_options(config.parse_options());
//!
//!     let library = parser.parse_path(textures.store(), "wood.mtl")?;
//!     for (name, material) in &library {
//!         println!("{}: {:?}", name, material.base_color);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod assets;

/// Common imports for loader users
pub mod prelude {
    pub use crate::{
        assets::{
            AssetStore, FileSystemStore, MemoryStore,
            Capability, CapabilityResolver, ShadingProfile,
            MaterialLibrary, MaterialRecord, AlphaMode,
            MtlParser, MtlError, ParseOptions, ParseReport,
            Texture, TextureLoader, TextureResolver,
        },
        core::config::{Config, ConfigError, LoaderConfig},
        foundation::math::{Vec2, Vec3, Vec4},
    };
}
