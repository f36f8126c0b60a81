//! Asset access and material loading
//!
//! Storage collaborators ([`AssetStore`]) hand raw bytes to the image decoder
//! and the MTL parser; neither of those touches the filesystem directly.

pub mod image_loader;
pub mod materials;
pub mod store;

pub use image_loader::{ImageData, PixelFormat};
pub use materials::{
    Capability, CapabilityResolver, ShadingProfile,
    Texture, TextureLoader, TextureResolver,
    MaterialRecord, MaterialLibrary, AlphaMode,
    MtlParser, MtlError, ParseOptions, ParseReport, Diagnostic, MetallicGlossAutoload,
};
pub use store::{AssetStore, FileSystemStore, MemoryStore, normalize_separators};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
