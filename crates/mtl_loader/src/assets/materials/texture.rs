//! Texture resolution for material statements

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::{AssetError, AssetStore, ImageData};

/// A decoded texture bound to a material slot
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Path the texture was requested with (host separators)
    pub path: PathBuf,
    /// Decoded pixels, shared between materials that reference the same file
    pub image: Arc<ImageData>,
}

impl Texture {
    /// Wrap decoded image data
    pub fn new(path: impl Into<PathBuf>, image: ImageData) -> Self {
        Self {
            path: path.into(),
            image: Arc::new(image),
        }
    }

    /// Whether the texture carries an alpha channel
    pub fn has_alpha(&self) -> bool {
        self.image.has_alpha()
    }
}

/// Loads the textures referenced by `map_*` statements
///
/// Implementations report a missing or undecodable texture as `None`; the
/// parser then leaves that one binding unset and carries on.
pub trait TextureLoader {
    /// Load `path`, converting it to a normal map when `is_normal_map` is set
    fn load_texture(&self, path: &Path, is_normal_map: bool) -> Option<Texture>;
}

/// [`TextureLoader`] that decodes images out of an [`AssetStore`]
///
/// Shareable across threads whenever the store is.
#[derive(Debug, Clone, Default)]
pub struct TextureResolver<S> {
    store: S,
}

impl<S: AssetStore> TextureResolver<S> {
    /// Create a resolver over `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the store has an entry for `path`
    pub fn exists(&self, path: &Path) -> bool {
        self.store.exists(path)
    }

    /// Read and decode `path`
    ///
    /// Callers check [`TextureResolver::exists`] first; this still fails
    /// cleanly if the entry vanished or does not decode.
    pub fn load(&self, path: &Path) -> Result<ImageData, AssetError> {
        let bytes = self.store.read(path)?;
        ImageData::from_bytes(&bytes, Some(path))
    }

    /// Convert a color image into the packed normal-map layout
    pub fn convert_to_normal_map(&self, image: &ImageData) -> ImageData {
        image.to_normal_map()
    }
}

impl<S: AssetStore> TextureLoader for TextureResolver<S> {
    fn load_texture(&self, path: &Path, is_normal_map: bool) -> Option<Texture> {
        if !self.exists(path) {
            log::warn!("Texture '{}' file does not exist", path.display());
            return None;
        }

        let image = match self.load(path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Texture '{}' could not be loaded: {}", path.display(), e);
                return None;
            }
        };

        let image = if is_normal_map {
            self.convert_to_normal_map(&image)
        } else {
            image
        };

        log::info!("Loaded texture '{}' ({}x{})", path.display(), image.width, image.height);
        Some(Texture::new(path, image))
    }
}
