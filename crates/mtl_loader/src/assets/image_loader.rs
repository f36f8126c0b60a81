//! Image loading utilities for texture data
//!
//! Decodes PNG, JPEG, BMP and TGA data into RGBA8 pixels and keeps track of
//! whether the source carried an alpha channel.

use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::assets::AssetError;

/// Pixel layout of the decoded source image
///
/// Pixel data is always stored as RGBA8; this records what the source had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Three channels, no alpha
    Rgb8,
    /// Four channels with alpha
    Rgba8,
}

impl PixelFormat {
    /// Whether this format has an alpha channel
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba8)
    }
}

/// Loaded image data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Channel layout of the source image
    pub format: PixelFormat,
}

impl ImageData {
    /// Decode an image from memory
    ///
    /// The container format is sniffed from the data; `hint` (usually the
    /// asset path) is consulted for formats without a signature, such as TGA.
    pub fn from_bytes(bytes: &[u8], hint: Option<&Path>) -> Result<Self, AssetError> {
        let format = image::guess_format(bytes)
            .ok()
            .or_else(|| hint.and_then(|path| ImageFormat::from_path(path).ok()))
            .ok_or_else(|| AssetError::InvalidData("Unrecognized image format".to_string()))?;

        let img = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to decode image: {}", e)))?;

        let image = Self::from_dynamic(&img);
        log::debug!(
            "Decoded {:?} image {}x{} ({:?})",
            format, image.width, image.height, image.format
        );
        Ok(image)
    }

    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();
        log::debug!("Loading image from: {:?}", path_ref);

        let bytes = std::fs::read(path_ref)?;
        Self::from_bytes(&bytes, Some(path_ref))
    }

    fn from_dynamic(img: &DynamicImage) -> Self {
        let format = if img.color().has_alpha() {
            PixelFormat::Rgba8
        } else {
            PixelFormat::Rgb8
        };
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        Self {
            data: rgba_img.into_raw(),
            width,
            height,
            format,
        }
    }

    /// Create a solid color image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            data,
            width,
            height,
            format: PixelFormat::Rgba8,
        }
    }

    /// Convert a color texture into the packed normal-map layout
    ///
    /// The X component moves into alpha and the Y component is duplicated into
    /// red, matching what normal-map samplers that reconstruct Z expect.
    #[must_use]
    pub fn to_normal_map(&self) -> Self {
        let mut data = self.data.clone();
        for pixel in data.chunks_exact_mut(4) {
            let (r, g) = (pixel[0], pixel[1]);
            pixel[0] = g;
            pixel[3] = r;
        }

        Self {
            data,
            width: self.width,
            height: self.height,
            format: PixelFormat::Rgba8,
        }
    }

    /// Whether the source image had an alpha channel
    pub fn has_alpha(&self) -> bool {
        self.format.has_alpha()
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Encode a solid-color PNG, optionally without alpha, for tests
#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32, color: [u8; 4], with_alpha: bool) -> Vec<u8> {
    use std::io::Cursor;

    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    if with_alpha {
        image::RgbaImage::from_pixel(width, height, image::Rgba(color))
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
    } else {
        image::RgbImage::from_pixel(width, height, image::Rgb([color[0], color[1], color[2]]))
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
    }
    bytes
}
