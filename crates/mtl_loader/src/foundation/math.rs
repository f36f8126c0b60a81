//! Math utilities and types
//!
//! Provides the vector types used for colors and texture transforms.

pub use nalgebra::{Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type (RGB colors)
pub type Vec3 = Vector3<f32>;

/// 4D vector type (RGBA colors)
pub type Vec4 = Vector4<f32>;

/// Build an RGBA color from an RGB color and an explicit alpha
pub fn rgba(rgb: Vec3, alpha: f32) -> Vec4 {
    Vec4::new(rgb.x, rgb.y, rgb.z, alpha)
}
