//! Material records produced by the MTL parser

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use super::texture::Texture;
use crate::foundation::math::{Vec2, Vec3, Vec4};

/// Alpha blending modes for materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    /// No transparency
    #[default]
    Opaque,
    /// Alpha blending
    Blend,
}

/// Shading parameters for one named material
///
/// Unset optional fields mean the MTL source never supplied the value, or the
/// active shading system has no slot for it.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    /// Material name (the `newmtl` argument)
    pub name: String,
    /// Base color (Kd) with alpha (d / Tr)
    pub base_color: Vec4,
    /// Specular color (Ks)
    pub specular_color: Option<Vec3>,
    /// Emission color (Ka)
    pub emission_color: Option<Vec4>,
    /// Glossiness in 0..1 (Ns / 1000)
    pub glossiness: Option<f32>,
    /// Bump map strength, only ever set together with `bump_map`
    pub bump_scale: Option<f32>,
    /// Base color texture (map_Kd)
    pub base_color_map: Option<Texture>,
    /// Normal map converted from map_Bump
    pub bump_map: Option<Texture>,
    /// Emission texture (map_Ka)
    pub emission_map: Option<Texture>,
    /// Conventional metallic/gloss texture loaded on `newmtl`
    pub metallic_gloss_map: Option<Texture>,
    /// Scale applied to base color texture coordinates
    pub main_texture_scale: Vec2,
    /// Blending mode
    pub alpha_mode: AlphaMode,
    /// Enabled shading keywords, by shading-system identifier
    pub keywords: BTreeSet<String>,
}

impl MaterialRecord {
    /// Default bump scale when none was set
    pub const DEFAULT_BUMP_SCALE: f32 = 1.0;

    /// Alpha given to emission colors that do not specify one
    pub const DEFAULT_EMISSION_ALPHA: f32 = 0.05;

    /// Create a record with default parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular_color: None,
            emission_color: None,
            glossiness: None,
            bump_scale: None,
            base_color_map: None,
            bump_map: None,
            emission_map: None,
            metallic_gloss_map: None,
            main_texture_scale: Vec2::new(1.0, 1.0),
            alpha_mode: AlphaMode::Opaque,
            keywords: BTreeSet::new(),
        }
    }

    /// Alpha channel of the base color
    pub fn alpha(&self) -> f32 {
        self.base_color.w
    }

    /// Bump scale, falling back to [`MaterialRecord::DEFAULT_BUMP_SCALE`]
    pub fn effective_bump_scale(&self) -> f32 {
        self.bump_scale.unwrap_or(Self::DEFAULT_BUMP_SCALE)
    }

    /// Switch the material to alpha blending
    pub fn enable_transparency(&mut self) {
        self.alpha_mode = AlphaMode::Blend;
    }

    /// Whether alpha blending is enabled
    pub fn is_transparent(&self) -> bool {
        self.alpha_mode == AlphaMode::Blend
    }

    /// Enable a shading keyword
    pub fn enable_keyword(&mut self, keyword: impl Into<String>) {
        self.keywords.insert(keyword.into());
    }

    /// Whether a shading keyword is enabled
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }
}

/// Materials parsed from one MTL source, keyed by name
///
/// Iteration is ordered by name, so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    materials: BTreeMap<String, MaterialRecord>,
}

impl MaterialLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its own name, replacing any previous one
    pub fn insert(&mut self, record: MaterialRecord) -> Option<MaterialRecord> {
        self.materials.insert(record.name.clone(), record)
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<&MaterialRecord> {
        self.materials.get(name)
    }

    /// Whether a material with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library has no materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Material names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    /// Iterate over `(name, record)` pairs
    pub fn iter(&self) -> btree_map::Iter<'_, String, MaterialRecord> {
        self.materials.iter()
    }
}

impl IntoIterator for MaterialLibrary {
    type Item = (String, MaterialRecord);
    type IntoIter = btree_map::IntoIter<String, MaterialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.materials.into_iter()
    }
}

impl<'a> IntoIterator for &'a MaterialLibrary {
    type Item = (&'a String, &'a MaterialRecord);
    type IntoIter = btree_map::Iter<'a, String, MaterialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.materials.iter()
    }
}
