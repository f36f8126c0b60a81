//! Shading capability negotiation
//!
//! The parser never names renderer properties directly. It asks a
//! [`CapabilityResolver`] for the identifier behind a logical [`Capability`]
//! and skips the effect entirely when the answer is absent.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical shading parameters the MTL parser can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Diffuse/albedo color with alpha
    BaseColor,
    /// Diffuse/albedo texture
    BaseColorMap,
    /// Specular color
    SpecularColor,
    /// Emission color
    EmissionColor,
    /// Emission texture
    EmissionMap,
    /// Bump/normal texture
    BumpMap,
    /// Bump/normal intensity
    BumpScale,
    /// Shading keyword that switches on normal mapping
    NormalMapKeyword,
    /// Shading keyword that switches on emission
    EmissionKeyword,
    /// Smoothness
    Glossiness,
    /// Metallic/gloss texture, checked before the conventional autoload
    MetallicGlossMap,
    /// Slot the autoloaded metallic/gloss texture is stored under
    MetallicGlossMapStorage,
}

impl Capability {
    /// Every capability, in declaration order
    pub const ALL: [Self; 12] = [
        Self::BaseColor,
        Self::BaseColorMap,
        Self::SpecularColor,
        Self::EmissionColor,
        Self::EmissionMap,
        Self::BumpMap,
        Self::BumpScale,
        Self::NormalMapKeyword,
        Self::EmissionKeyword,
        Self::Glossiness,
        Self::MetallicGlossMap,
        Self::MetallicGlossMapStorage,
    ];

    /// Stable logical name, as used in configuration files
    pub const fn logical_name(self) -> &'static str {
        match self {
            Self::BaseColor => "base_color",
            Self::BaseColorMap => "base_color_map",
            Self::SpecularColor => "specular_color",
            Self::EmissionColor => "emission_color",
            Self::EmissionMap => "emission_map",
            Self::BumpMap => "bump_map",
            Self::BumpScale => "bump_scale",
            Self::NormalMapKeyword => "normal_map_keyword",
            Self::EmissionKeyword => "emission_keyword",
            Self::Glossiness => "glossiness",
            Self::MetallicGlossMap => "metallic_gloss_map",
            Self::MetallicGlossMapStorage => "metallic_gloss_map_storage",
        }
    }

    /// Parse a logical name back into a capability
    pub fn from_logical_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| cap.logical_name() == name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.logical_name())
    }
}

/// Maps logical capabilities to the active shading system's identifiers
///
/// Returning `None` (or an empty string) means the shading system has no such
/// slot. That is not an error; callers skip the corresponding effect.
pub trait CapabilityResolver {
    /// Identifier for `capability`, if the shading system supports it
    fn resolve(&self, capability: Capability) -> Option<String>;
}

/// Resolve a capability, treating the empty-string sentinel as absent
pub fn resolve_supported(resolver: &dyn CapabilityResolver, capability: Capability) -> Option<String> {
    resolver.resolve(capability).filter(|id| !id.is_empty())
}

/// Table-driven capability resolver
///
/// Serializes as a plain table so profiles can live in configuration files:
///
/// ```toml
/// [profile]
/// base_color = "_Color"
/// base_color_map = "_MainTex"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShadingProfile {
    identifiers: BTreeMap<String, String>,
}

impl ShadingProfile {
    /// Profile that supports nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Full lit profile with Standard-shader style identifiers
    ///
    /// The legacy metallic/gloss storage slot is left unmapped,
    /// so the conventional autoloaded texture is loaded but not bound.
    pub fn standard() -> Self {
        Self::empty()
            .with(Capability::BaseColor, "_Color")
            .with(Capability::BaseColorMap, "_MainTex")
            .with(Capability::SpecularColor, "_SpecColor")
            .with(Capability::EmissionColor, "_EmissionColor")
            .with(Capability::EmissionMap, "_EmissionMap")
            .with(Capability::BumpMap, "_BumpMap")
            .with(Capability::BumpScale, "_BumpScale")
            .with(Capability::NormalMapKeyword, "_NORMALMAP")
            .with(Capability::EmissionKeyword, "_EMISSION")
            .with(Capability::Glossiness, "_Glossiness")
            .with(Capability::MetallicGlossMap, "_MetallicGlossMap")
    }

    /// Unlit profile: color and color texture only
    pub fn unlit() -> Self {
        Self::empty()
            .with(Capability::BaseColor, "_Color")
            .with(Capability::BaseColorMap, "_MainTex")
    }

    /// Look up a built-in profile by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(Self::standard()),
            "unlit" => Some(Self::unlit()),
            "empty" | "none" => Some(Self::empty()),
            _ => None,
        }
    }

    /// Map `capability` to `identifier`
    #[must_use]
    pub fn with(mut self, capability: Capability, identifier: impl Into<String>) -> Self {
        self.identifiers.insert(capability.logical_name().to_string(), identifier.into());
        self
    }

    /// Remove support for `capability`
    #[must_use]
    pub fn without(mut self, capability: Capability) -> Self {
        self.identifiers.remove(capability.logical_name());
        self
    }

    /// Whether `capability` maps to a non-empty identifier
    pub fn supports(&self, capability: Capability) -> bool {
        self.identifiers
            .get(capability.logical_name())
            .is_some_and(|id| !id.is_empty())
    }

    /// Table keys that do not name any [`Capability`]
    ///
    /// Usually a typo in a configuration file.
    pub fn unknown_entries(&self) -> Vec<&str> {
        self.identifiers
            .keys()
            .map(String::as_str)
            .filter(|name| Capability::from_logical_name(name).is_none())
            .collect()
    }
}

impl CapabilityResolver for ShadingProfile {
    fn resolve(&self, capability: Capability) -> Option<String> {
        self.identifiers.get(capability.logical_name()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_names_round_trip() {
        for cap in Capability::ALL {
            assert_eq!(Capability::from_logical_name(cap.logical_name()), Some(cap));
        }
        assert_eq!(Capability::from_logical_name("displacement"), None);
    }

    #[test]
    fn test_empty_identifier_is_unsupported() {
        let profile = ShadingProfile::standard().with(Capability::Glossiness, "");
        assert!(!profile.supports(Capability::Glossiness));
        assert_eq!(profile.resolve(Capability::Glossiness), Some(String::new()));
        assert_eq!(resolve_supported(&profile, Capability::Glossiness), None);
    }

    #[test]
    fn test_standard_profile_leaves_storage_slot_unmapped() {
        let profile = ShadingProfile::standard();
        assert!(profile.supports(Capability::MetallicGlossMap));
        assert!(!profile.supports(Capability::MetallicGlossMapStorage));
        assert_eq!(
            resolve_supported(&profile, Capability::BaseColorMap).as_deref(),
            Some("_MainTex")
        );
    }

    #[test]
    fn test_unlit_profile() {
        let profile = ShadingProfile::unlit();
        assert!(profile.supports(Capability::BaseColor));
        assert!(!profile.supports(Capability::BumpMap));
        assert_eq!(ShadingProfile::by_name("Unlit"), Some(profile));
        assert_eq!(ShadingProfile::by_name("toon"), None);
    }

    #[test]
    fn test_profile_from_toml_table() {
        let profile: ShadingProfile = toml::from_str(
            "base_color = \"_BaseColor\"\nbump_map = \"_NormalTex\"\n",
        )
        .unwrap();
        assert_eq!(profile.resolve(Capability::BaseColor).as_deref(), Some("_BaseColor"));
        assert_eq!(profile.resolve(Capability::BumpMap).as_deref(), Some("_NormalTex"));
        assert_eq!(profile.resolve(Capability::Glossiness), None);
        assert!(profile.unknown_entries().is_empty());
    }

    #[test]
    fn test_unknown_entries_are_reported() {
        let profile: ShadingProfile = toml::from_str("base_colour = \"_Color\"\n").unwrap();
        assert_eq!(profile.unknown_entries(), vec!["base_colour"]);
        assert!(!profile.supports(Capability::BaseColor));
    }
}
