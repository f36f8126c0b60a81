//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl text into a [`MaterialLibrary`]. Every effect is
//! gated by a [`CapabilityResolver`], so statements the active shading system
//! cannot represent are skipped instead of failing. Textures are materialized
//! through a [`TextureLoader`] while parsing.
//!
//! Only a failure to read the input is fatal. Malformed statements are logged,
//! recorded as [`Diagnostic`]s and skipped; parsing continues on the next line.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::capabilities::{resolve_supported, Capability, CapabilityResolver};
use super::material::{MaterialLibrary, MaterialRecord};
use super::texture::{Texture, TextureLoader};
use super::tokenizer::{Keyword, Statement, StatementError};
use crate::assets::{normalize_separators, AssetError, AssetStore};
use crate::foundation::math::{rgba, Vec2};

/// Fatal MTL loading errors
#[derive(Error, Debug)]
pub enum MtlError {
    /// The input stream could not be read
    #[error("Failed to read MTL stream: {0}")]
    Io(#[from] std::io::Error),

    /// The asset store could not produce the MTL file
    #[error("Failed to load MTL file: {0}")]
    Asset(#[from] AssetError),
}

/// A statement that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    /// Statement keyword as written
    pub keyword: String,
    /// Why the statement was skipped
    pub error: StatementError,
}

/// Parse result with the statements that had to be skipped
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Parsed materials
    pub library: MaterialLibrary,
    /// Skipped statements, in line order
    pub diagnostics: Vec<Diagnostic>,
}

/// Automatic loading of a conventional metallic/gloss texture on `newmtl`
///
/// The texture is looked up through the metallic/gloss capability but stored
/// through the separate storage-slot capability, which built-in profiles leave
/// unmapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetallicGlossAutoload {
    /// Whether every `newmtl` tries to load the texture
    pub enabled: bool,
    /// Texture path, either separator style
    pub path: String,
}

impl MetallicGlossAutoload {
    /// Conventional texture location, relative to the texture root
    pub const DEFAULT_PATH: &'static str = "..\\MetallicGlossMap.bmp";

    /// Autoload switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for MetallicGlossAutoload {
    fn default() -> Self {
        Self {
            enabled: true,
            path: Self::DEFAULT_PATH.to_string(),
        }
    }
}

/// Parser behavior switches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Conventional metallic/gloss texture autoload
    pub metallic_gloss: MetallicGlossAutoload,
}

/// MTL file parser
pub struct MtlParser<'a> {
    capabilities: &'a dyn CapabilityResolver,
    textures: &'a dyn TextureLoader,
    options: ParseOptions,
}

impl<'a> MtlParser<'a> {
    /// Create a parser with default options
    pub fn new(capabilities: &'a dyn CapabilityResolver, textures: &'a dyn TextureLoader) -> Self {
        Self {
            capabilities,
            textures,
            options: ParseOptions::default(),
        }
    }

    /// Replace the parse options
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Current parse options
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a complete MTL stream
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Any line ending
    /// convention is accepted.
    pub fn parse<R: Read>(&self, mut reader: R) -> Result<MaterialLibrary, MtlError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let contents = String::from_utf8_lossy(&bytes);
        Ok(self.parse_str(&contents))
    }

    /// Load and parse an MTL file from an asset store
    pub fn parse_path(&self, store: &dyn AssetStore, path: &str) -> Result<MaterialLibrary, MtlError> {
        Ok(self.parse_path_detailed(store, path)?.library)
    }

    /// Load and parse an MTL file, also returning the skipped statements
    pub fn parse_path_detailed(&self, store: &dyn AssetStore, path: &str) -> Result<ParseReport, MtlError> {
        let path = normalize_separators(path);
        log::info!("Loading MTL file '{}'", path.display());
        let bytes = store.read(&path)?;
        Ok(self.parse_detailed(&String::from_utf8_lossy(&bytes)))
    }

    /// Parse MTL text
    pub fn parse_str(&self, contents: &str) -> MaterialLibrary {
        self.parse_detailed(contents).library
    }

    /// Parse MTL text, also returning the skipped statements
    pub fn parse_detailed(&self, contents: &str) -> ParseReport {
        log::info!("Processing MTL source ({} bytes)", contents.len());
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);

        let mut report = ParseReport::default();
        let mut current: Option<MaterialRecord> = None;

        for (line_no, raw) in split_lines(contents) {
            let Some(statement) = Statement::classify(raw) else {
                continue;
            };

            let Some(keyword) = Keyword::from_token(statement.keyword()) else {
                log::trace!("Line {}: ignoring '{}'", line_no, statement.keyword());
                continue;
            };

            if keyword == Keyword::NewMaterial {
                if let Some(finished) = current.take() {
                    report.library.insert(finished);
                }
                current = Some(self.start_material(statement.rest()));
                continue;
            }

            // Anything past here requires a material
            let Some(material) = current.as_mut() else {
                log::debug!("Line {}: '{}' before any newmtl, ignored", line_no, statement.keyword());
                continue;
            };

            if let Err(error) = self.apply(keyword, &statement, material) {
                log::warn!("Line {}: skipping '{}': {}", line_no, statement.line(), error);
                report.diagnostics.push(Diagnostic {
                    line: line_no,
                    keyword: statement.keyword().to_string(),
                    error,
                });
            }
        }

        if let Some(finished) = current {
            report.library.insert(finished);
        }

        log::info!(
            "MTL source processed: {} material(s), {} skipped statement(s)",
            report.library.len(),
            report.diagnostics.len()
        );
        report
    }

    fn supported(&self, capability: Capability) -> Option<String> {
        resolve_supported(self.capabilities, capability)
    }

    fn load_texture(&self, raw_path: &str, is_normal_map: bool) -> Option<Texture> {
        let path = normalize_separators(raw_path);
        self.textures.load_texture(&path, is_normal_map)
    }

    fn start_material(&self, name: &str) -> MaterialRecord {
        log::debug!("New material '{}'", name);
        let mut material = MaterialRecord::new(name);
        self.autoload_metallic_gloss(&mut material);
        material
    }

    fn autoload_metallic_gloss(&self, material: &mut MaterialRecord) {
        let autoload = &self.options.metallic_gloss;
        if !autoload.enabled || self.supported(Capability::MetallicGlossMap).is_none() {
            return;
        }

        let Some(texture) = self.load_texture(&autoload.path, false) else {
            log::info!("Problem loading the common '{}' file", autoload.path);
            return;
        };

        if self.supported(Capability::MetallicGlossMapStorage).is_some() {
            material.metallic_gloss_map = Some(texture);
        } else {
            log::debug!(
                "'{}' loaded for '{}' but no storage slot is mapped, discarded",
                autoload.path, material.name
            );
        }
    }

    fn apply(
        &self,
        keyword: Keyword,
        statement: &Statement<'_>,
        material: &mut MaterialRecord,
    ) -> Result<(), StatementError> {
        match keyword {
            // Handled by the line loop
            Keyword::NewMaterial => Ok(()),
            Keyword::DiffuseColor => self.apply_diffuse_color(statement, material),
            Keyword::DiffuseMap => self.apply_diffuse_map(statement, material),
            Keyword::BumpMap => self.apply_bump_map(statement, material),
            Keyword::SpecularColor => self.apply_specular_color(statement, material),
            Keyword::AmbientColor => self.apply_emission_color(statement, material),
            Keyword::AmbientMap => self.apply_emission_map(statement, material),
            Keyword::Dissolve => self.apply_visibility(statement, material, false),
            Keyword::Transparency => self.apply_visibility(statement, material, true),
            Keyword::SpecularExponent => self.apply_glossiness(statement, material),
        }
    }

    fn apply_diffuse_color(&self, statement: &Statement<'_>, material: &mut MaterialRecord) -> Result<(), StatementError> {
        if self.supported(Capability::BaseColor).is_none() {
            return Ok(());
        }

        let color = statement.color()?;
        material.base_color = rgba(color.rgb, material.base_color.w);
        Ok(())
    }

    fn apply_diffuse_map(&self, statement: &Statement<'_>, material: &mut MaterialRecord) -> Result<(), StatementError> {
        if self.supported(Capability::BaseColorMap).is_none() {
            return Ok(());
        }

        let texture_path = statement.texture_path()?;
        log::debug!("Loading texture '{}'", texture_path);

        let texture = self.load_texture(texture_path, false);

        // Set transparent mode if the texture has transparency
        if texture.as_ref().is_some_and(Texture::has_alpha) {
            material.enable_transparency();
        }
        material.base_color_map = texture;

        // DDS images are stored top-down
        if is_dds(texture_path) {
            material.main_texture_scale = Vec2::new(1.0, -1.0);
        }
        Ok(())
    }

    fn apply_bump_map(&self, statement: &Statement<'_>, material: &mut MaterialRecord) -> Result<(), StatementError> {
        if self.supported(Capability::BumpMap).is_none() {
            return Ok(());
        }

        let texture_path = statement.texture_path()?;
        log::debug!("Loading bump '{}'", texture_path);

        let Some(texture) = self.load_texture(texture_path, true) else {
            return Ok(());
        };
        let bump_scale = statement.option_value("-bm", MaterialRecord::DEFAULT_BUMP_SCALE);

        material.bump_map = Some(texture);
        if self.supported(Capability::BumpScale).is_some() {
            material.bump_scale = Some(bump_scale);
        }
        if let Some(keyword) = self.supported(Capability::NormalMapKeyword) {
            material.enable_keyword(keyword);
        }
        Ok(())
    }

    fn apply_specular_color(&self, statement: &Statement<'_>, material: &mut MaterialRecord) -> Result<(), StatementError> {
        if self.supported(Capability::SpecularColor).is_none() {
            return Ok(());
        }

        material.specular_color = Some(statement.color()?.rgb);
        Ok(())
    }

    fn apply_emission_color(&self, statement: &Statement<'_>, material: &mut MaterialRecord) -> Result<(), StatementError> {
        if self.supported(Capability::EmissionColor).is_none() {
            return Ok(());
        }

        let color = statement.color()?;
        material.emission_color = Some(color.with_default_alpha(MaterialRecord::DEFAULT_EMISSION_ALPHA));
        if let Some(keyword) = self.supported(Capability::EmissionKeyword) {
            material.enable_keyword(keyword);
        }
        Ok(())
    }

    fn apply_emission_map(&self, statement: &Statement<'_>, material: &mut MaterialRecord) -> Result<(), StatementError> {
        if self.supported(Capability::EmissionMap).is_none() {
            return Ok(());
        }

        let texture_path = statement.texture_path()?;
        material.emission_map = self.load_texture(texture_path, false);
        Ok(())
    }

    fn apply_visibility(
        &self,
        statement: &Statement<'_>,
        material: &mut MaterialRecord,
        inverted: bool,
    ) -> Result<(), StatementError> {
        if self.supported(Capability::BaseColor).is_none() {
            return Ok(());
        }

        let value = statement.scalar()?;
        // Tr is d inverted
        let visibility = if inverted { 1.0 - value } else { value };

        if visibility < 1.0 - f32::EPSILON {
            material.base_color.w = visibility;
            material.enable_transparency();
        }
        Ok(())
    }

    fn apply_glossiness(&self, statement: &Statement<'_>, material: &mut MaterialRecord) -> Result<(), StatementError> {
        if self.supported(Capability::Glossiness).is_none() {
            return Ok(());
        }

        // Ns is 0..1000
        material.glossiness = Some(statement.scalar()? / 1000.0);
        Ok(())
    }
}

/// Split on `\n`, `\r\n` and lone `\r`, numbering lines from 1
fn split_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .flat_map(|line| line.split('\r'))
        .enumerate()
        .map(|(index, line)| (index + 1, line))
}

fn is_dds(texture_path: &str) -> bool {
    Path::new(texture_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dds"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::image_loader::png_bytes;
    use crate::assets::materials::capabilities::ShadingProfile;
    use crate::assets::materials::texture::TextureResolver;
    use crate::assets::{ImageData, MemoryStore};
    use crate::foundation::math::{Vec3, Vec4};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::io;
    use std::path::PathBuf;

    /// Loader that resolves every path except those listed as missing
    #[derive(Default)]
    struct StubLoader {
        missing: Vec<PathBuf>,
        requests: RefCell<Vec<(PathBuf, bool)>>,
    }

    impl StubLoader {
        fn missing(paths: &[&str]) -> Self {
            Self {
                missing: paths.iter().map(|p| normalize_separators(p)).collect(),
                ..Self::default()
            }
        }
    }

    impl TextureLoader for StubLoader {
        fn load_texture(&self, path: &Path, is_normal_map: bool) -> Option<Texture> {
            self.requests.borrow_mut().push((path.to_path_buf(), is_normal_map));
            if self.missing.iter().any(|m| m == path) {
                return None;
            }
            Some(Texture::new(path, ImageData::solid_color(1, 1, [255, 255, 255, 255])))
        }
    }

    fn parse_with(profile: &ShadingProfile, loader: &dyn TextureLoader, src: &str) -> ParseReport {
        MtlParser::new(profile, loader)
            .with_options(ParseOptions { metallic_gloss: MetallicGlossAutoload::disabled() })
            .parse_detailed(src)
    }

    fn parse(src: &str) -> MaterialLibrary {
        parse_with(&ShadingProfile::standard(), &StubLoader::default(), src).library
    }

    #[test]
    fn test_wood_end_to_end() {
        let library = parse("newmtl Wood\nKd 0.5 0.3 0.1\nd 0.8\n");
        assert_eq!(library.len(), 1);

        let wood = library.get("Wood").unwrap();
        assert_relative_eq!(wood.base_color, Vec4::new(0.5, 0.3, 0.1, 0.8));
        assert!(wood.is_transparent());
    }

    #[test]
    fn test_empty_input_gives_empty_library() {
        assert!(parse("").is_empty());
        assert!(parse("# only a comment\nKd 1 0 0\n").is_empty());
    }

    #[test]
    fn test_statements_before_newmtl_are_inert() {
        let library = parse("Kd 1 0 0\nNs 900\nnewmtl Late\n");
        let late = library.get("Late").unwrap();
        assert_eq!(late.base_color, Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(late.glossiness, None);
    }

    #[test]
    fn test_malformed_statements_are_skipped() {
        let src = "newmtl Stone\nKd 0.2 0.2 0.2\nKd grey 0.1 0.1\nNs lots\nmap_Kd -bm 2\nKs 0.1 0.2 0.3\n";
        let report = parse_with(&ShadingProfile::standard(), &StubLoader::default(), src);

        let stone = report.library.get("Stone").unwrap();
        assert_relative_eq!(stone.base_color, Vec4::new(0.2, 0.2, 0.2, 1.0));
        assert_eq!(stone.glossiness, None);
        assert!(stone.base_color_map.is_none());
        assert_eq!(stone.specular_color, Some(Vec3::new(0.1, 0.2, 0.3)));

        let lines: Vec<_> = report.diagnostics.iter().map(|d| (d.line, d.keyword.as_str())).collect();
        assert_eq!(lines, vec![(3, "Kd"), (4, "Ns"), (5, "map_Kd")]);
        assert_eq!(report.diagnostics[2].error, StatementError::MissingTexturePath);
    }

    #[test]
    fn test_redeclared_material_replaces_previous() {
        let src = "newmtl X\nKd 1 0 0\nNs 800\nnewmtl Y\nnewmtl X\nKs 0.5 0.5 0.5\n";
        let library = parse(src);
        assert_eq!(library.len(), 2);

        let x = library.get("X").unwrap();
        assert_eq!(x.base_color, Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(x.glossiness, None);
        assert_eq!(x.specular_color, Some(Vec3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_tr_is_inverted_d() {
        let from_tr = parse("newmtl M\nKd 0.4 0.4 0.4\nTr 0.3\n");
        let from_d = parse("newmtl M\nKd 0.4 0.4 0.4\nd 0.7\n");

        let tr_alpha = from_tr.get("M").unwrap().alpha();
        let d_alpha = from_d.get("M").unwrap().alpha();
        assert_relative_eq!(tr_alpha, 0.7, epsilon = 1e-6);
        assert_relative_eq!(tr_alpha, d_alpha, epsilon = 1e-6);
        assert!(from_tr.get("M").unwrap().is_transparent());
    }

    #[test]
    fn test_opaque_visibility_is_ignored() {
        let library = parse("newmtl M\nd 1.0\nTr 0.0\n");
        let m = library.get("M").unwrap();
        assert_eq!(m.alpha(), 1.0);
        assert!(!m.is_transparent());
    }

    #[test]
    fn test_diffuse_color_preserves_alpha() {
        let library = parse("newmtl M\nd 0.25\nKd 0.9 0.8 0.7\n");
        assert_relative_eq!(library.get("M").unwrap().base_color, Vec4::new(0.9, 0.8, 0.7, 0.25));
    }

    #[test]
    fn test_glossiness_is_normalized() {
        for (ns, expected) in [("500", 0.5), ("1000", 1.0), ("0", 0.0)] {
            let library = parse(&format!("newmtl M\nNs {}\n", ns));
            assert_relative_eq!(library.get("M").unwrap().glossiness.unwrap(), expected);
        }
    }

    #[test]
    fn test_emission_color_and_keyword() {
        let library = parse("newmtl Lamp\nKa 1.0 0.5 0.0\n");
        let lamp = library.get("Lamp").unwrap();
        assert_relative_eq!(lamp.emission_color.unwrap(), Vec4::new(1.0, 0.5, 0.0, 0.05));
        assert!(lamp.has_keyword("_EMISSION"));
    }

    #[test]
    fn test_emission_keyword_is_gated_separately() {
        let profile = ShadingProfile::standard().without(Capability::EmissionKeyword);
        let report = parse_with(&profile, &StubLoader::default(), "newmtl Lamp\nKa 1 1 1\n");

        let lamp = report.library.get("Lamp").unwrap();
        assert_relative_eq!(lamp.emission_color.unwrap(), Vec4::new(1.0, 1.0, 1.0, 0.05));
        assert!(lamp.keywords.is_empty());
    }

    #[test]
    fn test_absent_capabilities_are_skipped_silently() {
        let loader = StubLoader::default();
        let src = "newmtl M\nmap_Kd wood.png\nKs 1 1 1\nKa 1 1 1\nNs 10\nmap_Bump n.png\nKd 0.1 0.2 0.3\n";
        let report = parse_with(&ShadingProfile::unlit().without(Capability::BaseColorMap), &loader, src);

        let m = report.library.get("M").unwrap();
        assert!(report.diagnostics.is_empty());
        assert!(m.base_color_map.is_none());
        assert!(m.specular_color.is_none());
        assert!(m.emission_color.is_none());
        assert!(m.glossiness.is_none());
        assert!(m.bump_map.is_none());
        assert!(m.keywords.is_empty());
        assert_relative_eq!(m.base_color, Vec4::new(0.1, 0.2, 0.3, 1.0));
        // Gated statements never reach the loader
        assert!(loader.requests.borrow().is_empty());
    }

    #[test]
    fn test_gated_statement_with_bad_arguments_is_not_an_error() {
        let profile = ShadingProfile::standard().with(Capability::Glossiness, "");
        let report = parse_with(&profile, &StubLoader::default(), "newmtl M\nNs shiny\n");
        assert!(report.diagnostics.is_empty());
        assert!(report.library.get("M").unwrap().glossiness.is_none());
    }

    #[test]
    fn test_bump_map_with_scale() {
        let loader = StubLoader::default();
        let report = parse_with(
            &ShadingProfile::standard(),
            &loader,
            "newmtl Pack\nmap_Bump -bm 2.5 backpack\\textures\\normal.png\n",
        );

        let pack = report.library.get("Pack").unwrap();
        assert!(pack.bump_map.is_some());
        assert_eq!(pack.bump_scale, Some(2.5));
        assert!(pack.has_keyword("_NORMALMAP"));

        let requests = loader.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, normalize_separators("backpack/textures/normal.png"));
        assert!(requests[0].1, "bump maps are requested as normal maps");
    }

    #[test]
    fn test_bump_map_trailing_scale() {
        let library = parse("newmtl Pack\nmap_Bump backpack\\textures\\normal.png -bm 2.5\n");
        let pack = library.get("Pack").unwrap();
        assert_eq!(pack.bump_scale, Some(2.5));
        assert_eq!(
            pack.bump_map.as_ref().unwrap().path,
            normalize_separators("backpack/textures/normal.png -bm 2.5")
        );
    }

    #[test]
    fn test_missing_bump_map_applies_nothing() {
        let loader = StubLoader::missing(&["backpack\\textures\\normal.png -bm 2.5"]);
        let report = parse_with(
            &ShadingProfile::standard(),
            &loader,
            "newmtl Pack\nmap_Bump backpack\\textures\\normal.png -bm 2.5\n",
        );

        let pack = report.library.get("Pack").unwrap();
        assert!(pack.bump_map.is_none());
        assert_eq!(pack.bump_scale, None);
        assert!(!pack.has_keyword("_NORMALMAP"));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_bump_sub_effects_are_gated_individually() {
        let profile = ShadingProfile::standard()
            .without(Capability::BumpScale)
            .without(Capability::NormalMapKeyword);
        let report = parse_with(&profile, &StubLoader::default(), "newmtl M\nmap_Bump -bm 3 n.png\n");

        let m = report.library.get("M").unwrap();
        assert!(m.bump_map.is_some());
        assert_eq!(m.bump_scale, None);
        assert_eq!(m.effective_bump_scale(), 1.0);
        assert!(m.keywords.is_empty());
    }

    #[test]
    fn test_diffuse_map_alpha_enables_blending() {
        let store = MemoryStore::new()
            .with_entry("textures/leaf.png", png_bytes(2, 2, [0, 255, 0, 100], true))
            .with_entry("textures/bark.png", png_bytes(2, 2, [90, 60, 30, 255], false));
        let resolver = TextureResolver::new(store);

        let report = parse_with(
            &ShadingProfile::standard(),
            &resolver,
            "newmtl Leaf\nmap_Kd textures\\leaf.png\nnewmtl Bark\nmap_Kd textures/bark.png\n",
        );

        let leaf = report.library.get("Leaf").unwrap();
        assert!(leaf.base_color_map.is_some());
        assert!(leaf.is_transparent());

        let bark = report.library.get("Bark").unwrap();
        assert!(bark.base_color_map.is_some());
        assert!(!bark.is_transparent());
    }

    #[test]
    fn test_missing_diffuse_map_leaves_binding_unset() {
        let resolver = TextureResolver::new(MemoryStore::new());
        let report = parse_with(&ShadingProfile::standard(), &resolver, "newmtl M\nmap_Kd nowhere.png\nKd 0 0 1\n");

        let m = report.library.get("M").unwrap();
        assert!(m.base_color_map.is_none());
        assert!(!m.is_transparent());
        assert_relative_eq!(m.base_color, Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_missing_diffuse_map_clears_earlier_binding() {
        let store = MemoryStore::new().with_entry("a.png", png_bytes(1, 1, [0, 0, 0, 60], true));
        let resolver = TextureResolver::new(store);
        let report = parse_with(&ShadingProfile::standard(), &resolver, "newmtl M\nmap_Kd a.png\nmap_Kd gone.png\n");

        let m = report.library.get("M").unwrap();
        assert!(m.base_color_map.is_none());
        // Blending enabled by the first texture stays on
        assert!(m.is_transparent());
    }

    #[test]
    fn test_dds_map_flips_vertically() {
        let library = parse("newmtl M\nmap_Kd textures/hull.DDS\n");
        assert_eq!(library.get("M").unwrap().main_texture_scale, Vec2::new(1.0, -1.0));

        let library = parse("newmtl M\nmap_Kd textures/hull.png\n");
        assert_eq!(library.get("M").unwrap().main_texture_scale, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_emission_map() {
        let library = parse("newmtl Screen\nmap_ka -clamp on glow map.png\n");
        let screen = library.get("Screen").unwrap();
        assert_eq!(screen.emission_map.as_ref().unwrap().path, PathBuf::from("glow map.png"));
    }

    #[test]
    fn test_comments_and_blank_lines_change_nothing() {
        let plain = parse("newmtl A\nKd 0.1 0.2 0.3\nNs 100\n");
        let noisy = parse("# header\nnewmtl A\n   \n# this is a comment\nKd 0.1 0.2 0.3\n\t\nNs 100\n");
        assert_eq!(plain, noisy);
    }

    #[test]
    fn test_unknown_keywords_are_ignored() {
        let library = parse("newmtl A\nillum 2\nKe 1 1 1\nmap_Ks spec.png\nNi 1.45\nNs 250\n");
        assert_relative_eq!(library.get("A").unwrap().glossiness.unwrap(), 0.25);
    }

    #[test]
    fn test_material_names_keep_spaces() {
        let library = parse("newmtl Dark Oak  Planks\nKd 0.3 0.2 0.1\n");
        assert!(library.contains("Dark Oak  Planks"));
    }

    #[test]
    fn test_metallic_gloss_autoload_without_storage_slot() {
        let loader = StubLoader::default();
        let profile = ShadingProfile::standard();
        let library = MtlParser::new(&profile, &loader).parse_str("newmtl A\nnewmtl B\n");

        assert!(library.get("A").unwrap().metallic_gloss_map.is_none());
        let requests = loader.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], (normalize_separators("../MetallicGlossMap.bmp"), false));
    }

    #[test]
    fn test_metallic_gloss_autoload_with_storage_slot() {
        let loader = StubLoader::default();
        let profile = ShadingProfile::standard().with(Capability::MetallicGlossMapStorage, "_MetallicGlossMap");
        let library = MtlParser::new(&profile, &loader).parse_str("newmtl A\n");

        let texture = library.get("A").unwrap().metallic_gloss_map.as_ref().unwrap();
        assert_eq!(texture.path, normalize_separators("../MetallicGlossMap.bmp"));
    }

    #[test]
    fn test_metallic_gloss_autoload_missing_texture() {
        let loader = StubLoader::missing(&["..\\MetallicGlossMap.bmp"]);
        let profile = ShadingProfile::standard().with(Capability::MetallicGlossMapStorage, "_MetallicGlossMap");
        let report = MtlParser::new(&profile, &loader).parse_detailed("newmtl A\nKd 1 0 0\n");

        assert!(report.diagnostics.is_empty());
        let a = report.library.get("A").unwrap();
        assert!(a.metallic_gloss_map.is_none());
        assert_relative_eq!(a.base_color, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_metallic_gloss_autoload_disabled_or_unsupported() {
        let loader = StubLoader::default();
        let profile = ShadingProfile::standard();
        parse_with(&profile, &loader, "newmtl A\n");
        assert!(loader.requests.borrow().is_empty());

        let unlit = ShadingProfile::unlit();
        MtlParser::new(&unlit, &loader).parse_str("newmtl A\n");
        assert!(loader.requests.borrow().is_empty());
    }

    #[test]
    fn test_parse_stream_with_mixed_line_endings() {
        let profile = ShadingProfile::standard();
        let loader = StubLoader::default();
        let parser = MtlParser::new(&profile, &loader).with_options(ParseOptions {
            metallic_gloss: MetallicGlossAutoload::disabled(),
        });

        let src = b"newmtl A\r\nKd 0.5 0.5 0.5\rNs 500\nnewmtl B\r\n";
        let library = parser.parse(&src[..]).unwrap();
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["A", "B"]);
        let a = library.get("A").unwrap();
        assert_relative_eq!(a.base_color, Vec4::new(0.5, 0.5, 0.5, 1.0));
        assert_relative_eq!(a.glossiness.unwrap(), 0.5);
    }

    #[test]
    fn test_parse_stream_with_utf8_bom() {
        let profile = ShadingProfile::standard();
        let loader = StubLoader::default();
        let parser = MtlParser::new(&profile, &loader).with_options(ParseOptions {
            metallic_gloss: MetallicGlossAutoload::disabled(),
        });

        let library = parser.parse(&b"\xEF\xBB\xBFnewmtl Wood\nKd 0.5 0.3 0.1\nd 0.8\n"[..]).unwrap();
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["Wood"]);
        assert_relative_eq!(library.get("Wood").unwrap().base_color, Vec4::new(0.5, 0.3, 0.1, 0.8));
    }

    #[test]
    fn test_lone_carriage_returns_number_lines() {
        let report = parse_with(
            &ShadingProfile::standard(),
            &StubLoader::default(),
            "newmtl A\rNs bad\rKd x 1 1\nKs y 1 1\r\n",
        );
        let lines: Vec<_> = report.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn test_unreadable_stream_is_fatal() {
        struct FailingReader;

        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "device unplugged"))
            }
        }

        let profile = ShadingProfile::standard();
        let loader = StubLoader::default();
        let result = MtlParser::new(&profile, &loader).parse(FailingReader);
        assert!(matches!(result, Err(MtlError::Io(_))));
    }

    #[test]
    fn test_parse_path_from_store() {
        let store = MemoryStore::new()
            .with_entry("models\\crate.mtl", b"newmtl Crate\nmap_Kd crate.png\n".to_vec())
            .with_entry("crate.png", png_bytes(1, 1, [10, 10, 10, 255], false));
        let profile = ShadingProfile::standard();
        let resolver = TextureResolver::new(store.clone());
        let parser = MtlParser::new(&profile, &resolver).with_options(ParseOptions {
            metallic_gloss: MetallicGlossAutoload::disabled(),
        });

        let library = parser.parse_path(&store, "models/crate.mtl").unwrap();
        assert!(library.get("Crate").unwrap().base_color_map.is_some());

        let report = parser
            .parse_path_detailed(&store, "models/crate.mtl")
            .unwrap();
        assert!(report.diagnostics.is_empty());

        let missing = parser.parse_path(&store, "models/barrel.mtl");
        assert!(matches!(missing, Err(MtlError::Asset(AssetError::NotFound(_)))));
    }
}
