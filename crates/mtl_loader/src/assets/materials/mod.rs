//! Material system
//!
//! Turns MTL material libraries into [`MaterialRecord`]s, negotiating every
//! shading effect through a [`CapabilityResolver`].

pub mod capabilities;
pub mod material;
pub mod mtl_parser;
pub mod texture;
pub mod tokenizer;

pub use capabilities::{resolve_supported, Capability, CapabilityResolver, ShadingProfile};
pub use material::{AlphaMode, MaterialLibrary, MaterialRecord};
pub use mtl_parser::{Diagnostic, MetallicGlossAutoload, MtlError, MtlParser, ParseOptions, ParseReport};
pub use texture::{Texture, TextureLoader, TextureResolver};
pub use tokenizer::{Keyword, Statement, StatementError};
