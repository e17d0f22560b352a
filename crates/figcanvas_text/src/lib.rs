//! Fonts for the figcanvas drawing bridge
//!
//! This crate provides:
//! - Font descriptors usable as cache keys
//! - The font-loading collaborator contract ([`FontLoader`], [`FontResource`])
//! - A system font loader (fontdb discovery, ttf-parser outlines, rustybuzz shaping)
//! - A bounded least-recently-used [`FontCache`]
//! - The math-layout collaborator contract ([`MathLayout`])

pub mod cache;
pub mod font;
pub mod math;
pub mod registry;

pub use cache::{DynFontCache, FontCache, DEFAULT_FONT_CACHE_CAPACITY};
pub use font::{
    FontDescriptor, FontLoader, FontResource, FontStyle, GenericFamily, TextExtents,
    SUBPIXEL_UNITS,
};
pub use math::{FillRect, GlyphOutline, GlyphPlacement, MathLayout, MathLayoutResult};
pub use registry::{FaceResource, SystemFontLoader};

use thiserror::Error;

/// Font and text layout errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Failed to load font: {0}")]
    FontLoadError(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Math layout failed: {0}")]
    MathLayout(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
