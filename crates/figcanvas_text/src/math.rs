//! Math-layout collaborator contract
//!
//! Math expressions are laid out elsewhere; the bridge only receives glyph
//! placements and filled rectangles (fraction bars, radical overlines) and
//! draws them.

use figcanvas_paint::Path;

use crate::font::{FontDescriptor, FontResource};
use crate::Result;

/// One glyph of a laid-out expression
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPlacement {
    pub font: FontDescriptor,
    /// Size in points
    pub size: f32,
    pub ch: char,
    /// Offset of the glyph origin from the expression origin, y up
    pub ox: f32,
    pub oy: f32,
}

impl GlyphPlacement {
    /// Outline of this glyph from `font`, `None` for blank glyphs
    pub fn outline(&self, font: &dyn FontResource, dpi: f32) -> Option<GlyphOutline> {
        font.glyph_outline(self.ch, self.size, dpi)
            .map(|path| GlyphOutline {
                path,
                ox: self.ox,
                oy: self.oy,
            })
    }
}

/// A glyph outline plus where it goes
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphOutline {
    /// Pixels, y up, relative to the glyph origin
    pub path: Path,
    pub ox: f32,
    pub oy: f32,
}

/// Axis-aligned filled box, corners relative to the expression origin, y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Output of [`MathLayout::parse`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MathLayoutResult {
    pub width: f32,
    pub height: f32,
    /// Extent below the baseline
    pub depth: f32,
    pub glyphs: Vec<GlyphPlacement>,
    pub rects: Vec<FillRect>,
}

/// Lays out math expressions into glyphs and rectangles
pub trait MathLayout: Send + Sync {
    fn parse(&self, expression: &str, dpi: f32, font: &FontDescriptor) -> Result<MathLayoutResult>;
}
