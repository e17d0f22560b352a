//! Font descriptors and the font-loading collaborator contract

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use figcanvas_paint::format::format_significant;
use figcanvas_paint::Path;

use crate::Result;

/// Fixed-point units per pixel used by [`TextExtents`] (26.6 format)
pub const SUBPIXEL_UNITS: f32 = 64.0;

/// Font slant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Oblique => "oblique",
        }
    }
}

/// Generic font category, used as the fallback in font strings and queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenericFamily {
    #[default]
    SansSerif,
    Serif,
    Monospace,
    Cursive,
    Fantasy,
}

impl GenericFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenericFamily::SansSerif => "sans-serif",
            GenericFamily::Serif => "serif",
            GenericFamily::Monospace => "monospace",
            GenericFamily::Cursive => "cursive",
            GenericFamily::Fantasy => "fantasy",
        }
    }
}

/// What a piece of text asks for: family, style, weight and size in points
///
/// Compared and hashed by value, so two independently built descriptors with
/// the same fields are the same cache key.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    pub family: String,
    pub generic: GenericFamily,
    pub style: FontStyle,
    /// CSS weight (100-900, 400 is normal, 700 is bold)
    pub weight: u16,
    /// Size in points
    pub size: f32,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            generic: GenericFamily::default(),
            style: FontStyle::default(),
            weight: 400,
            size,
        }
    }

    pub fn with_generic(mut self, generic: GenericFamily) -> Self {
        self.generic = generic;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Size in device pixels at `dpi`
    pub fn pixel_size(&self, dpi: f32) -> f32 {
        self.size / 72.0 * dpi
    }

    /// Font shorthand for the surface: `{style} {weight} {px}px {family}, {generic}`
    ///
    /// `family` is the name the font was resolved to, which may differ from
    /// the requested one after a generic-family fallback.
    pub fn css_font(&self, family: &str, pixel_size: f32) -> String {
        format!(
            "{} {} {}px {}, {}",
            self.style.as_str(),
            self.weight,
            format_significant(pixel_size, 3),
            family,
            self.generic.as_str()
        )
    }
}

impl PartialEq for FontDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.generic == other.generic
            && self.style == other.style
            && self.weight == other.weight
            && self.size.to_bits() == other.size.to_bits()
    }
}

impl Eq for FontDescriptor {}

impl Hash for FontDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.generic.hash(state);
        self.style.hash(state);
        self.weight.hash(state);
        self.size.to_bits().hash(state);
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}pt {}",
            self.style.as_str(),
            self.weight,
            format_significant(self.size, 3),
            self.family
        )
    }
}

/// Bounding metrics of shaped text, in 1/64 pixel units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtents {
    pub width: i32,
    pub height: i32,
    /// Distance from the baseline down to the lowest ink
    pub descent: i32,
}

impl TextExtents {
    /// `(width, height, descent)` in pixels
    pub fn to_pixels(self) -> (f32, f32, f32) {
        (
            self.width as f32 / SUBPIXEL_UNITS,
            self.height as f32 / SUBPIXEL_UNITS,
            self.descent as f32 / SUBPIXEL_UNITS,
        )
    }
}

/// A loaded font, able to measure text and produce glyph outlines
///
/// Sizes are in points; `dpi` turns them into pixels. Implementations are
/// immutable so one resource can serve any number of passes.
pub trait FontResource: Send + Sync + fmt::Debug {
    /// Family name of the face that was actually loaded
    fn family_name(&self) -> &str;

    /// Shaped bounding metrics of `text`
    fn text_extents(&self, text: &str, size: f32, dpi: f32) -> TextExtents;

    /// Outline of `ch` in pixels, y up, relative to the glyph origin
    fn glyph_outline(&self, ch: char, size: f32, dpi: f32) -> Option<Path>;

    /// Horizontal advance of `ch` in pixels
    fn advance(&self, ch: char, size: f32, dpi: f32) -> Option<f32>;
}

/// Resolves descriptors to loaded fonts
pub trait FontLoader: Send + Sync {
    fn resolve(&self, descriptor: &FontDescriptor) -> Result<Arc<dyn FontResource>>;
}

impl<L: FontLoader + ?Sized> FontLoader for Arc<L> {
    fn resolve(&self, descriptor: &FontDescriptor) -> Result<Arc<dyn FontResource>> {
        (**self).resolve(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(descriptor: &FontDescriptor) -> u64 {
        let mut hasher = DefaultHasher::new();
        descriptor.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn descriptors_compare_by_value() {
        let a = FontDescriptor::new("DejaVu Sans", 10.0).with_weight(700);
        let b = FontDescriptor::new(String::from("DejaVu Sans"), 10.0).with_weight(700);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, b.clone().with_size(11.0));
        assert_ne!(a, b.with_style(FontStyle::Italic));
    }

    #[test]
    fn css_font_string() {
        let descriptor = FontDescriptor::new("DejaVu Sans", 10.0)
            .with_style(FontStyle::Italic)
            .with_weight(700);
        let px = descriptor.pixel_size(200.0);
        assert_eq!(
            descriptor.css_font("DejaVu Sans", px),
            "italic 700 27.8px DejaVu Sans, sans-serif"
        );
        assert_eq!(
            descriptor.css_font("Bitstream Vera Sans", 12.0),
            "italic 700 12px Bitstream Vera Sans, sans-serif"
        );
    }

    #[test]
    fn extents_convert_from_subpixel_units() {
        let extents = TextExtents {
            width: 640,
            height: 96,
            descent: 32,
        };
        assert_eq!(extents.to_pixels(), (10.0, 1.5, 0.5));
    }
}
