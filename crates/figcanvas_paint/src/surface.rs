//! The immediate-mode drawing surface contract
//!
//! A [`Surface`] is the target of the bridge: an HTML-canvas-like 2D context
//! with a current path, a save/restore stack for clip and style, and y growing
//! downward from the top-left corner.
//!
//! Style vocabularies differ between the figure model and the surface. Figure
//! cap styles are `butt`, `round` and `projecting`; the surface calls the last
//! one `square`. All figure-facing style names are canonicalized through
//! [`StyleValue`] before they reach a surface.

use std::str::FromStr;

use thiserror::Error;

use crate::color::SurfaceColor;
use crate::raster::ImageError;

/// Invalid style value handed to a style setter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unrecognized cap style. Found {0}")]
    UnknownCapStyle(String),

    #[error("Unrecognized join style. Found {0}")]
    UnknownJoinStyle(String),
}

/// Line cap as the surface names it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Line join, shared by the figure model and the surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

impl FromStr for LineJoin {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miter" => Ok(LineJoin::Miter),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            other => Err(ConfigurationError::UnknownJoinStyle(other.to_string())),
        }
    }
}

/// Line cap as the figure model names it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CapStyle {
    #[default]
    Butt,
    Round,
    Projecting,
}

impl CapStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapStyle::Butt => "butt",
            CapStyle::Round => "round",
            CapStyle::Projecting => "projecting",
        }
    }

    /// The surface's name for this cap
    pub fn to_line_cap(self) -> LineCap {
        match self {
            CapStyle::Butt => LineCap::Butt,
            CapStyle::Round => LineCap::Round,
            CapStyle::Projecting => LineCap::Square,
        }
    }
}

impl FromStr for CapStyle {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(CapStyle::Butt),
            "round" => Ok(CapStyle::Round),
            "projecting" => Ok(CapStyle::Projecting),
            other => Err(ConfigurationError::UnknownCapStyle(other.to_string())),
        }
    }
}

/// A style value accepted either as its enum or by name
///
/// Canonicalization happens once, at the setter, so nothing past it ever
/// sees a string.
pub trait StyleValue<T> {
    fn canonicalize(self) -> Result<T, ConfigurationError>;
}

impl StyleValue<CapStyle> for CapStyle {
    fn canonicalize(self) -> Result<CapStyle, ConfigurationError> {
        Ok(self)
    }
}

impl StyleValue<CapStyle> for &str {
    fn canonicalize(self) -> Result<CapStyle, ConfigurationError> {
        self.parse()
    }
}

impl StyleValue<CapStyle> for String {
    fn canonicalize(self) -> Result<CapStyle, ConfigurationError> {
        self.parse()
    }
}

impl StyleValue<LineJoin> for LineJoin {
    fn canonicalize(self) -> Result<LineJoin, ConfigurationError> {
        Ok(self)
    }
}

impl StyleValue<LineJoin> for &str {
    fn canonicalize(self) -> Result<LineJoin, ConfigurationError> {
        self.parse()
    }
}

impl StyleValue<LineJoin> for String {
    fn canonicalize(self) -> Result<LineJoin, ConfigurationError> {
        self.parse()
    }
}

/// Trait for immediate-mode 2D drawing targets.
///
/// Coordinates are device pixels with the origin at the top-left and y
/// increasing downward. Path construction calls accumulate into the current
/// path until `fill`, `stroke` or `clip` consumes it; `begin_path` discards it.
///
/// # State stack
///
/// `save` pushes clip and style state, `restore` pops it. Callers pair them
/// within a single draw call.
pub trait Surface {
    /// Surface-native intermediate image (an offscreen canvas, a texture, ...)
    type Image;

    /// Snapshot handed out once a pass is complete
    type Bitmap;

    fn save(&mut self);
    fn restore(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32);
    fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32);
    fn close_path(&mut self);
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Fill the current path with the fill style
    fn fill(&mut self);

    /// Stroke the current path with the stroke style
    fn stroke(&mut self);

    /// Intersect the clip region with the current path
    fn clip(&mut self);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    fn translate(&mut self, dx: f32, dy: f32);

    /// Rotate the coordinate system clockwise on screen (radians)
    fn rotate(&mut self, angle: f32);

    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);

    /// Dash lengths in device pixels; empty means solid
    fn set_line_dash(&mut self, lengths: &[f32]);
    fn set_line_dash_offset(&mut self, offset: f32);

    fn set_fill_style(&mut self, color: &SurfaceColor);
    fn set_stroke_style(&mut self, color: &SurfaceColor);

    /// CSS-style font shorthand, e.g. `normal 400 26.7px DejaVu Sans, sans-serif`
    fn set_font(&mut self, font: &str);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    /// Create an intermediate image from tightly packed RGBA rows
    fn create_image(&mut self, width: u32, height: u32, rgba: &[u8])
        -> Result<Self::Image, ImageError>;

    fn draw_image(&mut self, image: &Self::Image, x: f32, y: f32, width: f32, height: f32);

    /// Release an intermediate image created by `create_image`
    fn release_image(&mut self, image: Self::Image);

    /// Hand out the drawn contents; the surface starts over afterwards
    fn transfer_to_bitmap(&mut self) -> Self::Bitmap;
}
