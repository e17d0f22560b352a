//! Figure colors and the surface color model
//!
//! Figures describe colors as float RGB(A) tuples in `0.0..=1.0`; the surface
//! takes CSS-like strings. Opaque colors without an alpha channel use the
//! compact `#rrggbb` form, everything translucent uses `rgba(...)`.

use std::fmt;

use crate::format::format_significant;

/// Figure-space color with f32 components (0.0 to 1.0)
///
/// `a` is `None` for a three-channel color. A four-channel color always
/// carries its own alpha, even when it is 1.0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: Option<f32>,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: None }
    }

    /// Create from a 3- or 4-element channel slice
    pub fn from_slice(channels: &[f32]) -> Option<Self> {
        match *channels {
            [r, g, b] => Some(Self::rgb(r, g, b)),
            [r, g, b, a] => Some(Self::new(r, g, b, a)),
            _ => None,
        }
    }

    /// Create from hex value (0xRRGGBB or 0xRRGGBBAA)
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        if hex > 0xFFFFFF {
            Self::new(channel(24), channel(16), channel(8), channel(0))
        } else {
            Self::rgb(channel(16), channel(8), channel(0))
        }
    }

    /// Number of channels the color was given with (3 or 4)
    pub fn channels(&self) -> usize {
        if self.a.is_some() {
            4
        } else {
            3
        }
    }

    /// Scale r, g, b to 0..=255 by truncation
    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
        ]
    }
}

fn channel_to_u8(value: f32) -> u8 {
    // `as` saturates, and NaN becomes 0
    (value * 255.0) as u8
}

/// A color as the surface understands it
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceColor {
    /// Opaque, compact form: `#rrggbb`
    Hex { r: u8, g: u8, b: u8 },
    /// Explicit channels: `rgba(r, g, b, a)`
    Rgba { r: u8, g: u8, b: u8, a: f32 },
}

impl SurfaceColor {
    pub const BLACK: SurfaceColor = SurfaceColor::Hex { r: 0, g: 0, b: 0 };

    /// Whether this is the compact opaque form
    pub fn is_compact(&self) -> bool {
        matches!(self, SurfaceColor::Hex { .. })
    }

    /// Alpha carried by the color (1.0 for the compact form)
    pub fn alpha(&self) -> f32 {
        match self {
            SurfaceColor::Hex { .. } => 1.0,
            SurfaceColor::Rgba { a, .. } => *a,
        }
    }
}

impl fmt::Display for SurfaceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceColor::Hex { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            SurfaceColor::Rgba { r, g, b, a } => {
                write!(f, "rgba({r}, {g}, {b}, {})", format_significant(*a, 3))
            }
        }
    }
}

/// Convert a figure color plus alpha policy into a surface color
///
/// - No alpha anywhere: compact `#rrggbb`.
/// - A supplied `alpha` wins when the color has no alpha channel of its own,
///   or when `force_alpha_override` is set.
/// - Otherwise a four-channel color keeps its own alpha.
pub fn to_surface_color(
    color: Rgba,
    alpha: Option<f32>,
    force_alpha_override: bool,
) -> SurfaceColor {
    let [r, g, b] = color.to_rgb8();
    let effective = match (color.a, alpha) {
        (None, None) => return SurfaceColor::Hex { r, g, b },
        (Some(own), None) => own,
        (None, Some(external)) => external,
        (Some(_), Some(external)) if force_alpha_override => external,
        (Some(own), Some(_)) => own,
    };
    SurfaceColor::Rgba {
        r,
        g,
        b,
        a: effective,
    }
}
