//! figcanvas Paint layer
//!
//! The device-independent half of the drawing bridge, plus the contract of the
//! immediate-mode surface it draws on (similar to an HTML canvas 2D context).
//!
//! # Features
//!
//! - Figure colors and their conversion to surface color strings
//! - Paths, points, rectangles and affine transforms
//! - Raster images with top-left origin rows
//! - The [`Surface`] trait and a recording implementation
//! - Path translation into surface calls with the device flip applied

pub mod color;
pub mod format;
pub mod path;
pub mod primitives;
pub mod raster;
pub mod recording;
pub mod surface;
pub mod transform;
pub mod translate;

pub use color::{to_surface_color, Rgba, SurfaceColor};
pub use path::{Path, PathBuilder, PathCommand, Point};
pub use primitives::Rect;
pub use raster::{ImageError, RasterImage};
pub use recording::{RecordedImage, RecordingSurface, SurfaceCall};
pub use surface::{CapStyle, ConfigurationError, LineCap, LineJoin, StyleValue, Surface};
pub use transform::AffineTransform;
pub use translate::PathTranslator;
