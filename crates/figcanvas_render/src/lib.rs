//! figcanvas Render layer
//!
//! Draws figures onto an immediate-mode [`figcanvas_paint::Surface`]:
//!
//! - [`GraphicsState`] for line style, colors and clipping
//! - [`Renderer`] for paths, markers, text and images within one pass
//! - [`FigureCanvas`] for render passes at device pixel ratio and
//!   presenting the result to an [`OutputSink`]
//! - [`FigureManager`] for numbered, titled figures
//!
//! # Example
//!
//! ```ignore
//! use figcanvas_render::prelude::*;
//!
//! let config = RenderConfig::default();
//! let fonts = Arc::new(config.system_font_cache());
//! let canvas = FigureCanvas::new(my_figure, RecordingSurface::new(1280, 960), fonts, &config);
//! let mut manager = FigureManager::new(canvas, 1);
//! manager.show(&mut |output: &BitmapOutput<'_, _>| println!("{}", output.metadata()))?;
//! ```

pub mod config;
pub mod error;
pub mod gc;
pub mod image;
pub mod manager;
pub mod output;
pub mod renderer;
pub mod session;
pub mod text;

pub use config::RenderConfig;
pub use error::{RenderError, Result};
pub use gc::{ClipPath, GraphicsState};
pub use manager::FigureManager;
pub use output::{BitmapOutput, OutputSink, IMAGE_BITMAP_MIME};
pub use renderer::Renderer;
pub use session::{Figure, FigureCanvas, PassFlag, SessionState};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::{
        BitmapOutput, ClipPath, Figure, FigureCanvas, FigureManager, GraphicsState, OutputSink,
        RenderConfig, RenderError, Renderer, Result,
    };

    pub use figcanvas_paint::{
        AffineTransform, CapStyle, LineJoin, Path, PathBuilder, RasterImage, RecordingSurface,
        Rect, Rgba, Surface,
    };
    pub use figcanvas_text::{FontDescriptor, FontStyle, GenericFamily, MathLayout};

    pub use std::sync::Arc;
}
