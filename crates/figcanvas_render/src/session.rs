//! Render sessions - one canvas, one figure, repeated passes
//!
//! A pass raises the figure dpi by the device pixel ratio, lets the figure
//! draw through a [`Renderer`], then puts the dpi back. A shared flag marks a
//! pass in progress so overlapping triggers are refused instead of
//! interleaving on the surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use figcanvas_paint::Surface;
use figcanvas_text::{DynFontCache, MathLayout};

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::output::{BitmapOutput, OutputSink};
use crate::renderer::Renderer;

/// Shared "pass in progress" flag
pub type PassFlag = Arc<AtomicBool>;

/// Something that can lay itself out and draw onto a renderer
pub trait Figure<S: Surface> {
    /// `(width, height)` in inches
    fn size_inches(&self) -> (f32, f32);

    fn draw(&mut self, renderer: &mut Renderer<'_, S>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Drawing,
}

/// Restores dpi and clears the pass flag however the pass ends
struct PassGuard<'a> {
    dpi: &'a mut f32,
    base_dpi: f32,
    drawing: &'a AtomicBool,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        *self.dpi = self.base_dpi;
        self.drawing.store(false, Ordering::Release);
    }
}

/// A figure bound to a surface
pub struct FigureCanvas<F, S: Surface> {
    figure: F,
    surface: S,
    fonts: Arc<DynFontCache>,
    math: Option<Arc<dyn MathLayout>>,
    dpi: f32,
    device_pixel_ratio: f32,
    drawing: PassFlag,
    title: String,
    bitmap: Option<S::Bitmap>,
}

impl<F: Figure<S>, S: Surface> FigureCanvas<F, S> {
    pub fn new(figure: F, surface: S, fonts: Arc<DynFontCache>, config: &RenderConfig) -> Self {
        Self {
            figure,
            surface,
            fonts,
            math: None,
            dpi: config.dpi,
            device_pixel_ratio: config.device_pixel_ratio,
            drawing: Arc::new(AtomicBool::new(false)),
            title: String::new(),
            bitmap: None,
        }
    }

    pub fn with_math_layout(mut self, math: Arc<dyn MathLayout>) -> Self {
        self.math = Some(math);
        self
    }

    pub fn figure(&self) -> &F {
        &self.figure
    }

    pub fn figure_mut(&mut self) -> &mut F {
        &mut self.figure
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn fonts(&self) -> &Arc<DynFontCache> {
        &self.fonts
    }

    /// Figure dpi outside of a pass
    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Handle to the pass flag, for hosts that trigger passes asynchronously
    pub fn pass_flag(&self) -> PassFlag {
        Arc::clone(&self.drawing)
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SessionState {
        if self.is_drawing() {
            SessionState::Drawing
        } else {
            SessionState::Idle
        }
    }

    /// Device pixel size a surface for this figure needs
    pub fn pixel_size(&self) -> (u32, u32) {
        let (width, height) = self.figure.size_inches();
        let scale = self.dpi * self.device_pixel_ratio;
        (
            (width * scale).round() as u32,
            (height * scale).round() as u32,
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_window_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The bitmap from the last successful [`FigureCanvas::show`]
    pub fn bitmap(&self) -> Option<&S::Bitmap> {
        self.bitmap.as_ref()
    }

    /// Run one render pass
    ///
    /// Fails with [`RenderError::PassInProgress`] when a pass is already
    /// running; any failure inside the pass comes back as
    /// [`RenderError::RenderFailure`] with the cause attached. Dpi and the
    /// pass flag are restored before this returns. Saves the pass left open
    /// are restored, and a failed pass leaves nothing on the surface to
    /// present.
    pub fn draw(&mut self) -> Result<()> {
        if self
            .drawing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("render pass requested while another is in progress");
            return Err(RenderError::PassInProgress);
        }

        let base_dpi = self.dpi;
        self.dpi = base_dpi * self.device_pixel_ratio;
        let dpi = self.dpi;
        let guard = PassGuard {
            dpi: &mut self.dpi,
            base_dpi,
            drawing: &self.drawing,
        };

        let (width_in, height_in) = self.figure.size_inches();
        let (width, height) = (width_in * dpi, height_in * dpi);
        tracing::debug!(dpi, width, height, "render pass started");

        let mut renderer = Renderer::new(&mut self.surface, width, height, dpi, &self.fonts);
        if let Some(math) = self.math.as_deref() {
            renderer = renderer.with_math_layout(math);
        }
        let result = self.figure.draw(&mut renderer);
        let open = renderer.unwind_saves();
        if open > 0 {
            tracing::debug!(open, "restored saves left open by the pass");
        }
        drop(guard);

        match result {
            Ok(()) => {
                tracing::debug!("render pass finished");
                Ok(())
            }
            Err(cause) => {
                tracing::warn!(error = %cause, "render pass failed");
                drop(self.surface.transfer_to_bitmap());
                Err(RenderError::RenderFailure(Box::new(cause)))
            }
        }
    }

    /// Draw and present the result to `sink`
    ///
    /// The previous bitmap is released first. After a failed pass nothing is
    /// presented and no bitmap is held.
    pub fn show(&mut self, sink: &mut impl OutputSink<S::Bitmap>) -> Result<()> {
        self.close();
        self.draw()?;
        let bitmap = self.surface.transfer_to_bitmap();
        sink.display(&BitmapOutput::new(&bitmap, &self.title));
        self.bitmap = Some(bitmap);
        Ok(())
    }

    /// Release the presented bitmap
    pub fn close(&mut self) {
        if self.bitmap.take().is_some() {
            tracing::trace!("released presented bitmap");
        }
    }

    pub fn destroy(&mut self) {
        self.close();
        tracing::debug!(title = %self.title, "canvas destroyed");
    }
}
