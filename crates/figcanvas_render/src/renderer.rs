//! Renderer - draws paths and markers onto a surface for one pass
//!
//! Figures work in user space (points scaled by dpi, origin bottom-left,
//! y up). The surface works in device space (origin top-left, y down). A
//! [`Renderer`] is built per pass over a borrowed surface and flips every
//! coordinate it hands over.

use figcanvas_paint::{
    to_surface_color, AffineTransform, Path, PathTranslator, Rect, Rgba, Surface, SurfaceColor,
};
use figcanvas_text::{DynFontCache, MathLayout};

use crate::gc::GraphicsState;

/// Per-pass drawing context
pub struct Renderer<'a, S: Surface> {
    pub(crate) surface: &'a mut S,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) dpi: f32,
    pub(crate) fonts: &'a DynFontCache,
    pub(crate) math: Option<&'a dyn MathLayout>,
    /// Saves issued through this renderer and not yet restored
    pub(crate) saves: usize,
}

impl<'a, S: Surface> Renderer<'a, S> {
    /// `width`/`height` are the device pixel size of the surface
    pub fn new(
        surface: &'a mut S,
        width: f32,
        height: f32,
        dpi: f32,
        fonts: &'a DynFontCache,
    ) -> Self {
        Self {
            surface,
            width,
            height,
            dpi,
            fonts,
            math: None,
            saves: 0,
        }
    }

    pub fn with_math_layout(mut self, math: &'a dyn MathLayout) -> Self {
        self.math = Some(math);
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    pub fn surface(&self) -> &S {
        &*self.surface
    }

    pub fn fonts(&self) -> &DynFontCache {
        self.fonts
    }

    /// Surface saves still waiting for their restore
    pub fn open_saves(&self) -> usize {
        self.saves
    }

    pub(crate) fn save(&mut self) {
        self.surface.save();
        self.saves += 1;
    }

    pub(crate) fn restore(&mut self) {
        self.saves = self.saves.saturating_sub(1);
        self.surface.restore();
    }

    /// Restore every save still open, returning how many there were
    pub(crate) fn unwind_saves(&mut self) -> usize {
        let open = self.saves;
        for _ in 0..open {
            self.surface.restore();
        }
        self.saves = 0;
        open
    }

    /// Fresh graphics state with library defaults
    pub fn new_gc(&self) -> GraphicsState {
        GraphicsState::default()
    }

    pub fn points_to_pixels(&self, points: f32) -> f32 {
        points / 72.0 * self.dpi
    }

    /// User space to device space for this surface
    pub fn device_flip(&self) -> AffineTransform {
        AffineTransform::device_flip(self.height)
    }

    fn apply_style(&mut self, gc: &GraphicsState, face: Option<Rgba>) {
        if let Some(face) = face {
            let fill = to_surface_color(face, gc.alpha(), gc.forced_alpha());
            self.surface.set_fill_style(&fill);
        }
        self.surface.set_line_cap(gc.cap_style().to_line_cap());
        self.surface.set_stroke_style(&gc.surface_color());
        let line_width = self.points_to_pixels(gc.line_width());
        self.surface.set_line_width(line_width);
    }

    /// Re-applied after every fill so later fills never inherit a face color
    pub(crate) fn reset_fill_style(&mut self) {
        self.surface.set_fill_style(&SurfaceColor::BLACK);
    }

    /// Draw `path` through `transform` (user space), filled with `face` when
    /// given and stroked when the state strokes.
    ///
    /// Unfilled, unhatched paths are clipped to the figure bounds so far
    /// off-canvas line runs are folded away.
    pub fn draw_path(
        &mut self,
        gc: &GraphicsState,
        path: &Path,
        transform: &AffineTransform,
        face: Option<Rgba>,
    ) {
        self.apply_style(gc, face);
        let figure_clip = (face.is_none() && gc.hatch().is_none())
            .then(|| Rect::new(0.0, 0.0, self.width, self.height));
        let transform = transform.and_then(&self.device_flip());
        let stats = PathTranslator::emit(&mut *self.surface, path, &transform, figure_clip);
        if stats.dropped > 0 || stats.collapsed > 0 {
            tracing::trace!(
                dropped = stats.dropped,
                collapsed = stats.collapsed,
                "path simplified while emitting"
            );
        }
        if face.is_some() {
            self.surface.fill();
            self.reset_fill_style();
        }
        if gc.stroke() {
            self.surface.stroke();
        }
    }

    /// Draw `marker_path` at each vertex of `path`
    ///
    /// Vertices are placed in user space through `transform`; the marker is
    /// drawn through `marker_transform` followed by a translation to the
    /// vertex.
    pub fn draw_markers(
        &mut self,
        gc: &GraphicsState,
        marker_path: &Path,
        marker_transform: &AffineTransform,
        path: &Path,
        transform: &AffineTransform,
        face: Option<Rgba>,
    ) {
        for vertex in path.vertices() {
            let at = transform.transform_point(vertex);
            if !at.is_finite() {
                continue;
            }
            let placed = marker_transform.and_then(&AffineTransform::translation(at.x, at.y));
            self.draw_path(gc, marker_path, &placed, face);
        }
    }
}
