//! Graphics state - per-draw style and clip settings
//!
//! Setters that affect surface state (cap, join, width, dashes, clipping)
//! apply immediately through the renderer they are given. Colors and hatch
//! are only read when something is drawn.

use figcanvas_paint::{
    to_surface_color, AffineTransform, CapStyle, ConfigurationError, LineJoin, Path,
    PathTranslator, Rect, Rgba, StyleValue, Surface, SurfaceColor,
};

use crate::renderer::Renderer;

/// A clip path in user space plus the transform that places it
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPath {
    pub path: Path,
    pub transform: AffineTransform,
}

impl ClipPath {
    pub fn new(path: Path, transform: AffineTransform) -> Self {
        Self { path, transform }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsState {
    rgb: Rgba,
    alpha: Option<f32>,
    forced_alpha: bool,
    line_width: f32,
    stroke: bool,
    cap_style: CapStyle,
    join_style: LineJoin,
    dash_offset: Option<f32>,
    dash_lengths: Option<Vec<f32>>,
    clip_rectangle: Option<Rect>,
    clip_path: Option<ClipPath>,
    hatch: Option<String>,
    /// Clip saves issued on the surface and not yet restored
    pending_restores: usize,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            rgb: Rgba::new(0.0, 0.0, 0.0, 1.0),
            alpha: None,
            forced_alpha: false,
            line_width: 1.0,
            stroke: true,
            cap_style: CapStyle::Butt,
            join_style: LineJoin::Round,
            dash_offset: None,
            dash_lengths: None,
            clip_rectangle: None,
            clip_path: None,
            hatch: None,
            pending_restores: 0,
        }
    }
}

impl GraphicsState {
    pub fn rgb(&self) -> Rgba {
        self.rgb
    }

    pub fn alpha(&self) -> Option<f32> {
        self.alpha
    }

    pub fn forced_alpha(&self) -> bool {
        self.forced_alpha
    }

    /// Stroke color as the surface expects it
    pub fn surface_color(&self) -> SurfaceColor {
        to_surface_color(self.rgb, self.alpha, self.forced_alpha)
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn stroke(&self) -> bool {
        self.stroke
    }

    pub fn cap_style(&self) -> CapStyle {
        self.cap_style
    }

    pub fn join_style(&self) -> LineJoin {
        self.join_style
    }

    /// `(offset, lengths)` in points, as last set
    pub fn dashes(&self) -> (Option<f32>, Option<&[f32]>) {
        (self.dash_offset, self.dash_lengths.as_deref())
    }

    pub fn clip_rectangle(&self) -> Option<Rect> {
        self.clip_rectangle
    }

    pub fn clip_path(&self) -> Option<&ClipPath> {
        self.clip_path.as_ref()
    }

    pub fn hatch(&self) -> Option<&str> {
        self.hatch.as_deref()
    }

    pub fn pending_restores(&self) -> usize {
        self.pending_restores
    }

    pub fn set_foreground(&mut self, rgb: Rgba) {
        self.rgb = rgb;
    }

    /// `Some` alpha overrides the color's own alpha; `None` clears it
    pub fn set_alpha(&mut self, alpha: Option<f32>) {
        self.alpha = alpha;
        self.forced_alpha = alpha.is_some();
    }

    pub fn set_hatch(&mut self, hatch: Option<String>) {
        self.hatch = hatch;
    }

    /// Accepts a [`CapStyle`] or one of `"butt"`, `"round"`, `"projecting"`
    pub fn set_cap_style<S: Surface>(
        &mut self,
        renderer: &mut Renderer<'_, S>,
        cap: impl StyleValue<CapStyle>,
    ) -> Result<(), ConfigurationError> {
        let cap = cap.canonicalize()?;
        renderer.surface.set_line_cap(cap.to_line_cap());
        self.cap_style = cap;
        Ok(())
    }

    /// Accepts a [`LineJoin`] or one of `"miter"`, `"round"`, `"bevel"`
    pub fn set_join_style<S: Surface>(
        &mut self,
        renderer: &mut Renderer<'_, S>,
        join: impl StyleValue<LineJoin>,
    ) -> Result<(), ConfigurationError> {
        let join = join.canonicalize()?;
        renderer.surface.set_line_join(join);
        self.join_style = join;
        Ok(())
    }

    /// Width in points; zero turns stroking off
    pub fn set_line_width<S: Surface>(&mut self, renderer: &mut Renderer<'_, S>, width: f32) {
        self.line_width = width;
        self.stroke = width != 0.0;
        let pixels = renderer.points_to_pixels(width);
        renderer.surface.set_line_width(pixels);
    }

    /// Dash lengths in points are scaled to pixels; the offset is passed as is
    pub fn set_dashes<S: Surface>(
        &mut self,
        renderer: &mut Renderer<'_, S>,
        offset: Option<f32>,
        lengths: Option<&[f32]>,
    ) {
        self.dash_offset = offset;
        self.dash_lengths = lengths.map(<[f32]>::to_vec);
        if let Some(offset) = offset {
            renderer.surface.set_line_dash_offset(offset);
        }
        match lengths {
            None => renderer.surface.set_line_dash(&[]),
            Some(lengths) => {
                let pixels: Vec<f32> = lengths
                    .iter()
                    .map(|&len| renderer.points_to_pixels(len))
                    .collect();
                renderer.surface.set_line_dash(&pixels);
            }
        }
    }

    /// Clip to `rect` (user space) until [`GraphicsState::restore`]
    ///
    /// A surface save is always issued; `None` or an empty rectangle restores
    /// it straight away.
    pub fn set_clip_rectangle<S: Surface>(
        &mut self,
        renderer: &mut Renderer<'_, S>,
        rect: Option<Rect>,
    ) {
        self.clip_rectangle = rect;
        renderer.save();
        let Some(rect) = rect.filter(|r| !r.is_empty()) else {
            renderer.restore();
            return;
        };
        let rect = rect.round();
        let y = renderer.height - rect.y - rect.height;
        renderer.surface.begin_path();
        renderer.surface.rect(rect.x, y, rect.width, rect.height);
        renderer.surface.clip();
        self.pending_restores += 1;
    }

    /// Clip to an arbitrary path until [`GraphicsState::restore`]
    pub fn set_clip_path<S: Surface>(
        &mut self,
        renderer: &mut Renderer<'_, S>,
        clip: Option<ClipPath>,
    ) {
        renderer.save();
        match &clip {
            None => renderer.restore(),
            Some(clip) => {
                let transform = clip.transform.and_then(&renderer.device_flip());
                PathTranslator::emit(&mut *renderer.surface, &clip.path, &transform, None);
                renderer.surface.clip();
                self.pending_restores += 1;
            }
        }
        self.clip_path = clip;
    }

    /// Undo the most recent clip save
    pub fn restore<S: Surface>(&mut self, renderer: &mut Renderer<'_, S>) {
        if self.pending_restores == 0 {
            tracing::warn!("graphics state restore without an outstanding clip");
            return;
        }
        self.pending_restores -= 1;
        renderer.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figcanvas_paint::{LineCap, PathBuilder, RecordingSurface, SurfaceCall};
    use figcanvas_text::{
        DynFontCache, FontCache, FontDescriptor, FontLoader, FontResource, TextError,
    };
    use std::sync::Arc;

    struct NoFonts;

    impl FontLoader for NoFonts {
        fn resolve(
            &self,
            descriptor: &FontDescriptor,
        ) -> figcanvas_text::Result<Arc<dyn FontResource>> {
            Err(TextError::FontNotFound(descriptor.family.clone()))
        }
    }

    fn fonts() -> DynFontCache {
        FontCache::new(Arc::new(NoFonts) as Arc<dyn FontLoader>)
    }

    #[test]
    fn projecting_cap_becomes_square() {
        let fonts = fonts();
        let mut surface = RecordingSurface::new(10, 10);
        let mut renderer = Renderer::new(&mut surface, 10.0, 10.0, 72.0, &fonts);
        let mut gc = GraphicsState::default();
        gc.set_cap_style(&mut renderer, "projecting")
            .expect("known cap");
        assert_eq!(gc.cap_style(), CapStyle::Projecting);
        assert_eq!(surface.calls(), &[SurfaceCall::SetLineCap(LineCap::Square)]);
    }

    #[test]
    fn unknown_styles_are_rejected_without_surface_calls() {
        let fonts = fonts();
        let mut surface = RecordingSurface::new(10, 10);
        let mut renderer = Renderer::new(&mut surface, 10.0, 10.0, 72.0, &fonts);
        let mut gc = GraphicsState::default();
        assert!(gc.set_cap_style(&mut renderer, "triangle").is_err());
        assert!(gc.set_join_style(&mut renderer, "chamfer").is_err());
        assert_eq!(gc.cap_style(), CapStyle::Butt);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn dashes_scale_lengths_but_not_offset() {
        let fonts = fonts();
        let mut surface = RecordingSurface::new(10, 10);
        let mut renderer = Renderer::new(&mut surface, 10.0, 10.0, 192.0, &fonts);
        let mut gc = GraphicsState::default();
        gc.set_dashes(&mut renderer, Some(3.0), Some(&[6.0, 3.0]));
        gc.set_dashes(&mut renderer, None, None);
        assert_eq!(
            surface.calls(),
            &[
                SurfaceCall::SetLineDashOffset(3.0),
                SurfaceCall::SetLineDash(vec![16.0, 8.0]),
                SurfaceCall::SetLineDash(vec![]),
            ]
        );
    }

    #[test]
    fn clip_rectangle_is_flipped_and_rounded() {
        let fonts = fonts();
        let mut surface = RecordingSurface::new(200, 100);
        let mut renderer = Renderer::new(&mut surface, 200.0, 100.0, 72.0, &fonts);
        let mut gc = GraphicsState::default();
        gc.set_clip_rectangle(&mut renderer, Some(Rect::new(10.4, 20.0, 50.0, 30.0)));
        assert_eq!(gc.pending_restores(), 1);
        gc.restore(&mut renderer);
        assert_eq!(
            surface.calls(),
            &[
                SurfaceCall::Save,
                SurfaceCall::BeginPath,
                SurfaceCall::Rect {
                    x: 10.0,
                    y: 50.0,
                    width: 50.0,
                    height: 30.0,
                },
                SurfaceCall::Clip,
                SurfaceCall::Restore,
            ]
        );
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn clip_rectangle_rounds_halves_to_even() {
        let fonts = fonts();
        let mut surface = RecordingSurface::new(100, 100);
        let mut renderer = Renderer::new(&mut surface, 100.0, 100.0, 72.0, &fonts);
        let mut gc = GraphicsState::default();
        gc.set_clip_rectangle(&mut renderer, Some(Rect::new(2.5, 0.5, 10.5, 3.5)));
        gc.restore(&mut renderer);
        let snapped = SurfaceCall::Rect {
            x: 2.0,
            y: 96.0,
            width: 10.0,
            height: 4.0,
        };
        assert!(surface.calls().contains(&snapped));
    }

    #[test]
    fn empty_clip_rectangle_restores_immediately() {
        let fonts = fonts();
        let mut surface = RecordingSurface::new(10, 10);
        let mut renderer = Renderer::new(&mut surface, 10.0, 10.0, 72.0, &fonts);
        let mut gc = GraphicsState::default();
        gc.set_clip_rectangle(&mut renderer, None);
        gc.set_clip_rectangle(&mut renderer, Some(Rect::new(1.0, 1.0, 0.0, 5.0)));
        assert_eq!(gc.pending_restores(), 0);
        assert_eq!(
            surface.calls(),
            &[
                SurfaceCall::Save,
                SurfaceCall::Restore,
                SurfaceCall::Save,
                SurfaceCall::Restore,
            ]
        );
    }

    #[test]
    fn clip_path_goes_through_the_flip() {
        let fonts = fonts();
        let mut surface = RecordingSurface::new(10, 10);
        let mut renderer = Renderer::new(&mut surface, 10.0, 10.0, 72.0, &fonts);
        let mut gc = GraphicsState::default();
        let path = PathBuilder::new()
            .move_to(1.0, 2.0)
            .line_to(3.0, 4.0)
            .close()
            .build();
        let clip = ClipPath::new(path, AffineTransform::IDENTITY);
        gc.set_clip_path(&mut renderer, Some(clip));
        gc.restore(&mut renderer);
        gc.restore(&mut renderer);
        let calls = surface.calls();
        assert!(calls.contains(&SurfaceCall::MoveTo { x: 1.0, y: 8.0 }));
        assert!(calls.contains(&SurfaceCall::LineTo { x: 3.0, y: 6.0 }));
        assert_eq!(surface.count(|c| *c == SurfaceCall::Restore), 1);
        assert_eq!(surface.unbalanced_restores(), 0);
    }

    #[test]
    fn alpha_override_is_forced_only_when_set() {
        let mut gc = GraphicsState::default();
        gc.set_foreground(Rgba::new(0.2, 0.4, 0.6, 0.8));
        assert_eq!(gc.surface_color().to_string(), "rgba(51, 102, 153, 0.8)");
        gc.set_alpha(Some(0.5));
        assert!(gc.forced_alpha());
        assert_eq!(gc.surface_color().to_string(), "rgba(51, 102, 153, 0.5)");
        gc.set_alpha(None);
        assert!(!gc.forced_alpha());
        gc.set_foreground(Rgba::rgb(0.2, 0.4, 0.6));
        assert_eq!(gc.surface_color().to_string(), "#336699");
    }
}
