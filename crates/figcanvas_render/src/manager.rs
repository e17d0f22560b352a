//! Figure managers - numbered windows around a canvas

use figcanvas_paint::Surface;

use crate::error::Result;
use crate::output::OutputSink;
use crate::session::{Figure, FigureCanvas};

pub struct FigureManager<F, S: Surface> {
    canvas: FigureCanvas<F, S>,
    num: usize,
}

impl<F: Figure<S>, S: Surface> FigureManager<F, S> {
    /// Takes over `canvas`, titling it `"Figure {num}"`
    pub fn new(mut canvas: FigureCanvas<F, S>, num: usize) -> Self {
        canvas.set_window_title(format!("Figure {num}"));
        Self { canvas, num }
    }

    pub fn num(&self) -> usize {
        self.num
    }

    pub fn canvas(&self) -> &FigureCanvas<F, S> {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut FigureCanvas<F, S> {
        &mut self.canvas
    }

    pub fn set_window_title(&mut self, title: impl Into<String>) {
        self.canvas.set_window_title(title);
    }

    pub fn show(&mut self, sink: &mut impl OutputSink<S::Bitmap>) -> Result<()> {
        self.canvas.show(sink)
    }

    pub fn destroy(&mut self) {
        self.canvas.destroy();
    }

    /// Surfaces are sized by the host; nothing to do here
    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::trace!(num = self.num, width, height, "resize ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::output::BitmapOutput;
    use crate::renderer::Renderer;
    use figcanvas_paint::{RecordingSurface, SurfaceCall};
    use figcanvas_text::{FontCache, FontDescriptor, FontLoader, FontResource, TextError};
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

    struct Blank;

    impl<S: Surface> Figure<S> for Blank {
        fn size_inches(&self) -> (f32, f32) {
            (1.0, 1.0)
        }

        fn draw(&mut self, _renderer: &mut Renderer<'_, S>) -> Result<()> {
            Ok(())
        }
    }

    fn manager(num: usize) -> FigureManager<Blank, RecordingSurface> {
        let fonts = Arc::new(FontCache::new(Arc::new(NoFonts) as Arc<dyn FontLoader>));
        let surface = RecordingSurface::new(200, 200);
        let canvas = FigureCanvas::new(Blank, surface, fonts, &RenderConfig::default());
        FigureManager::new(canvas, num)
    }

    #[test]
    fn default_title_uses_the_number() {
        let mut manager = manager(4);
        assert_eq!(manager.canvas().title(), "Figure 4");
        let mut titles = Vec::new();
        let mut sink = |output: &BitmapOutput<'_, Vec<SurfaceCall>>| {
            titles.push(output.title.to_string());
        };
        manager.show(&mut sink).expect("shown");
        manager.set_window_title("Loss curve");
        manager.show(&mut sink).expect("shown");
        assert_eq!(titles, ["Figure 4", "Loss curve"]);
    }

    #[test]
    fn resize_changes_nothing() {
        let mut manager = manager(1);
        let before = manager.canvas().pixel_size();
        manager.resize(10, 10);
        assert_eq!(manager.canvas().pixel_size(), before);
        manager.destroy();
        assert!(manager.canvas().bitmap().is_none());
    }
}
