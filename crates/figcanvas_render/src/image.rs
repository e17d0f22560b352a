//! Raster image blitting
//!
//! Pixels are flipped and widened to RGBA, copied into a surface-native
//! image, drawn once and released. The surface image lives in a
//! [`ScopedImage`] so it is released on every exit path.

use figcanvas_paint::{RasterImage, Surface};

use crate::error::Result;
use crate::gc::GraphicsState;
use crate::renderer::Renderer;

/// A surface image released when the guard drops
pub(crate) struct ScopedImage<'s, S: Surface> {
    surface: &'s mut S,
    image: Option<S::Image>,
    width: u32,
    height: u32,
}

impl<'s, S: Surface> ScopedImage<'s, S> {
    pub(crate) fn create(surface: &'s mut S, width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let image = surface.create_image(width, height, rgba)?;
        Ok(Self {
            surface,
            image: Some(image),
            width,
            height,
        })
    }

    /// Draw at device `(x, y)` inside a save/restore pair
    pub(crate) fn draw_at(&mut self, x: f32, y: f32) {
        let Some(image) = self.image.as_ref() else {
            return;
        };
        self.surface.save();
        self.surface
            .draw_image(image, x, y, self.width as f32, self.height as f32);
        self.surface.restore();
    }
}

impl<S: Surface> Drop for ScopedImage<'_, S> {
    fn drop(&mut self) {
        if let Some(image) = self.image.take() {
            self.surface.release_image(image);
        }
    }
}

impl<S: Surface> Renderer<'_, S> {
    /// Draw `image` with its bottom-left corner at user-space `(x, y)`
    ///
    /// Images are drawn unscaled and ignore the graphics state.
    pub fn draw_image(
        &mut self,
        _gc: &GraphicsState,
        x: f32,
        y: f32,
        image: &RasterImage,
    ) -> Result<()> {
        let rgba = image.to_flipped_rgba()?;
        let (width, height) = (image.width(), image.height());
        let y = self.height - y - height as f32;
        let mut scoped = ScopedImage::create(&mut *self.surface, width, height, rgba.as_raw())?;
        scoped.draw_at(x, y);
        tracing::trace!(width, height, x, y, "image drawn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figcanvas_paint::{RecordingSurface, SurfaceCall};
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
    fn rgb_image_is_flipped_widened_and_released() {
        let fonts = fonts();
        let mut surface = RecordingSurface::new(100, 100);
        let mut renderer = Renderer::new(&mut surface, 100.0, 100.0, 72.0, &fonts);
        let gc = renderer.new_gc();
        // 1x2: red on top, blue below
        let image = RasterImage::new(1, 2, 3, vec![255, 0, 0, 0, 0, 255]).expect("valid image");
        renderer.draw_image(&gc, 10.0, 20.0, &image).expect("drawn");

        assert_eq!(
            surface.calls(),
            &[
                SurfaceCall::Save,
                SurfaceCall::DrawImage {
                    id: 0,
                    x: 10.0,
                    y: 78.0,
                    width: 1.0,
                    height: 2.0,
                },
                SurfaceCall::Restore,
            ]
        );
        let flipped = vec![0, 0, 255, 255, 255, 0, 0, 255];
        assert_eq!(surface.drawn_images()[0].rgba, flipped);
        assert_eq!(surface.live_images(), 0);
    }

    #[test]
    fn guard_releases_without_drawing() {
        let mut surface = RecordingSurface::new(10, 10);
        {
            let _scoped = ScopedImage::create(&mut surface, 1, 1, &[0, 0, 0, 255])
                .expect("created");
        }
        assert_eq!(surface.live_images(), 0);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn rejected_buffer_leaves_nothing_behind() {
        let mut surface = RecordingSurface::new(10, 10);
        assert!(ScopedImage::create(&mut surface, 2, 2, &[0; 4]).is_err());
        assert_eq!(surface.live_images(), 0);
    }
}
