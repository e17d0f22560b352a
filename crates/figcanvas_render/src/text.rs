//! Text drawing and measurement
//!
//! Plain text goes to the surface's own text primitive with a font
//! shorthand. Math text is laid out by a [`figcanvas_text::MathLayout`] and
//! drawn as filled glyph outlines and rectangles.

use figcanvas_paint::{AffineTransform, PathTranslator, Surface};
use figcanvas_text::{FontDescriptor, GlyphOutline};

use crate::error::{RenderError, Result};
use crate::gc::GraphicsState;
use crate::renderer::Renderer;

/// Math text is measured at this resolution regardless of the pass dpi
const MATH_METRICS_DPI: f32 = 72.0;

impl<S: Surface> Renderer<'_, S> {
    /// `(width, height, descent)` of `text` in pixels
    pub fn text_width_height_descent(
        &self,
        text: &str,
        font: &FontDescriptor,
        is_math: bool,
    ) -> Result<(f32, f32, f32)> {
        if is_math {
            let layout = self.math.ok_or(RenderError::MathUnavailable)?;
            let parsed = layout.parse(text, MATH_METRICS_DPI, font)?;
            return Ok((parsed.width, parsed.height, parsed.depth));
        }
        let resource = self.fonts.get(font)?;
        Ok(resource.text_extents(text, font.size, self.dpi).to_pixels())
    }

    /// Draw `text` with its bottom-left corner (including descent) at
    /// user-space `(x, y)`, rotated counter-clockwise by `angle` degrees.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        gc: &GraphicsState,
        x: f32,
        y: f32,
        text: &str,
        font: &FontDescriptor,
        angle: f32,
        is_math: bool,
    ) -> Result<()> {
        if is_math {
            return self.draw_math_text(gc, x, y, text, font, angle);
        }

        let resource = self.fonts.get(font)?;
        let (_, _, descent) = resource.text_extents(text, font.size, self.dpi).to_pixels();
        let radians = angle.to_radians();
        let x = x - radians.sin() * descent;
        let y = self.height - (y + radians.cos() * descent);
        let pixels = self.points_to_pixels(font.size);
        let shorthand = font.css_font(resource.family_name(), pixels);

        let rotated = angle != 0.0;
        if rotated {
            self.save();
            self.surface.translate(x, y);
            self.surface.rotate(-radians);
            self.surface.translate(-x, -y);
        }
        self.surface.set_font(&shorthand);
        self.surface.set_fill_style(&gc.surface_color());
        self.surface.fill_text(text, x, y);
        self.reset_fill_style();
        if rotated {
            self.restore();
        }
        Ok(())
    }

    fn draw_math_text(
        &mut self,
        gc: &GraphicsState,
        x: f32,
        y: f32,
        text: &str,
        font: &FontDescriptor,
        angle: f32,
    ) -> Result<()> {
        let layout = self.math.ok_or(RenderError::MathUnavailable)?;
        let parsed = layout.parse(text, self.dpi, font)?;

        // Resolve every outline before touching the surface so a missing font
        // cannot leave a save unmatched.
        let mut outlines: Vec<GlyphOutline> = Vec::with_capacity(parsed.glyphs.len());
        for glyph in &parsed.glyphs {
            let resource = self.fonts.get(&glyph.font)?;
            match glyph.outline(resource.as_ref(), self.dpi) {
                Some(outline) => outlines.push(outline),
                None => tracing::trace!(ch = %glyph.ch, "glyph has no outline"),
            }
        }

        self.save();
        self.surface.translate(x, self.height - y);
        if angle != 0.0 {
            self.surface.rotate(-angle.to_radians());
        }
        self.surface.set_fill_style(&gc.surface_color());

        let y_down = AffineTransform::scale(1.0, -1.0);
        for outline in &outlines {
            self.save();
            self.surface.translate(outline.ox, -outline.oy);
            PathTranslator::emit(&mut *self.surface, &outline.path, &y_down, None);
            self.surface.fill();
            self.restore();
        }
        for rect in &parsed.rects {
            self.surface
                .fill_rect(rect.x1, -rect.y2, rect.x2 - rect.x1, rect.y2 - rect.y1);
        }
        self.restore();
        tracing::trace!(
            glyphs = outlines.len(),
            rects = parsed.rects.len(),
            "math text drawn"
        );
        Ok(())
    }
}
