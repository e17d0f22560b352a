//! Render Demo
//!
//! Draws a small line chart onto a recording surface and prints what the
//! surface was asked to do:
//! - Axes frame with a clip rectangle
//! - A dashed data line with round caps and square markers
//! - A title and a rotated axis label using system fonts
//! - A 2x2 RGB image in the corner
//!
//! Run with: cargo run -p figcanvas_render --example render_demo [config.json]

use std::path::Path as FsPath;

use figcanvas_paint::SurfaceCall;
use figcanvas_render::prelude::*;
use tracing_subscriber::EnvFilter;

struct LineChart {
    points: Vec<(f32, f32)>,
    title: String,
}

impl<S: Surface> Figure<S> for LineChart {
    fn size_inches(&self) -> (f32, f32) {
        (6.4, 4.8)
    }

    fn draw(&mut self, renderer: &mut Renderer<'_, S>) -> Result<()> {
        let (width, height) = (renderer.width(), renderer.height());
        let axes = Rect::new(width * 0.1, height * 0.1, width * 0.8, height * 0.8);
        let mut gc = renderer.new_gc();

        let background = Path::rect(Rect::new(0.0, 0.0, width, height));
        gc.set_line_width(renderer, 0.0);
        renderer.draw_path(
            &gc,
            &background,
            &AffineTransform::IDENTITY,
            Some(Rgba::WHITE),
        );

        gc.set_line_width(renderer, 1.0);
        gc.set_join_style(renderer, "miter")?;
        renderer.draw_path(&gc, &Path::rect(axes), &AffineTransform::IDENTITY, None);

        // Data space is the unit square inside the axes
        let to_axes = AffineTransform::scale(axes.width, axes.height)
            .and_then(&AffineTransform::translation(axes.x, axes.y));
        let mut line = PathBuilder::new();
        for (i, &(x, y)) in self.points.iter().enumerate() {
            line = if i == 0 {
                line.move_to(x, y)
            } else {
                line.line_to(x, y)
            };
        }
        let line = line.build();

        gc.set_clip_rectangle(renderer, Some(axes));
        gc.set_foreground(Rgba::from_hex(0x1f77b4));
        gc.set_line_width(renderer, 2.0);
        gc.set_cap_style(renderer, CapStyle::Round)?;
        gc.set_dashes(renderer, Some(0.0), Some(&[6.0, 3.0]));
        renderer.draw_path(&gc, &line, &to_axes, None);

        gc.set_dashes(renderer, None, None);
        gc.set_cap_style(renderer, "projecting")?;
        let marker = Path::rect(Rect::new(-3.0, -3.0, 6.0, 6.0));
        renderer.draw_markers(
            &gc,
            &marker,
            &AffineTransform::IDENTITY,
            &line,
            &to_axes,
            Some(Rgba::from_hex(0xff7f0e)),
        );
        gc.restore(renderer);

        let swatch = RasterImage::new(
            2,
            2,
            3,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        )?;
        renderer.draw_image(&gc, width - 10.0, 8.0, &swatch)?;

        let font = FontDescriptor::new("DejaVu Sans", 14.0);
        gc.set_foreground(Rgba::BLACK);
        match renderer.text_width_height_descent(&self.title, &font, false) {
            Ok((text_width, _, _)) => {
                let x = (width - text_width) / 2.0;
                renderer.draw_text(&gc, x, axes.bottom() + 10.0, &self.title, &font, 0.0, false)?;
                let y = height / 2.0;
                renderer.draw_text(&gc, axes.x - 30.0, y, "value", &font, 90.0, false)?;
            }
            Err(err) => tracing::warn!(error = %err, "skipping labels"),
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RenderConfig::from_path(FsPath::new(&path))?,
        None => RenderConfig::default(),
    };
    let fonts = Arc::new(config.system_font_cache());

    let chart = LineChart {
        points: vec![(0.0, 0.1), (0.25, 0.6), (0.5, 0.4), (0.75, 0.9), (1.0, 0.7)],
        title: "Throughput".to_string(),
    };
    let (width_in, height_in) = Figure::<RecordingSurface>::size_inches(&chart);
    let scale = config.dpi * config.device_pixel_ratio;
    let surface = RecordingSurface::new((width_in * scale) as u32, (height_in * scale) as u32);

    let canvas = FigureCanvas::new(chart, surface, fonts, &config);
    let mut manager = FigureManager::new(canvas, 1);
    manager.show(&mut |output: &BitmapOutput<'_, Vec<SurfaceCall>>| {
        let strokes = output
            .bitmap
            .iter()
            .filter(|c| **c == SurfaceCall::Stroke)
            .count();
        let fills = output
            .bitmap
            .iter()
            .filter(|c| **c == SurfaceCall::Fill)
            .count();
        tracing::info!(
            mime = output.mime_type(),
            metadata = %output.metadata(),
            calls = output.bitmap.len(),
            strokes,
            fills,
            "presented"
        );
    })?;

    tracing::info!(
        cached_fonts = manager.canvas().fonts().len(),
        dpi = manager.canvas().dpi(),
        "done"
    );
    manager.destroy();
    Ok(())
}
