//! Whole-pass behavior of FigureCanvas over a RecordingSurface

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use figcanvas_paint::{LineCap, RecordingSurface, SurfaceCall, SurfaceColor};
use figcanvas_render::prelude::*;
use figcanvas_text::{
    DynFontCache, FontCache, FontLoader, FontResource, MathLayoutResult, TextError, TextExtents,
};

#[derive(Debug)]
struct FixedFont;

impl FontResource for FixedFont {
    fn family_name(&self) -> &str {
        "Fixed"
    }

    fn text_extents(&self, text: &str, size: f32, dpi: f32) -> TextExtents {
        let px = size / 72.0 * dpi;
        TextExtents {
            width: (px * 0.5 * text.len() as f32 * 64.0) as i32,
            height: (px * 64.0) as i32,
            descent: (px * 0.25 * 64.0) as i32,
        }
    }

    fn glyph_outline(&self, _ch: char, _size: f32, _dpi: f32) -> Option<Path> {
        None
    }

    fn advance(&self, _ch: char, size: f32, dpi: f32) -> Option<f32> {
        Some(size / 72.0 * dpi * 0.5)
    }
}

#[derive(Default)]
struct CountingLoader {
    loads: AtomicUsize,
}

impl FontLoader for CountingLoader {
    fn resolve(
        &self,
        descriptor: &FontDescriptor,
    ) -> figcanvas_text::Result<Arc<dyn FontResource>> {
        if descriptor.family == "Missing" {
            return Err(TextError::FontNotFound(descriptor.family.clone()));
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FixedFont))
    }
}

fn font_cache(loader: Arc<CountingLoader>) -> Arc<DynFontCache> {
    Arc::new(FontCache::new(loader as Arc<dyn FontLoader>))
}

/// Nested clips, styled lines, text; optionally fails halfway through
struct Report {
    fail_after_clip: bool,
    label_font: FontDescriptor,
}

impl<S: Surface> Figure<S> for Report {
    fn size_inches(&self) -> (f32, f32) {
        (2.0, 1.0)
    }

    fn draw(&mut self, renderer: &mut Renderer<'_, S>) -> Result<()> {
        let mut gc = renderer.new_gc();
        gc.set_clip_rectangle(renderer, Some(Rect::new(10.0, 10.0, 180.0, 80.0)));
        gc.set_clip_path(
            renderer,
            Some(ClipPath::new(
                Path::rect(Rect::new(20.0, 20.0, 50.0, 50.0)),
                AffineTransform::IDENTITY,
            )),
        );
        if self.fail_after_clip {
            return Err(RenderError::figure("layout exploded"));
        }
        gc.set_cap_style(renderer, "projecting")?;
        gc.set_dashes(renderer, Some(1.5), Some(&[4.0, 2.0]));
        let line = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 50.0)
            .build();
        renderer.draw_path(&gc, &line, &AffineTransform::IDENTITY, None);
        gc.restore(renderer);
        gc.restore(renderer);

        renderer.draw_text(&gc, 30.0, 30.0, "label", &self.label_font, 0.0, false)?;
        renderer.draw_text(&gc, 30.0, 30.0, "label", &self.label_font, 45.0, false)?;
        Ok(())
    }
}

fn canvas(report: Report, loader: Arc<CountingLoader>) -> FigureCanvas<Report, RecordingSurface> {
    let config = RenderConfig::from_json(r#"{ "dpi": 96 }"#).expect("config");
    let surface = RecordingSurface::new(384, 192);
    FigureCanvas::new(report, surface, font_cache(loader), &config)
}

fn collect(canvas: &mut FigureCanvas<Report, RecordingSurface>) -> Result<Vec<SurfaceCall>> {
    let mut frames = Vec::new();
    canvas.show(&mut |output: &BitmapOutput<'_, Vec<SurfaceCall>>| {
        frames.push(output.bitmap.clone())
    })?;
    Ok(frames.pop().unwrap_or_default())
}

#[test]
fn successful_pass_balances_the_surface_stack() {
    let loader = Arc::new(CountingLoader::default());
    let mut canvas = canvas(
        Report {
            fail_after_clip: false,
            label_font: FontDescriptor::new("Fixed", 12.0),
        },
        loader.clone(),
    );
    let calls = collect(&mut canvas).expect("pass succeeds");

    let saves = calls.iter().filter(|c| **c == SurfaceCall::Save).count();
    let restores = calls.iter().filter(|c| **c == SurfaceCall::Restore).count();
    assert_eq!(saves, restores);
    assert_eq!(saves, 3);
    assert_eq!(canvas.surface().unbalanced_restores(), 0);
    assert_eq!(canvas.surface().depth(), 0);
    assert_eq!(canvas.dpi(), 96.0);
}

#[test]
fn pass_runs_at_device_pixel_ratio() {
    let loader = Arc::new(CountingLoader::default());
    let mut canvas = canvas(
        Report {
            fail_after_clip: false,
            label_font: FontDescriptor::new("Fixed", 12.0),
        },
        loader.clone(),
    );
    let calls = collect(&mut canvas).expect("pass succeeds");

    // 96 dpi doubled: 1pt = 192/72 px
    assert!(calls.contains(&SurfaceCall::SetLineCap(LineCap::Square)));
    assert!(calls.contains(&SurfaceCall::SetLineDashOffset(1.5)));
    let Some(SurfaceCall::SetLineDash(lengths)) = calls
        .iter()
        .find(|c| matches!(c, SurfaceCall::SetLineDash(_)))
    else {
        panic!("no dash set");
    };
    assert!((lengths[0] - 4.0 * 192.0 / 72.0).abs() < 1e-4);
    assert!((lengths[1] - 2.0 * 192.0 / 72.0).abs() < 1e-4);
    let label_font = SurfaceCall::SetFont("normal 400 32px Fixed, sans-serif".into());
    assert!(calls.contains(&label_font));
    assert_eq!(calls.last(), Some(&SurfaceCall::Restore));
    let reset = SurfaceCall::SetFillStyle(SurfaceColor::BLACK);
    assert!(calls.contains(&reset));
}

#[test]
fn font_resolved_once_across_passes() {
    let loader = Arc::new(CountingLoader::default());
    let mut canvas = canvas(
        Report {
            fail_after_clip: false,
            label_font: FontDescriptor::new("Fixed", 12.0),
        },
        loader.clone(),
    );
    collect(&mut canvas).expect("first pass");
    collect(&mut canvas).expect("second pass");
    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    assert_eq!(canvas.fonts().len(), 1);
}

#[test]
fn failure_mid_pass_restores_dpi_and_presents_nothing() {
    let loader = Arc::new(CountingLoader::default());
    let mut canvas = canvas(
        Report {
            fail_after_clip: true,
            label_font: FontDescriptor::new("Fixed", 12.0),
        },
        loader,
    );
    let err = collect(&mut canvas).unwrap_err();
    assert!(matches!(err, RenderError::RenderFailure(_)));
    assert!(matches!(err.root_cause(), RenderError::Figure(_)));
    assert_eq!(canvas.dpi(), 96.0);
    assert!(!canvas.is_drawing());
    assert!(canvas.bitmap().is_none());
    assert!(canvas.surface().calls().is_empty());
    assert_eq!(canvas.surface().depth(), 0);

    canvas.figure_mut().fail_after_clip = false;
    assert!(collect(&mut canvas).is_ok());
    assert_eq!(canvas.surface().depth(), 0);
    assert_eq!(canvas.surface().unbalanced_restores(), 0);
}

#[test]
fn missing_font_fails_the_pass() {
    let loader = Arc::new(CountingLoader::default());
    let mut canvas = canvas(
        Report {
            fail_after_clip: false,
            label_font: FontDescriptor::new("Missing", 12.0),
        },
        loader,
    );
    let err = collect(&mut canvas).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        RenderError::Resource(TextError::FontNotFound(_))
    ));
}

#[test]
fn math_layout_collaborator_is_used_when_present() {
    struct Empty;

    impl MathLayout for Empty {
        fn parse(
            &self,
            _expression: &str,
            dpi: f32,
            _font: &FontDescriptor,
        ) -> figcanvas_text::Result<MathLayoutResult> {
            Ok(MathLayoutResult {
                width: dpi,
                ..Default::default()
            })
        }
    }

    struct MathOnly;

    impl<S: Surface> Figure<S> for MathOnly {
        fn size_inches(&self) -> (f32, f32) {
            (1.0, 1.0)
        }

        fn draw(&mut self, renderer: &mut Renderer<'_, S>) -> Result<()> {
            let gc = renderer.new_gc();
            let font = FontDescriptor::new("Fixed", 10.0);
            let (width, _, _) = renderer.text_width_height_descent("$x$", &font, true)?;
            assert_eq!(width, 72.0);
            renderer.draw_text(&gc, 1.0, 2.0, "$x$", &font, 0.0, true)
        }
    }

    let loader = Arc::new(CountingLoader::default());
    let mut canvas = FigureCanvas::new(
        MathOnly,
        RecordingSurface::new(200, 200),
        font_cache(loader),
        &RenderConfig::default(),
    )
    .with_math_layout(Arc::new(Empty));
    canvas.draw().expect("math drawn");
    assert_eq!(canvas.surface().depth(), 0);
    assert!(canvas
        .surface()
        .calls()
        .contains(&SurfaceCall::Translate { dx: 1.0, dy: 198.0 }));
}
