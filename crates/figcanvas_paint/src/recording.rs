//! Recording surface - a display list of surface calls
//!
//! Every call made on a [`RecordingSurface`] is kept as a [`SurfaceCall`].
//! The surface also tracks the save/restore depth and the intermediate images
//! that are still alive, which makes stack balance and resource release
//! observable from the outside.

use crate::color::SurfaceColor;
use crate::raster::ImageError;
use crate::surface::{LineCap, LineJoin, Surface};

/// A recorded surface call
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Save,
    Restore,
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadraticCurveTo { cx: f32, cy: f32, x: f32, y: f32 },
    BezierCurveTo {
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    },
    ClosePath,
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Fill,
    Stroke,
    Clip,
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Translate { dx: f32, dy: f32 },
    Rotate { angle: f32 },
    SetLineWidth(f32),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    SetLineDash(Vec<f32>),
    SetLineDashOffset(f32),
    SetFillStyle(SurfaceColor),
    SetStrokeStyle(SurfaceColor),
    SetFont(String),
    FillText { text: String, x: f32, y: f32 },
    DrawImage {
        id: u64,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Intermediate image created on a [`RecordingSurface`]
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedImage {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Surface that records calls instead of rasterizing them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<SurfaceCall>,
    depth: usize,
    max_depth: usize,
    unbalanced_restores: usize,
    next_image_id: u64,
    live_images: Vec<u64>,
    drawn_images: Vec<RecordedImage>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get all recorded calls
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Take ownership of recorded calls
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Current save/restore nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest nesting reached so far
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Restores issued with no matching save
    pub fn unbalanced_restores(&self) -> usize {
        self.unbalanced_restores
    }

    /// Intermediate images created but not yet released
    pub fn live_images(&self) -> usize {
        self.live_images.len()
    }

    /// Pixel data of every image drawn so far, in draw order
    pub fn drawn_images(&self) -> &[RecordedImage] {
        &self.drawn_images
    }

    pub fn count(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    fn record(&mut self, call: SurfaceCall) {
        self.calls.push(call);
    }
}

impl Surface for RecordingSurface {
    type Image = RecordedImage;
    type Bitmap = Vec<SurfaceCall>;

    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.record(SurfaceCall::Save);
    }

    fn restore(&mut self) {
        if self.depth == 0 {
            self.unbalanced_restores += 1;
            tracing::warn!("restore without matching save");
        } else {
            self.depth -= 1;
        }
        self.record(SurfaceCall::Restore);
    }

    fn begin_path(&mut self) {
        self.record(SurfaceCall::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.record(SurfaceCall::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.record(SurfaceCall::LineTo { x, y });
    }

    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.record(SurfaceCall::QuadraticCurveTo { cx, cy, x, y });
    }

    fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.record(SurfaceCall::BezierCurveTo {
            c1x,
            c1y,
            c2x,
            c2y,
            x,
            y,
        });
    }

    fn close_path(&mut self) {
        self.record(SurfaceCall::ClosePath);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.record(SurfaceCall::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill(&mut self) {
        self.record(SurfaceCall::Fill);
    }

    fn stroke(&mut self) {
        self.record(SurfaceCall::Stroke);
    }

    fn clip(&mut self) {
        self.record(SurfaceCall::Clip);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.record(SurfaceCall::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.record(SurfaceCall::Translate { dx, dy });
    }

    fn rotate(&mut self, angle: f32) {
        self.record(SurfaceCall::Rotate { angle });
    }

    fn set_line_width(&mut self, width: f32) {
        self.record(SurfaceCall::SetLineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.record(SurfaceCall::SetLineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.record(SurfaceCall::SetLineJoin(join));
    }

    fn set_line_dash(&mut self, lengths: &[f32]) {
        self.record(SurfaceCall::SetLineDash(lengths.to_vec()));
    }

    fn set_line_dash_offset(&mut self, offset: f32) {
        self.record(SurfaceCall::SetLineDashOffset(offset));
    }

    fn set_fill_style(&mut self, color: &SurfaceColor) {
        self.record(SurfaceCall::SetFillStyle(*color));
    }

    fn set_stroke_style(&mut self, color: &SurfaceColor) {
        self.record(SurfaceCall::SetStrokeStyle(*color));
    }

    fn set_font(&mut self, font: &str) {
        self.record(SurfaceCall::SetFont(font.to_string()));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.record(SurfaceCall::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn create_image(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Self::Image, ImageError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }
        let id = self.next_image_id;
        self.next_image_id += 1;
        self.live_images.push(id);
        Ok(RecordedImage {
            id,
            width,
            height,
            rgba: rgba.to_vec(),
        })
    }

    fn draw_image(&mut self, image: &Self::Image, x: f32, y: f32, width: f32, height: f32) {
        self.drawn_images.push(image.clone());
        self.record(SurfaceCall::DrawImage {
            id: image.id,
            x,
            y,
            width,
            height,
        });
    }

    fn release_image(&mut self, image: Self::Image) {
        self.live_images.retain(|id| *id != image.id);
    }

    fn transfer_to_bitmap(&mut self) -> Self::Bitmap {
        tracing::trace!(calls = self.calls.len(), "transferring recorded calls");
        self.take_calls()
    }
}
