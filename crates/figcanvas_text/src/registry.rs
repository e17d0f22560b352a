//! System font loader
//!
//! Uses fontdb to discover fonts by family name (falling back to the
//! descriptor's generic family), ttf-parser for glyph outlines and rustybuzz
//! for shaped text metrics.

use std::sync::{Arc, Mutex, PoisonError};

use figcanvas_paint::{Path, PathCommand, Point};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rustc_hash::FxHashMap;

use crate::font::{
    FontDescriptor, FontLoader, FontResource, FontStyle, GenericFamily, TextExtents,
    SUBPIXEL_UNITS,
};
use crate::{Result, TextError};

fn to_fontdb_family(generic: GenericFamily) -> Family<'static> {
    match generic {
        GenericFamily::SansSerif => Family::SansSerif,
        GenericFamily::Serif => Family::Serif,
        GenericFamily::Monospace => Family::Monospace,
        GenericFamily::Cursive => Family::Cursive,
        GenericFamily::Fantasy => Family::Fantasy,
    }
}

fn to_fontdb_style(style: FontStyle) -> Style {
    match style {
        FontStyle::Normal => Style::Normal,
        FontStyle::Italic => Style::Italic,
        FontStyle::Oblique => Style::Oblique,
    }
}

/// Font loader backed by a fontdb database
pub struct SystemFontLoader {
    /// fontdb database containing all known faces
    db: Database,
    /// Raw font file contents, shared by every resource cut from the same face
    data: Mutex<FxHashMap<fontdb::ID, Arc<Vec<u8>>>>,
    /// Log lookups at trace instead of debug
    quiet: bool,
}

impl SystemFontLoader {
    /// Create a loader and load system fonts
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self::with_database(db)
    }

    /// Create a loader over an existing database (bundled fonts, tests)
    pub fn with_database(db: Database) -> Self {
        Self {
            db,
            data: Mutex::new(FxHashMap::default()),
            quiet: false,
        }
    }

    /// Lower font lookup messages from debug to trace
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// List available font families
    pub fn list_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .db
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();

        families.sort();
        families.dedup();
        families
    }

    fn query(&self, descriptor: &FontDescriptor, style: Style) -> Option<fontdb::ID> {
        let query = Query {
            families: &[
                Family::Name(&descriptor.family),
                to_fontdb_family(descriptor.generic),
            ],
            weight: Weight(descriptor.weight),
            style,
            stretch: Stretch::Normal,
        };
        self.db.query(&query)
    }

    fn face_data(&self, id: fontdb::ID) -> Result<(Arc<Vec<u8>>, u32)> {
        let index = self
            .db
            .face(id)
            .map(|face| face.index)
            .ok_or_else(|| TextError::FontLoadError("Font source not found".into()))?;

        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bytes) = data.get(&id) {
            return Ok((Arc::clone(bytes), index));
        }

        let bytes = self
            .db
            .with_face_data(id, |bytes, _| Arc::new(bytes.to_vec()))
            .ok_or_else(|| TextError::FontLoadError("Font data unavailable".into()))?;
        data.insert(id, Arc::clone(&bytes));
        Ok((bytes, index))
    }
}

impl Default for SystemFontLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLoader for SystemFontLoader {
    fn resolve(&self, descriptor: &FontDescriptor) -> Result<Arc<dyn FontResource>> {
        let style = to_fontdb_style(descriptor.style);
        // Try Oblique if Italic wasn't found
        let id = self
            .query(descriptor, style)
            .or_else(|| match descriptor.style {
                FontStyle::Italic => self.query(descriptor, Style::Oblique),
                _ => None,
            })
            .ok_or_else(|| TextError::FontNotFound(descriptor.to_string()))?;

        let family = self
            .db
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| descriptor.family.clone());

        if self.quiet {
            tracing::trace!(%descriptor, %family, "font lookup");
        } else {
            tracing::debug!(%descriptor, %family, "font lookup");
        }

        let (data, index) = self.face_data(id)?;
        Ok(Arc::new(FaceResource::new(family, data, index)?))
    }
}

/// A parsed font face, measured and outlined on demand
#[derive(Debug)]
pub struct FaceResource {
    family: String,
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: f32,
}

impl FaceResource {
    /// Validate and wrap font file contents
    pub fn new(family: impl Into<String>, data: Arc<Vec<u8>>, index: u32) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, index)
            .map_err(|e| TextError::FontParseError(e.to_string()))?;
        let units_per_em = face.units_per_em() as f32;
        Ok(Self {
            family: family.into(),
            data,
            index,
            units_per_em,
        })
    }

    /// Font units to pixels at `size` points and `dpi`
    fn scale(&self, size: f32, dpi: f32) -> f32 {
        size / 72.0 * dpi / self.units_per_em
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }
}

impl FontResource for FaceResource {
    fn family_name(&self) -> &str {
        &self.family
    }

    fn text_extents(&self, text: &str, size: f32, dpi: f32) -> TextExtents {
        let Some(face) = rustybuzz::Face::from_slice(&self.data, self.index) else {
            return TextExtents::default();
        };

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        let shaped = rustybuzz::shape(&face, &[], buffer);

        // Union of glyph boxes along the pen, in font units
        let mut pen_x = 0i32;
        let mut bounds: Option<(i32, i32, i32, i32)> = None;
        for (info, pos) in shaped.glyph_infos().iter().zip(shaped.glyph_positions()) {
            let glyph = rustybuzz::ttf_parser::GlyphId(info.glyph_id as u16);
            if let Some(bbox) = face.glyph_bounding_box(glyph) {
                let x0 = pen_x + pos.x_offset + bbox.x_min as i32;
                let x1 = pen_x + pos.x_offset + bbox.x_max as i32;
                let y0 = pos.y_offset + bbox.y_min as i32;
                let y1 = pos.y_offset + bbox.y_max as i32;
                bounds = Some(match bounds {
                    Some((bx0, by0, bx1, by1)) => {
                        (bx0.min(x0), by0.min(y0), bx1.max(x1), by1.max(y1))
                    }
                    None => (x0, y0, x1, y1),
                });
            }
            pen_x += pos.x_advance;
        }

        let to_subpixel = {
            let scale = self.scale(size, dpi) * SUBPIXEL_UNITS;
            move |units: i32| (units as f32 * scale).round() as i32
        };

        match bounds {
            Some((x0, y0, x1, y1)) => TextExtents {
                width: to_subpixel(x1 - x0),
                height: to_subpixel(y1 - y0),
                descent: to_subpixel(-y0.min(0)),
            },
            // No ink (whitespace): only the advance is meaningful
            None => TextExtents {
                width: to_subpixel(pen_x),
                height: 0,
                descent: 0,
            },
        }
    }

    fn glyph_outline(&self, ch: char, size: f32, dpi: f32) -> Option<Path> {
        let face = self.face()?;
        let glyph = face.glyph_index(ch)?;
        let mut builder = OutlineCollector {
            scale: self.scale(size, dpi),
            commands: Vec::new(),
        };
        face.outline_glyph(glyph, &mut builder)?;
        Some(Path::from_commands(builder.commands))
    }

    fn advance(&self, ch: char, size: f32, dpi: f32) -> Option<f32> {
        let face = self.face()?;
        let glyph = face.glyph_index(ch)?;
        let advance = face.glyph_hor_advance(glyph)?;
        Some(advance as f32 * self.scale(size, dpi))
    }
}

/// Collects a ttf-parser outline into path commands, scaled to pixels
struct OutlineCollector {
    scale: f32,
    commands: Vec<PathCommand>,
}

impl OutlineCollector {
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(x * self.scale, y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.commands.push(PathCommand::MoveTo(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.commands.push(PathCommand::LineTo(p));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let control = self.point(x1, y1);
        let end = self.point(x, y);
        self.commands.push(PathCommand::QuadTo { control, end });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let control1 = self.point(x1, y1);
        let control2 = self.point(x2, y2);
        let end = self.point(x, y);
        self.commands.push(PathCommand::CubicTo {
            control1,
            control2,
            end,
        });
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}
