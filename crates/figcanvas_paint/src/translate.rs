//! Path translation into surface path-construction calls
//!
//! The transform handed to [`PathTranslator::emit`] must already contain the
//! device flip (see [`AffineTransform::device_flip`]); the translator never
//! flips per segment.

use crate::path::{Path, PathCommand, Point};
use crate::primitives::Rect;
use crate::surface::Surface;
use crate::transform::AffineTransform;

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

/// Which edges of `rect` the point lies beyond
fn outcode(p: Point, rect: &Rect) -> u8 {
    let mut code = 0;
    if p.x < rect.x {
        code |= LEFT;
    } else if p.x > rect.right() {
        code |= RIGHT;
    }
    if p.y < rect.y {
        code |= TOP;
    } else if p.y > rect.bottom() {
        code |= BOTTOM;
    }
    code
}

/// Counts from one [`PathTranslator::emit`] call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitStats {
    /// Commands dropped because a transformed point was not finite
    pub dropped: usize,
    /// Line vertices folded away outside the clip rectangle
    pub collapsed: usize,
}

/// Emits [`Path`]s onto a [`Surface`]
pub struct PathTranslator;

impl PathTranslator {
    /// Begin a new surface path and replay `path` through `transform`.
    ///
    /// Commands with non-finite transformed points are skipped, and the next
    /// drawing command then starts a fresh sub-path with `move_to`.
    ///
    /// With `clip`, consecutive line vertices that all lie beyond one shared
    /// edge of the rectangle are folded into the last of them. The folded
    /// segment stays outside the rectangle and the sub-path stays connected,
    /// so `close_path` still returns to the right start point. Curves are
    /// always emitted whole.
    pub fn emit<S: Surface + ?Sized>(
        surface: &mut S,
        path: &Path,
        transform: &AffineTransform,
        clip: Option<Rect>,
    ) -> EmitStats {
        let mut stats = EmitStats::default();
        let mut restart = false;
        let mut last_code: Option<u8> = None;
        let mut pending: Option<Point> = None;
        let mut run_mask = 0u8;

        let code_of = |p: Point| clip.as_ref().map(|rect| outcode(p, rect));
        let flush = |surface: &mut S, pending: &mut Option<Point>| {
            if let Some(p) = pending.take() {
                surface.line_to(p.x, p.y);
            }
        };

        surface.begin_path();
        for command in path.commands() {
            let command = command.transformed(transform);
            if !command.points().iter().all(Point::is_finite) {
                flush(surface, &mut pending);
                stats.dropped += 1;
                restart = true;
                last_code = None;
                continue;
            }

            match command {
                PathCommand::MoveTo(p) => {
                    flush(surface, &mut pending);
                    surface.move_to(p.x, p.y);
                    restart = false;
                    last_code = code_of(p);
                }
                PathCommand::LineTo(p) => {
                    if restart {
                        surface.move_to(p.x, p.y);
                        restart = false;
                        last_code = code_of(p);
                        continue;
                    }
                    if let (Some(code), Some(prev)) = (code_of(p), last_code) {
                        let shared = if pending.is_some() {
                            run_mask & code
                        } else {
                            prev & code
                        };
                        if shared != 0 {
                            if pending.replace(p).is_some() {
                                stats.collapsed += 1;
                            }
                            run_mask = shared;
                            last_code = Some(code);
                            continue;
                        }
                    }
                    flush(surface, &mut pending);
                    surface.line_to(p.x, p.y);
                    last_code = code_of(p);
                }
                PathCommand::QuadTo { control, end } => {
                    flush(surface, &mut pending);
                    if restart {
                        surface.move_to(end.x, end.y);
                        restart = false;
                    } else {
                        surface.quadratic_curve_to(control.x, control.y, end.x, end.y);
                    }
                    last_code = code_of(end);
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => {
                    flush(surface, &mut pending);
                    if restart {
                        surface.move_to(end.x, end.y);
                        restart = false;
                    } else {
                        surface.bezier_curve_to(
                            control1.x, control1.y, control2.x, control2.y, end.x, end.y,
                        );
                    }
                    last_code = code_of(end);
                }
                PathCommand::Close => {
                    flush(surface, &mut pending);
                    surface.close_path();
                    // The current point is now the sub-path start, which we
                    // don't track.
                    last_code = None;
                }
            }
        }
        flush(surface, &mut pending);

        if stats.dropped > 0 || stats.collapsed > 0 {
            tracing::trace!(
                dropped = stats.dropped,
                collapsed = stats.collapsed,
                "path emitted with omissions"
            );
        }
        stats
    }
}
