//! Path building and representation

use smallvec::SmallVec;

use crate::primitives::Rect;
use crate::transform::AffineTransform;

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Path command
///
/// Each command carries 1, 1, 2, 3 or 0 points respectively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, end: Point },
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    Close,
}

impl PathCommand {
    /// Points of the command in order, end point last
    pub fn points(&self) -> SmallVec<[Point; 3]> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => smallvec::smallvec![p],
            PathCommand::QuadTo { control, end } => smallvec::smallvec![control, end],
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => smallvec::smallvec![control1, control2, end],
            PathCommand::Close => SmallVec::new(),
        }
    }

    /// End point of the command, `None` for `Close`
    pub fn end(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::QuadTo { end, .. } | PathCommand::CubicTo { end, .. } => Some(end),
            PathCommand::Close => None,
        }
    }

    /// The same command with every point mapped through `transform`
    pub fn transformed(&self, transform: &AffineTransform) -> PathCommand {
        let t = |p: Point| transform.transform_point(p);
        match *self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(t(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(t(p)),
            PathCommand::QuadTo { control, end } => PathCommand::QuadTo {
                control: t(control),
                end: t(end),
            },
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => PathCommand::CubicTo {
                control1: t(control1),
                control2: t(control2),
                end: t(end),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// A 2D path composed of commands
///
/// Paths are built once (by [`PathBuilder`]) and only read afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 16]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_commands(commands: impl IntoIterator<Item = PathCommand>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    /// Closed axis-aligned rectangle
    pub fn rect(rect: Rect) -> Self {
        PathBuilder::new()
            .move_to(rect.x, rect.y)
            .line_to(rect.x + rect.width, rect.y)
            .line_to(rect.x + rect.width, rect.y + rect.height)
            .line_to(rect.x, rect.y + rect.height)
            .close()
            .build()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// End point of every command except `Close`
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().filter_map(PathCommand::end)
    }
}

/// Builder for constructing paths
pub struct PathBuilder {
    path: Path,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self { path: Path::new() }
    }

    pub fn move_to(self, x: f32, y: f32) -> Self {
        self.command(PathCommand::MoveTo(Point::new(x, y)))
    }

    pub fn line_to(self, x: f32, y: f32) -> Self {
        self.command(PathCommand::LineTo(Point::new(x, y)))
    }

    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.path.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self
    }

    pub fn cubic_to(mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Self {
        self.path.commands.push(PathCommand::CubicTo {
            control1: Point::new(c1x, c1y),
            control2: Point::new(c2x, c2y),
            end: Point::new(x, y),
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.path.commands.push(PathCommand::Close);
        self
    }

    /// Append an already-built command
    pub fn command(mut self, command: PathCommand) -> Self {
        self.path.commands.push(command);
        self
    }

    pub fn build(self) -> Path {
        self.path
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}
