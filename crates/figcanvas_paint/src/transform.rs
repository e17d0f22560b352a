//! 2D affine transforms

use crate::path::Point;

/// 2D affine transformation
///
/// Matrix elements `[a, b, c, d, tx, ty]`:
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0   1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub elements: [f32; 6],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        elements: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self {
            elements: [a, b, c, d, tx, ty],
        }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Counter-clockwise rotation in a y-up frame (radians)
    pub fn rotation(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// Map from the y-up figure frame into a y-down surface of `height`
    ///
    /// `(x, y)` becomes `(x, height - y)`.
    pub fn device_flip(height: f32) -> Self {
        Self::scale(1.0, -1.0).and_then(&Self::translation(0.0, height))
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, c, d, tx, ty] = self.elements;
        Point::new(
            a * point.x + c * point.y + tx,
            b * point.x + d * point.y + ty,
        )
    }

    /// Concatenate this transform with another (self * other)
    /// The resulting transform first applies `other`, then `self`.
    pub fn concat(&self, other: &AffineTransform) -> AffineTransform {
        let [a1, b1, c1, d1, tx1, ty1] = self.elements;
        let [a2, b2, c2, d2, tx2, ty2] = other.elements;

        AffineTransform {
            elements: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * tx2 + c1 * ty2 + tx1,
                b1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }

    /// Apply `self` first, then `next`
    pub fn and_then(&self, next: &AffineTransform) -> AffineTransform {
        next.concat(self)
    }

    /// Inverse transform, `None` when the matrix is singular
    pub fn invert(&self) -> Option<AffineTransform> {
        let [a, b, c, d, tx, ty] = self.elements;
        let det = a * d - b * c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(AffineTransform::new(
            d * inv,
            -b * inv,
            -c * inv,
            a * inv,
            (c * ty - d * tx) * inv,
            (b * tx - a * ty) * inv,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: Point, x: f32, y: f32) {
        assert!((p.x - x).abs() < 1e-4, "x: {} vs {}", p.x, x);
        assert!((p.y - y).abs() < 1e-4, "y: {} vs {}", p.y, y);
    }

    #[test]
    fn device_flip_mirrors_y() {
        let flip = AffineTransform::device_flip(480.0);
        assert_close(flip.transform_point(Point::new(10.0, 0.0)), 10.0, 480.0);
        assert_close(flip.transform_point(Point::new(10.0, 100.0)), 10.0, 380.0);
        assert_close(flip.transform_point(Point::new(-3.5, 480.0)), -3.5, 0.0);
    }

    #[test]
    fn flip_round_trips() {
        let flip = AffineTransform::device_flip(300.0);
        let unflip = flip.invert().unwrap();
        for (x, y) in [(0.0, 0.0), (12.5, 299.0), (-40.0, 1024.25)] {
            let back = unflip.transform_point(flip.transform_point(Point::new(x, y)));
            assert_close(back, x, y);
        }
    }

    #[test]
    fn composition_order_matters() {
        let scale = AffineTransform::scale(2.0, 2.0);
        let shift = AffineTransform::translation(10.0, 0.0);

        // scale first, then shift
        let p = scale.and_then(&shift).transform_point(Point::new(1.0, 1.0));
        assert_close(p, 12.0, 2.0);

        // shift first, then scale
        let p = shift.and_then(&scale).transform_point(Point::new(1.0, 1.0));
        assert_close(p, 22.0, 2.0);

        // concat applies its argument first
        let p = shift.concat(&scale).transform_point(Point::new(1.0, 1.0));
        assert_close(p, 12.0, 2.0);
    }

    #[test]
    fn singular_has_no_inverse() {
        assert!(AffineTransform::scale(0.0, 1.0).invert().is_none());
    }
}
