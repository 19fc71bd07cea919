/// Projective transforms and small vector helpers
use crate::error::{QrError, Result};
use crate::models::Point;

const SINGULAR_EPSILON: f64 = 1e-10;

/// Perspective transformation matrix (3x3, a33 fixed at 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    a11: f64,
    a12: f64,
    a13: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a31: f64,
    a32: f64,
}

impl PerspectiveTransform {
    /// Transform mapping each `src[i]` onto `dst[i]`
    ///
    /// Fails when the correspondences are degenerate (three collinear points).
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Result<Self> {
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src[i].x, src[i].y);
            let (dx, dy) = (dst[i].x, dst[i].y);

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        let s = solve_linear_system(a, b).ok_or(QrError::PerspectiveCorrectionFailed)?;
        Ok(Self {
            a11: s[0],
            a12: s[1],
            a13: s[2],
            a21: s[3],
            a22: s[4],
            a23: s[5],
            a31: s[6],
            a32: s[7],
        })
    }

    /// Map a point; points on the line at infinity map to `None`
    pub fn transform(&self, p: &Point) -> Option<Point> {
        let denominator = self.a31 * p.x + self.a32 * p.y + 1.0;
        if denominator.abs() < SINGULAR_EPSILON {
            return None;
        }
        Some(Point::new(
            (self.a11 * p.x + self.a12 * p.y + self.a13) / denominator,
            (self.a21 * p.x + self.a22 * p.y + self.a23) / denominator,
        ))
    }
}

/// Solve an 8x8 system by Gaussian elimination with partial pivoting
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(mut a: [[f64; 8]; 8], mut b: [f64; 8]) -> Option<[f64; 8]> {
    let n = 8;

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > a[max_row][i].abs() {
                max_row = k;
            }
        }
        if a[max_row][i].abs() < SINGULAR_EPSILON {
            return None;
        }
        a.swap(i, max_row);
        b.swap(i, max_row);

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}

/// z component of `(a - origin) x (b - origin)`
pub fn cross(origin: &Point, a: &Point, b: &Point) -> f64 {
    (a.x - origin.x) * (b.y - origin.y) - (a.y - origin.y) * (b.x - origin.x)
}

/// Cosine of the angle at `vertex` in the triangle `a, vertex, b`
pub fn cos_angle(a: &Point, vertex: &Point, b: &Point) -> f64 {
    let (ux, uy) = (a.x - vertex.x, a.y - vertex.y);
    let (vx, vy) = (b.x - vertex.x, b.y - vertex.y);
    let norm = (ux * ux + uy * uy).sqrt() * (vx * vx + vy * vy).sqrt();
    if norm == 0.0 {
        return 1.0;
    }
    (ux * vx + uy * vy) / norm
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(p: Point, x: f64, y: f64) -> bool {
        (p.x - x).abs() < 1e-6 && (p.y - y).abs() < 1e-6
    }

    #[test]
    fn test_perspective_transform() {
        let src = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let dst = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(0.0, 50.0),
        ];

        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        assert!(close(t.transform(&Point::new(50.0, 50.0)).unwrap(), 25.0, 25.0));
    }

    #[test]
    fn test_maps_corners_exactly() {
        let src = [
            Point::new(3.5, 3.5),
            Point::new(17.5, 3.5),
            Point::new(17.5, 17.5),
            Point::new(3.5, 17.5),
        ];
        let dst = [
            Point::new(40.0, 30.0),
            Point::new(160.0, 45.0),
            Point::new(170.0, 175.0),
            Point::new(35.0, 150.0),
        ];
        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        for (s, d) in src.iter().zip(&dst) {
            assert!(close(t.transform(s).unwrap(), d.x, d.y));
        }
    }

    #[test]
    fn test_degenerate_points() {
        let src = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        ];
        assert_eq!(
            PerspectiveTransform::from_points(&src, &src),
            Err(QrError::PerspectiveCorrectionFailed)
        );
    }

    #[test]
    fn test_angle_helpers() {
        let o = Point::new(0.0, 0.0);
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        assert!(cos_angle(&a, &o, &b).abs() < 1e-12);
        assert!(cross(&o, &a, &b) > 0.0);
        assert!(cross(&o, &b, &a) < 0.0);
    }
}
