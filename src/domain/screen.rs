use derive_more::Constructor;
use serde::Serialize;

/// Pixel position inside a surface, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Constructor, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Constructor, Serialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive on every edge, with `tolerance` pixels of slack.
    pub fn contains(&self, point: ScreenPoint, tolerance: f64) -> bool {
        point.x >= self.x - tolerance
            && point.x <= self.right() + tolerance
            && point.y >= self.y - tolerance
            && point.y <= self.bottom() + tolerance
    }

    /// Smallest rectangle covering every point; `None` for no finite points.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = ScreenPoint>,
    {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for point in points.into_iter().filter(ScreenPoint::is_finite) {
            bounds = Some(match bounds {
                None => (point.x, point.y, point.x, point.y),
                Some((x0, y0, x1, y1)) => {
                    (x0.min(point.x), y0.min(point.y), x1.max(point.x), y1.max(point.y))
                }
            });
        }
        bounds.map(|(x0, y0, x1, y1)| Self::new(x0, y0, x1 - x0, y1 - y0))
    }
}
