use super::boundary::{BoundaryCollection, BoundaryFeature};
use crate::domain::errors::{AppError, DataResult};
use crate::domain::screen::{ScreenPoint, ScreenRect};
use crate::domain::trades::GeoPoint;
use std::f64::consts::{FRAC_PI_4, PI};
use std::fmt::Write as _;

/// Latitude where Web Mercator becomes square; inputs are clamped to it.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Slack, in pixels, allowed by `Projection::contains`.
pub const CONTAINS_TOLERANCE_PX: f64 = 1e-6;

/// Mercator projection fitted so the boundary's projected bounds fill the draw
/// box, centred on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    center: GeoPoint,
    scale: f64,
    translate_x: f64,
    translate_y: f64,
    width: f64,
    height: f64,
}

impl Projection {
    /// Fit to a `width` × `height` box, using the boundary centroid as the centre meridian.
    pub fn fit(boundary: &BoundaryCollection, width: f64, height: f64) -> DataResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(AppError::ValidationError(format!(
                "Draw area must be positive, got {}x{}",
                width, height
            )));
        }
        let center = boundary.centroid().ok_or_else(|| {
            AppError::BoundaryError("Boundary has no points to centre on".to_string())
        })?;

        let raw = boundary
            .features()
            .iter()
            .flat_map(BoundaryFeature::points)
            .filter(|point| point.is_valid())
            .map(|point| {
                let (x, y) = raw_mercator(*point, center.longitude);
                ScreenPoint::new(x, y)
            });
        let bounds = ScreenRect::bounding(raw).ok_or_else(|| {
            AppError::BoundaryError("Boundary has no projectable points".to_string())
        })?;

        let scale = (width / bounds.width).min(height / bounds.height);
        if !scale.is_finite() || scale <= 0.0 {
            return Err(AppError::BoundaryError(
                "Boundary extent is a single point".to_string(),
            ));
        }

        Ok(Self {
            center,
            scale,
            translate_x: (width - scale * (bounds.x + bounds.right())) / 2.0,
            translate_y: (height - scale * (bounds.y + bounds.bottom())) / 2.0,
            width,
            height,
        })
    }

    pub fn project(&self, point: GeoPoint) -> ScreenPoint {
        let (x, y) = raw_mercator(point, self.center.longitude);
        ScreenPoint::new(self.scale * x + self.translate_x, self.scale * y + self.translate_y)
    }

    /// Inverse of `project`.
    pub fn invert(&self, point: ScreenPoint) -> GeoPoint {
        let x = (point.x - self.translate_x) / self.scale;
        let y = (point.y - self.translate_y) / self.scale;
        let latitude = (2.0 * (-y).exp().atan() - PI / 2.0).to_degrees();
        let longitude = wrap_degrees(x.to_degrees() + self.center.longitude);
        GeoPoint::new(latitude, longitude)
    }

    /// Whether a projected point falls inside the draw box.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        self.draw_area().contains(point, CONTAINS_TOLERANCE_PX)
    }

    pub fn draw_area(&self) -> ScreenRect {
        ScreenRect::from_size(self.width, self.height)
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn project_boundary(&self, boundary: &BoundaryCollection) -> BoundaryPaths {
        let features = boundary
            .features()
            .iter()
            .map(|feature| ProjectedFeature {
                name: feature.name.clone(),
                rings: feature
                    .polygons
                    .iter()
                    .flat_map(|polygon| polygon.rings.iter())
                    .map(|ring| {
                        ring.iter()
                            .filter(|point| point.is_valid())
                            .map(|point| self.project(*point))
                            .collect::<Vec<_>>()
                    })
                    .filter(|ring| ring.len() >= 3)
                    .collect(),
            })
            .collect();
        BoundaryPaths { features }
    }
}

/// Unscaled Mercator with y pointing down, longitude rotated by `center_lon`.
fn raw_mercator(point: GeoPoint, center_lon: f64) -> (f64, f64) {
    let lambda = wrap_degrees(point.longitude - center_lon).to_radians();
    let phi = point.latitude.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE).to_radians();
    (lambda, -(FRAC_PI_4 + phi / 2.0).tan().ln())
}

fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    // Keep +180 as +180 instead of folding it to -180.
    if wrapped == -180.0 && degrees > 0.0 { 180.0 } else { wrapped }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFeature {
    pub name: String,
    pub rings: Vec<Vec<ScreenPoint>>,
}

impl ProjectedFeature {
    /// SVG path data, one closed subpath per ring.
    pub fn svg_path(&self) -> String {
        let mut path = String::new();
        for ring in &self.rings {
            for (i, point) in ring.iter().enumerate() {
                let command = if i == 0 { 'M' } else { 'L' };
                let _ = write!(path, "{}{:.2},{:.2}", command, point.x, point.y);
            }
            path.push('Z');
        }
        path
    }
}

/// Boundary rings already in screen space, drawn once per load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryPaths {
    features: Vec<ProjectedFeature>,
}

impl BoundaryPaths {
    pub fn features(&self) -> &[ProjectedFeature] {
        &self.features
    }

    pub fn bounds(&self) -> Option<ScreenRect> {
        ScreenRect::bounding(
            self.features.iter().flat_map(|feature| feature.rings.iter().flatten().copied()),
        )
    }

    pub fn ring_count(&self) -> usize {
        self.features.iter().map(|feature| feature.rings.len()).sum()
    }
}
