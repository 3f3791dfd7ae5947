//! Boundary datasets: GeoJSON feature collections and TopoJSON topologies,
//! normalized into a flat list of named polygon features.

use crate::domain::errors::{AppError, DataResult};
use crate::domain::logging::LogComponent;
use crate::domain::trades::GeoPoint;
use crate::log_debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Property keys checked, in order, for a feature's display name.
pub const NAME_KEYS: [&str; 4] = ["shapeName", "st_nm", "name", "NAME_1"];

/// A closed ring of positions. The closing point may or may not repeat the first.
pub type Ring = Vec<GeoPoint>;

/// Exterior ring followed by any holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    pub polygons: Vec<Polygon>,
}

impl BoundaryFeature {
    pub fn points(&self) -> impl Iterator<Item = &GeoPoint> {
        self.polygons.iter().flat_map(|polygon| polygon.rings.iter().flatten())
    }
}

/// Lon/lat bounding box of a boundary collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    pub min_longitude: f64,
    pub min_latitude: f64,
    pub max_longitude: f64,
    pub max_latitude: f64,
}

impl GeoExtent {
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_longitude..=self.max_longitude).contains(&point.longitude)
            && (self.min_latitude..=self.max_latitude).contains(&point.latitude)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryCollection {
    features: Vec<BoundaryFeature>,
}

impl BoundaryCollection {
    /// Fails when no feature carries usable polygon geometry.
    pub fn new(features: Vec<BoundaryFeature>) -> DataResult<Self> {
        let features: Vec<BoundaryFeature> = features
            .into_iter()
            .filter(|feature| feature.points().any(|point| point.is_valid()))
            .collect();
        if features.is_empty() {
            return Err(AppError::BoundaryError(
                "Boundary data has no polygon geometry".to_string(),
            ));
        }
        Ok(Self { features })
    }

    /// Accepts a GeoJSON `FeatureCollection` / `Feature` or a TopoJSON `Topology`.
    pub fn from_json_slice(bytes: &[u8]) -> DataResult<Self> {
        let document: BoundaryDocument = serde_json::from_slice(bytes).map_err(|e| {
            AppError::BoundaryError(format!("Unrecognized boundary document: {}", e))
        })?;
        let features = match document {
            BoundaryDocument::FeatureCollection { features } => features
                .into_iter()
                .enumerate()
                .map(|(i, feature)| feature.into_feature(i))
                .collect(),
            BoundaryDocument::Feature(feature) => vec![feature.into_feature(0)],
            BoundaryDocument::Topology(topology) => topology.into_features()?,
        };
        let collection = Self::new(features)?;
        log_debug!(
            LogComponent::Domain("BoundaryCollection"),
            "Loaded {} boundary features",
            collection.features.len()
        );
        Ok(collection)
    }

    pub fn from_json_str(json: &str) -> DataResult<Self> {
        Self::from_json_slice(json.as_bytes())
    }

    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn valid_points(&self) -> impl Iterator<Item = &GeoPoint> {
        self.features.iter().flat_map(BoundaryFeature::points).filter(|p| p.is_valid())
    }

    pub fn extent(&self) -> Option<GeoExtent> {
        self.valid_points().fold(None, |extent, point| {
            Some(match extent {
                None => GeoExtent {
                    min_longitude: point.longitude,
                    min_latitude: point.latitude,
                    max_longitude: point.longitude,
                    max_latitude: point.latitude,
                },
                Some(e) => GeoExtent {
                    min_longitude: e.min_longitude.min(point.longitude),
                    min_latitude: e.min_latitude.min(point.latitude),
                    max_longitude: e.max_longitude.max(point.longitude),
                    max_latitude: e.max_latitude.max(point.latitude),
                },
            })
        })
    }

    /// Area-weighted planar centroid of all polygons; falls back to the mean
    /// vertex when every ring is degenerate.
    pub fn centroid(&self) -> Option<GeoPoint> {
        let mut area_sum = 0.0;
        let mut lon_sum = 0.0;
        let mut lat_sum = 0.0;

        for polygon in self.features.iter().flat_map(|f| f.polygons.iter()) {
            for (i, ring) in polygon.rings.iter().enumerate() {
                let (area, lon, lat) = ring_moments(ring);
                // Holes subtract regardless of their winding.
                let role = if i == 0 { 1.0 } else { -1.0 };
                let sign = role * area.signum();
                area_sum += sign * area;
                lon_sum += sign * lon;
                lat_sum += sign * lat;
            }
        }

        if area_sum.abs() > f64::EPSILON {
            return Some(GeoPoint::new(lat_sum / area_sum, lon_sum / area_sum));
        }

        let (count, lon, lat) = self
            .valid_points()
            .fold((0usize, 0.0, 0.0), |(n, lon, lat), p| (n + 1, lon + p.longitude, lat + p.latitude));
        (count > 0).then(|| GeoPoint::new(lat / count as f64, lon / count as f64))
    }
}

/// Signed area and first moments (area-weighted lon/lat sums) of a ring.
fn ring_moments(ring: &[GeoPoint]) -> (f64, f64, f64) {
    let points: Vec<&GeoPoint> = ring.iter().filter(|p| p.is_valid()).collect();
    if points.len() < 3 {
        return (0.0, 0.0, 0.0);
    }
    let mut area = 0.0;
    let mut lon = 0.0;
    let mut lat = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let cross = a.longitude * b.latitude - b.longitude * a.latitude;
        area += cross;
        lon += (a.longitude + b.longitude) * cross;
        lat += (a.latitude + b.latitude) * cross;
    }
    (area / 2.0, lon / 6.0, lat / 6.0)
}

fn feature_name(properties: Option<&Map<String, Value>>, index: usize) -> String {
    properties
        .and_then(|props| {
            NAME_KEYS.iter().find_map(|key| match props.get(*key)? {
                Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            })
        })
        .unwrap_or_else(|| format!("feature-{}", index))
}

fn to_ring(positions: Vec<Vec<f64>>) -> Ring {
    positions
        .into_iter()
        .filter_map(|position| match position.as_slice() {
            [lon, lat, ..] => Some(GeoPoint::new(*lat, *lon)),
            _ => None,
        })
        .collect()
}

// ---- GeoJSON ----

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum BoundaryDocument {
    FeatureCollection { features: Vec<GeoFeature> },
    Feature(GeoFeature),
    Topology(Topology),
}

#[derive(Debug, Deserialize)]
struct GeoFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<GeoGeometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    GeometryCollection { geometries: Vec<GeoGeometry> },
    #[serde(other)]
    Unsupported,
}

impl GeoGeometry {
    fn collect_polygons(self, out: &mut Vec<Polygon>) {
        match self {
            GeoGeometry::Polygon { coordinates } => out.push(Polygon {
                rings: coordinates.into_iter().map(to_ring).collect(),
            }),
            GeoGeometry::MultiPolygon { coordinates } => {
                out.extend(coordinates.into_iter().map(|rings| Polygon {
                    rings: rings.into_iter().map(to_ring).collect(),
                }))
            }
            GeoGeometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_polygons(out);
                }
            }
            GeoGeometry::Unsupported => {}
        }
    }
}

impl GeoFeature {
    fn into_feature(self, index: usize) -> BoundaryFeature {
        let name = feature_name(self.properties.as_ref(), index);
        let mut polygons = Vec::new();
        if let Some(geometry) = self.geometry {
            geometry.collect_polygons(&mut polygons);
        }
        BoundaryFeature { name, polygons }
    }
}

// ---- TopoJSON ----

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<TopoTransform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, TopoGeometry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct TopoTransform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    #[serde(other)]
    Unsupported,
}

impl Topology {
    /// Object keys iterate in sorted order, so "first" means alphabetically first.
    fn into_features(self) -> DataResult<Vec<BoundaryFeature>> {
        let arcs = self.decode_arcs();
        let Some((_, object)) = self.objects.into_iter().next() else {
            return Err(AppError::BoundaryError("Topology has no objects".to_string()));
        };

        let geometries = match object {
            TopoGeometry::GeometryCollection { geometries } => geometries,
            single => vec![single],
        };

        let mut features = Vec::with_capacity(geometries.len());
        for (index, geometry) in geometries.into_iter().enumerate() {
            let feature = match geometry {
                TopoGeometry::Polygon { arcs: rings, properties } => BoundaryFeature {
                    name: feature_name(properties.as_ref(), index),
                    polygons: vec![assemble_polygon(&arcs, &rings)?],
                },
                TopoGeometry::MultiPolygon { arcs: polygons, properties } => BoundaryFeature {
                    name: feature_name(properties.as_ref(), index),
                    polygons: polygons
                        .iter()
                        .map(|rings| assemble_polygon(&arcs, rings))
                        .collect::<DataResult<Vec<_>>>()?,
                },
                TopoGeometry::GeometryCollection { .. } | TopoGeometry::Unsupported => continue,
            };
            features.push(feature);
        }
        Ok(features)
    }

    /// Absolute lon/lat arcs; quantized arcs are delta-decoded through the transform.
    fn decode_arcs(&self) -> Vec<Ring> {
        self.arcs
            .iter()
            .map(|arc| match self.transform {
                Some(TopoTransform { scale, translate }) => {
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .filter(|position| position.len() >= 2)
                        .map(|position| {
                            x += position[0];
                            y += position[1];
                            GeoPoint::new(y * scale[1] + translate[1], x * scale[0] + translate[0])
                        })
                        .collect()
                }
                None => to_ring(arc.clone()),
            })
            .collect()
    }
}

fn assemble_polygon(arcs: &[Ring], rings: &[Vec<i64>]) -> DataResult<Polygon> {
    let rings = rings
        .iter()
        .map(|ring| assemble_ring(arcs, ring))
        .collect::<DataResult<Vec<_>>>()?;
    Ok(Polygon { rings })
}

/// Joins arcs end to start; a negative index `i` is arc `!i` reversed.
fn assemble_ring(arcs: &[Ring], indices: &[i64]) -> DataResult<Ring> {
    let mut ring: Ring = Vec::new();
    for &index in indices {
        let (position, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(position)
            .ok()
            .and_then(|position| arcs.get(position))
            .ok_or_else(|| {
                AppError::BoundaryError(format!("Arc index {} is out of range", index))
            })?;

        let points: Box<dyn Iterator<Item = &GeoPoint>> =
            if reversed { Box::new(arc.iter().rev()) } else { Box::new(arc.iter()) };
        let skip = usize::from(!ring.is_empty());
        ring.extend(points.skip(skip).copied());
    }
    Ok(ring)
}
