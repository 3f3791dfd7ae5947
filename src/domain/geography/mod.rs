pub mod boundary;
pub mod projection;
pub mod regions;

pub use boundary::{BoundaryCollection, BoundaryFeature, GeoExtent, Polygon, Ring};
pub use projection::{BoundaryPaths, ProjectedFeature, Projection};
pub use regions::{RegionIndex, region_slug};
