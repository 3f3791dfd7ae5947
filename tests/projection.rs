use muhurat_trade_map::domain::geography::{BoundaryCollection, Projection};
use muhurat_trade_map::domain::screen::ScreenPoint;
use muhurat_trade_map::domain::trades::GeoPoint;
use quickcheck_macros::quickcheck;

const SQUARE: &str = r#"{
    "type": "FeatureCollection",
    "features": [{
        "type": "Feature",
        "properties": {"shapeName": "Square"},
        "geometry": {"type": "Polygon", "coordinates": [[[70, 10], [90, 10], [90, 30], [70, 30], [70, 10]]]}
    }]
}"#;

const TOPOLOGY: &str = r#"{
    "type": "Topology",
    "transform": {"scale": [1, 1], "translate": [70, 10]},
    "arcs": [
        [[0, 0], [20, 0], [0, 20]],
        [[20, 20], [-20, 0], [0, -20]]
    ],
    "objects": {
        "states": {
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Polygon", "arcs": [[0, 1]], "properties": {"st_nm": "Square"}},
                {"type": "Point", "coordinates": [0, 0]}
            ]
        },
        "zz_unused": {"type": "GeometryCollection", "geometries": []}
    }
}"#;

fn square() -> BoundaryCollection {
    BoundaryCollection::from_json_str(SQUARE).unwrap()
}

#[test]
fn geojson_and_topojson_decode_to_the_same_ring() {
    let geo = square();
    let topo = BoundaryCollection::from_json_str(TOPOLOGY).unwrap();

    assert_eq!(topo.len(), 1);
    assert_eq!(topo.features()[0].name, "Square");
    let geo_ring = geo.features()[0].polygons[0].exterior().unwrap();
    let topo_ring = topo.features()[0].polygons[0].exterior().unwrap();
    assert_eq!(geo_ring, topo_ring);
    assert_eq!(topo_ring.first(), Some(&GeoPoint::new(10.0, 70.0)));
}

#[test]
fn boundary_without_polygons_is_rejected() {
    let error = BoundaryCollection::from_json_str(
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}}
        ]}"#,
    )
    .unwrap_err();
    assert!(error.to_string().starts_with("Boundary Error"));
    assert!(BoundaryCollection::from_json_str("[1, 2, 3]").is_err());
}

#[test]
fn topology_with_bad_arc_index_is_rejected() {
    let json = TOPOLOGY.replace("[[0, 1]]", "[[0, 7]]");
    assert!(BoundaryCollection::from_json_str(&json).is_err());
}

#[test]
fn centroid_of_a_square_is_its_middle() {
    let centroid = square().centroid().unwrap();
    assert!((centroid.longitude - 80.0).abs() < 1e-9);
    assert!((centroid.latitude - 20.0).abs() < 1e-9);
}

#[test]
fn fitted_bounds_touch_the_box_and_are_centred() {
    let boundary = square();
    let projection = Projection::fit(&boundary, 400.0, 300.0).unwrap();
    let bounds = projection.project_boundary(&boundary).bounds().unwrap();

    let fills_width = (bounds.width - 400.0).abs() < 1e-6;
    let fills_height = (bounds.height - 300.0).abs() < 1e-6;
    assert!(fills_width || fills_height);
    assert!((bounds.x + bounds.width / 2.0 - 200.0).abs() < 1e-6);
    assert!((bounds.y + bounds.height / 2.0 - 150.0).abs() < 1e-6);
}

#[test]
fn north_is_up() {
    let projection = Projection::fit(&square(), 400.0, 300.0).unwrap();
    let north = projection.project(GeoPoint::new(29.0, 80.0));
    let south = projection.project(GeoPoint::new(11.0, 80.0));
    assert!(north.y < south.y);
}

#[test]
fn invert_undoes_project() {
    let projection = Projection::fit(&square(), 400.0, 300.0).unwrap();
    let point = GeoPoint::new(19.07, 72.87);
    let back = projection.invert(projection.project(point));
    assert!((back.latitude - point.latitude).abs() < 1e-9);
    assert!((back.longitude - point.longitude).abs() < 1e-9);
}

#[test]
fn fit_rejects_an_empty_box() {
    assert!(Projection::fit(&square(), 0.0, 300.0).is_err());
    assert!(Projection::fit(&square(), 400.0, f64::NAN).is_err());
}

#[test]
fn points_outside_the_box_are_not_contained() {
    let projection = Projection::fit(&square(), 400.0, 300.0).unwrap();
    assert!(!projection.contains(projection.project(GeoPoint::new(-40.0, 150.0))));
    assert!(!projection.contains(ScreenPoint::new(-1.0, 10.0)));
}

#[test]
fn svg_path_closes_every_ring() {
    let boundary = square();
    let paths = Projection::fit(&boundary, 400.0, 300.0).unwrap().project_boundary(&boundary);
    let path = paths.features()[0].svg_path();
    assert!(path.starts_with('M'));
    assert!(path.ends_with('Z'));
    assert_eq!(paths.ring_count(), 1);
}

#[quickcheck]
fn points_inside_the_extent_project_inside_the_box(lat: u16, lon: u16, w: u16, h: u16) -> bool {
    let latitude = 10.0 + f64::from(lat) / f64::from(u16::MAX) * 20.0;
    let longitude = 70.0 + f64::from(lon) / f64::from(u16::MAX) * 20.0;
    let width = 50.0 + f64::from(w % 2000);
    let height = 50.0 + f64::from(h % 2000);

    let projection = Projection::fit(&square(), width, height).unwrap();
    projection.contains(projection.project(GeoPoint::new(latitude, longitude)))
}
