use chainkit_baker::TrackPathGenerator;
use chainkit_core::{
    Error, GeometryError, MemoryScene, ObjectKind, SceneError, SceneHost, SceneObject, Vec3,
};
use chainkit_settings::TrackPathConfig;

fn gears(b_x: f64) -> MemoryScene {
    let mut scene = MemoryScene::new();
    // Discs in the XZ plane, thin along Y.
    for (name, x) in [("GearA", 0.0), ("GearB", b_x)] {
        scene
            .insert(
                SceneObject::new(name, ObjectKind::Mesh)
                    .with_translation(Vec3::new(x, 0.0, 0.0))
                    .with_dimensions(Vec3::new(40.0, 8.0, 40.0)),
            )
            .unwrap();
    }
    scene
}

#[test]
fn test_generates_cyclic_curve() {
    let mut scene = gears(100.0);
    let report = TrackPathGenerator::new(TrackPathConfig::default())
        .generate(&mut scene)
        .unwrap();

    assert_eq!(report.name, "TrackPath");
    assert_eq!(report.point_count, 2 * (96 + 30));
    assert!((report.radius - 18.4).abs() < 1e-12);
    assert!((report.center_distance - 100.0).abs() < 1e-12);

    let id = scene.find_object("TrackPath", Some(ObjectKind::Curve)).unwrap();
    let curve = scene.object(id).unwrap().curve.clone().unwrap();
    assert!(curve.cyclic);
    assert_eq!(curve.points.len(), report.point_count);
    for p in &curve.points {
        assert!(p.y.abs() < 1e-9, "point {} left the gear plane", p);
    }
}

#[test]
fn test_regenerating_replaces_the_curve() {
    let mut scene = gears(100.0);
    let generator = TrackPathGenerator::new(TrackPathConfig::default());
    generator.generate(&mut scene).unwrap();
    let count = scene.object_count();

    let mirrored = TrackPathGenerator::new(TrackPathConfig {
        side: -1.0,
        arc_samples: 12,
        ..TrackPathConfig::default()
    });
    let report = mirrored.generate(&mut scene).unwrap();
    assert_eq!(scene.object_count(), count);
    assert_eq!(report.point_count, 2 * (12 + 30));
}

#[test]
fn test_coincident_gears_fail() {
    let mut scene = gears(0.0);
    let err = TrackPathGenerator::new(TrackPathConfig::default())
        .generate(&mut scene)
        .unwrap_err();
    assert!(err.is_geometry_error());
    assert!(matches!(
        err,
        Error::Geometry(GeometryError::CoincidentCenters { .. })
    ));
    assert!(scene.find_object("TrackPath", None).is_err());
}

#[test]
fn test_clearance_larger_than_gears_fails() {
    let mut scene = gears(100.0);
    let config = TrackPathConfig {
        clearance: -25.0,
        ..TrackPathConfig::default()
    };
    let err = TrackPathGenerator::new(config).generate(&mut scene).unwrap_err();
    assert!(matches!(
        err,
        Error::Geometry(GeometryError::NonPositiveRadius { .. })
    ));
}

#[test]
fn test_missing_gear() {
    let mut scene = gears(100.0);
    let config = TrackPathConfig {
        gear_b: "GearC".to_string(),
        ..TrackPathConfig::default()
    };
    let err = TrackPathGenerator::new(config).generate(&mut scene).unwrap_err();
    assert!(matches!(
        err,
        Error::Scene(SceneError::MissingObject { ref name }) if name == "GearC"
    ));
}
