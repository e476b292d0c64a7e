use crate::fixtures::{self, assert_close};
use chainkit_baker::bake_scene;
use chainkit_core::{MemoryScene, ObjectKind, Point3, RigidPose, SceneHost, Vec3};
use chainkit_kinematics::{ControlPoint, Easing};
use chainkit_settings::{PartSource, WingPolicy};

fn pose_at(scene: &MemoryScene, name: &str, frame: i32) -> RigidPose {
    let id = scene.find_object(name, None).unwrap();
    scene
        .keyframes(id)
        .unwrap()
        .iter()
        .find(|k| k.frame == frame)
        .map(|k| k.pose)
        .unwrap()
}

#[test]
fn test_rig_parts_created_per_connector() {
    let mut scene = fixtures::scene();
    bake_scene(&mut scene, &fixtures::config()).unwrap();

    assert_eq!(scene.container_objects("BakedCamAndWings").len(), 24);
    for name in [
        "Pin_L_0006",
        "Pin_R_0006",
        "Follower_L_0012",
        "Follower_R_0012",
        "WingPivot_0018",
        "Wing_0000",
    ] {
        let id = scene.find_object(name, None).unwrap();
        assert_eq!(scene.keyframes(id).unwrap().len(), 11, "{}", name);
    }
    assert!(scene.find_object("Pin_L_0001", None).is_err());

    let pivot = scene.find_object("WingPivot_0000", None).unwrap();
    assert_eq!(scene.object(pivot).unwrap().kind, ObjectKind::Empty);
    let wing = scene.find_object("Wing_0000", None).unwrap();
    assert_eq!(scene.object(wing).unwrap().source.as_deref(), Some("Wing"));
}

#[test]
fn test_pins_and_followers_sit_at_outer_distances() {
    let mut scene = fixtures::scene();
    bake_scene(&mut scene, &fixtures::config()).unwrap();

    // Cam points of ring index 0 at frame 0 are (1, 0, 0) and (1, 0, 20).
    let hinge = Point3::new(0.0, 0.0, 0.5);
    let pin_l = pose_at(&scene, "Pin_L_0000", 0);
    let pin_r = pose_at(&scene, "Pin_R_0000", 0);
    assert_close(&pin_l.transform_point(&hinge), &Point3::new(1.0, 0.0, -62.0));
    assert_close(&pin_r.transform_point(&hinge), &Point3::new(1.0, 0.0, 82.0));

    let follower_l = pose_at(&scene, "Follower_L_0000", 0);
    let follower_r = pose_at(&scene, "Follower_R_0000", 0);
    assert_close(&follower_l.position(), &Point3::new(1.0, 0.0, -66.0));
    assert_close(&follower_r.position(), &Point3::new(1.0, 0.0, 86.0));

    // Pins keep their own link's rotation.
    let link = pose_at(&scene, "L_ChainLink_0000", 0);
    assert_eq!(pin_l.rotation, link.rotation);
}

#[test]
fn test_pivot_followers_and_wing_share_one_basis() {
    let mut scene = fixtures::scene();
    bake_scene(&mut scene, &fixtures::config()).unwrap();

    for frame in 0..=10 {
        let pivot = pose_at(&scene, "WingPivot_0006", frame);
        let wing = pose_at(&scene, "Wing_0006", frame);
        let follower_l = pose_at(&scene, "Follower_L_0006", frame);
        let follower_r = pose_at(&scene, "Follower_R_0006", frame);
        assert_eq!(follower_l.rotation, pivot.rotation);
        assert_eq!(follower_r.rotation, pivot.rotation);
        assert_eq!(wing, pivot);
        // Forced onto the x = 0 plane, halfway between the rails.
        assert_eq!(pivot.translation.x, 0.0);
        assert!((pivot.translation.z - 10.0).abs() < 1e-9);
    }

    // Tangent-relative: forward follows the link.
    let pivot = pose_at(&scene, "WingPivot_0000", 0);
    let forward = pivot.transform_vector(&Vec3::y());
    assert!((forward - Vec3::x()).norm() < 1e-9);
}

#[test]
fn test_angle_map_pitches_the_wing() {
    let mut config = fixtures::config();
    config.rig.wing = WingPolicy::AngleMap {
        easing: Easing::Linear,
        sign: 1.0,
        points: vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(0.5, 90.0),
            ControlPoint::new(1.0, 0.0),
        ],
    };
    let mut scene = fixtures::scene();
    bake_scene(&mut scene, &config).unwrap();

    // Ring index 6 sits at distance 12 of 40: u = 0.3, 54 degrees.
    let pivot = pose_at(&scene, "WingPivot_0006", 0);
    let forward = pivot.transform_vector(&Vec3::y());
    let angle = 54f64.to_radians();
    let expected = Vec3::new(-angle.sin(), angle.cos(), 0.0);
    assert!((forward - expected).norm() < 1e-9, "{}", forward);

    // Ring index 0 at u = 0 is unpitched.
    let pivot = pose_at(&scene, "WingPivot_0000", 0);
    assert!((pivot.transform_vector(&Vec3::y()) - Vec3::x()).norm() < 1e-9);
}

#[test]
fn test_empty_part_sources() {
    let mut config = fixtures::config();
    config.rig.pin_source = PartSource::Empty;
    config.rig.wing_source = PartSource::Empty;
    let mut scene = fixtures::scene();
    bake_scene(&mut scene, &config).unwrap();

    let pin = scene.find_object("Pin_L_0000", None).unwrap();
    assert_eq!(scene.object(pin).unwrap().kind, ObjectKind::Empty);
    assert_eq!(scene.object(pin).unwrap().source, None);
    let pose = pose_at(&scene, "Pin_L_0000", 0);
    assert_close(&pose.position(), &Point3::new(1.0, 0.0, -62.0));

    let follower = scene.find_object("Follower_L_0000", None).unwrap();
    assert_eq!(
        scene.object(follower).unwrap().source.as_deref(),
        Some("CamFollower")
    );
}

#[test]
fn test_rig_disabled_creates_no_parts() {
    let mut config = fixtures::config();
    config.rig.enabled = false;
    let mut scene = fixtures::scene();
    let report = bake_scene(&mut scene, &config).unwrap();

    assert_eq!(report.rig_count, 0);
    assert_eq!(report.objects_created, 40);
    assert!(scene.container_objects("BakedCamAndWings").is_empty());
}
