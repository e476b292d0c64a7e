use crate::fixtures::{self, SceneFixture};
use chainkit_baker::{bake_scene, ChainBaker};
use chainkit_core::{Error, ObjectKind, SceneError, SceneHost, SceneObject};
use chainkit_settings::FrameRange;

#[test]
fn test_missing_cam_marker_aborts_before_writing() {
    let mut scene = SceneFixture {
        with_cam_marker: false,
        ..Default::default()
    }
    .build();
    let before = scene.object_count();

    let err = bake_scene(&mut scene, &fixtures::config()).unwrap_err();
    assert!(err.is_missing_prerequisite());
    assert!(matches!(
        err,
        Error::Scene(SceneError::MissingMarker { ref object, ref marker })
            if object == "Link_B" && marker == "C0"
    ));
    assert_eq!(scene.object_count(), before);
    assert!(scene.container_objects("BakedChain_L").is_empty());
}

#[test]
fn test_cam_marker_not_needed_without_rig() {
    let mut scene = SceneFixture {
        with_cam_marker: false,
        ..Default::default()
    }
    .build();
    let mut config = fixtures::config();
    config.rig.enabled = false;
    assert!(bake_scene(&mut scene, &config).is_ok());
}

#[test]
fn test_missing_joint_markers() {
    let fixture = || SceneFixture {
        with_joints_a: false,
        ..Default::default()
    };

    let mut scene = fixture().build();
    let err = bake_scene(&mut scene, &fixtures::config()).unwrap_err();
    assert!(matches!(
        err,
        Error::Scene(SceneError::MissingMarker { ref marker, .. }) if marker == "J0"
    ));

    // With a fallback pitch the bake proceeds on +Y joints.
    let mut config = fixtures::config();
    config.links.fallback_pitch = Some(fixtures::PITCH);
    let mut scene = fixture().build();
    let report = bake_scene(&mut scene, &config).unwrap();
    assert_eq!(report.link_count, 20);
}

#[test]
fn test_wrong_kind_for_path() {
    let mut scene = fixtures::scene();
    let mut config = fixtures::config();
    config.objects.left_path = "Link_A".to_string();

    let err = bake_scene(&mut scene, &config).unwrap_err();
    assert!(matches!(
        err,
        Error::Scene(SceneError::WrongKind {
            expected: ObjectKind::Curve,
            actual: ObjectKind::Mesh,
            ..
        })
    ));
}

#[test]
fn test_invalid_config_is_a_config_error() {
    let mut scene = fixtures::scene();
    let mut config = fixtures::config();
    config.frames = FrameRange::new(10, 0);

    let err = ChainBaker::new(config).compute(&mut scene).unwrap_err();
    assert!(err.is_config_error());
    assert!(!err.is_missing_prerequisite());
}

#[test]
fn test_failed_bake_keeps_previous_output() {
    let mut scene = fixtures::scene();
    bake_scene(&mut scene, &fixtures::config()).unwrap();
    let baked = scene.object_count();

    let mut broken = fixtures::config();
    broken.objects.gear = "NoSuchGear".to_string();
    let err = bake_scene(&mut scene, &broken).unwrap_err();
    assert!(matches!(
        err,
        Error::Scene(SceneError::MissingObject { ref name }) if name == "NoSuchGear"
    ));
    assert_eq!(scene.object_count(), baked);
    assert_eq!(scene.container_objects("BakedChain_L").len(), 20);
}

#[test]
fn test_output_name_clash_keeps_previous_output() {
    let mut scene = fixtures::scene();
    let mut config = fixtures::config();
    config.rig.enabled = false;
    bake_scene(&mut scene, &config).unwrap();
    scene
        .insert(SceneObject::new("Pin_L_0000", ObjectKind::Mesh))
        .unwrap();
    let before = scene.object_count();

    config.rig.enabled = true;
    let err = bake_scene(&mut scene, &config).unwrap_err();
    assert!(err.is_missing_prerequisite());
    assert!(matches!(
        err,
        Error::Scene(SceneError::DuplicateName(ref name)) if name == "Pin_L_0000"
    ));

    assert_eq!(scene.object_count(), before);
    assert_eq!(scene.container_objects("BakedChain_L").len(), 20);
    assert_eq!(scene.container_objects("BakedChain_R").len(), 20);
    let link = scene.find_object("L_ChainLink_0000", None).unwrap();
    assert_eq!(scene.keyframes(link).unwrap().len(), 11);
}

#[test]
fn test_output_name_in_foreign_container_clashes() {
    let mut scene = fixtures::scene();
    let mut prop = SceneObject::new("R_ChainLink_0003", ObjectKind::Empty);
    prop.container = Some("Props".to_string());
    scene.insert(prop).unwrap();

    let err = bake_scene(&mut scene, &fixtures::config()).unwrap_err();
    assert!(matches!(
        err,
        Error::Scene(SceneError::DuplicateName(ref name)) if name == "R_ChainLink_0003"
    ));
    assert!(scene.container_objects("BakedChain_L").is_empty());
}
