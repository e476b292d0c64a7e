use crate::fixtures::{self, assert_close, PITCH, RAIL_GAP};
use chainkit_baker::{bake_scene, ChainBaker};
use chainkit_core::{Point3, SceneHost, Vec3};

#[test]
fn test_bake_report_counts() {
    let mut scene = fixtures::scene();
    let report = bake_scene(&mut scene, &fixtures::config()).unwrap();

    assert_eq!(report.link_count, 20);
    assert_eq!(report.pitch, PITCH);
    assert!((report.pitch_radius - 10.0).abs() < 1e-12);
    assert!((report.left_length - 40.0).abs() < 1e-12);
    assert_eq!(report.left_sign, 1.0);
    assert_eq!(report.right_sign, 1.0);
    assert_eq!(report.connector_indices, vec![0, 6, 12, 18]);
    assert_eq!(report.rig_count, 4);
    assert_eq!(report.frame_count, 11);
    assert_eq!(report.driven_parts, vec!["Idler".to_string()]);

    // 2 rails x 20 links + 4 rigs x 6 parts
    assert_eq!(report.objects_created, 64);
    // 11 frames on every created object plus the driven part
    assert_eq!(report.keyframes_written, (64 + 1) * 11);
    assert_eq!(report.objects_cleared, 0);
}

#[test]
fn test_links_are_named_and_keyed() {
    let mut scene = fixtures::scene();
    bake_scene(&mut scene, &fixtures::config()).unwrap();

    let left = scene.container_objects("BakedChain_L");
    let right = scene.container_objects("BakedChain_R");
    assert_eq!(left.len(), 20);
    assert_eq!(right.len(), 20);

    let normal = scene.find_object("L_ChainLink_0001", None).unwrap();
    let connector = scene.find_object("R_ChainLink_0006", None).unwrap();
    assert_eq!(scene.object(normal).unwrap().source.as_deref(), Some("Link_A"));
    assert_eq!(scene.object(connector).unwrap().source.as_deref(), Some("Link_B"));

    let keys = scene.keyframes(normal).unwrap();
    assert_eq!(keys.len(), 11);
    assert_eq!(keys.first().map(|k| k.frame), Some(0));
    assert_eq!(keys.last().map(|k| k.frame), Some(10));
}

#[test]
fn test_hinges_coincide_every_frame() {
    let mut scene = fixtures::scene();
    let result = ChainBaker::new(fixtures::config()).compute(&mut scene).unwrap();
    let joints = result.setup.normal.joints;

    for rail in [&result.left, &result.right] {
        for frame in &rail.poses {
            let n = frame.len();
            for i in 0..n {
                let end = frame[i].transform_point(&joints.j1());
                let start = frame[(i + 1) % n].transform_point(&joints.j0());
                assert_close(&end, &start);
            }
        }
    }
}

#[test]
fn test_first_frame_positions() {
    let mut scene = fixtures::scene();
    let result = ChainBaker::new(fixtures::config()).compute(&mut scene).unwrap();
    let joints = result.setup.normal.joints;

    let first = result.left.pose(0, 0).unwrap();
    assert_close(&first.transform_point(&joints.j0()), &Point3::origin());
    assert_close(&first.transform_point(&joints.j1()), &Point3::new(2.0, 0.0, 0.0));

    // Link 5 starts on the first corner and runs up the second side.
    let corner = result.left.pose(0, 5).unwrap();
    assert_close(&corner.transform_point(&joints.j0()), &Point3::new(10.0, 0.0, 0.0));
    assert_close(&corner.transform_point(&joints.j1()), &Point3::new(10.0, 2.0, 0.0));

    let right = result.right.pose(0, 0).unwrap();
    assert_close(&right.transform_point(&joints.j0()), &Point3::new(0.0, 0.0, RAIL_GAP));
}

#[test]
fn test_flat_loop_keeps_up_vertical() {
    let mut scene = fixtures::scene();
    let result = ChainBaker::new(fixtures::config()).compute(&mut scene).unwrap();
    for frame in &result.left.poses {
        for pose in frame {
            let up = pose.transform_vector(&Vec3::z());
            assert!((up - Vec3::z()).norm() < 1e-9);
        }
    }
}

#[test]
fn test_links_advance_with_the_gear() {
    let mut scene = fixtures::scene();
    let result = ChainBaker::new(fixtures::config()).compute(&mut scene).unwrap();

    // 0.4 rad per frame at radius 10 moves the chain two pitches.
    assert!((result.left.traveled[1] - 4.0).abs() < 1e-9);
    for i in 0..18 {
        let moved = result.left.pose(1, i).unwrap();
        let ahead = result.left.pose(0, i + 2).unwrap();
        assert!(moved.approx_eq(ahead, 1e-9), "link {}", i);
    }
}

#[test]
fn test_full_loop_returns_to_start() {
    let mut scene = fixtures::scene();
    let result = ChainBaker::new(fixtures::config()).compute(&mut scene).unwrap();

    for i in 0..20 {
        let start = result.left.pose(0, i).unwrap();
        let end = result.left.pose(10, i).unwrap();
        assert!(start.approx_eq(end, 1e-9), "link {}", i);
    }
}

#[test]
fn test_compute_writes_nothing() {
    let mut scene = fixtures::scene();
    let before = scene.object_count();
    ChainBaker::new(fixtures::config()).compute(&mut scene).unwrap();
    assert_eq!(scene.object_count(), before);
}

#[test]
fn test_rebake_replaces_previous_output() {
    let mut scene = fixtures::scene();
    let config = fixtures::config();
    bake_scene(&mut scene, &config).unwrap();
    let count = scene.object_count();

    let second = bake_scene(&mut scene, &config).unwrap();
    assert_eq!(second.objects_cleared, 64);
    assert_eq!(scene.object_count(), count);
}

#[test]
fn test_reversed_right_rail_is_detected() {
    let mut scene = fixtures::SceneFixture {
        right_rail: fixtures::reversed_square(RAIL_GAP),
        ..Default::default()
    }
    .build();
    let report = bake_scene(&mut scene, &fixtures::config()).unwrap();
    assert_eq!(report.right_sign, -1.0);

    let mut manual = fixtures::config();
    manual.rails.auto_match_direction = false;
    let mut scene = fixtures::SceneFixture {
        right_rail: fixtures::reversed_square(RAIL_GAP),
        ..Default::default()
    }
    .build();
    let report = bake_scene(&mut scene, &manual).unwrap();
    assert_eq!(report.right_sign, 1.0);
}

#[test]
fn test_reversed_rail_keeps_links_paired() {
    let mut scene = fixtures::SceneFixture {
        left_rail: fixtures::mid_edge_square(0.0, false),
        right_rail: fixtures::mid_edge_square(RAIL_GAP, true),
        ..Default::default()
    }
    .build();
    let result = ChainBaker::new(fixtures::config()).compute(&mut scene).unwrap();
    assert_eq!(result.setup.right.direction_sign, -1.0);
    let joints = result.setup.normal.joints;
    let offset = Vec3::new(0.0, 0.0, RAIL_GAP);

    // Link i on the right stays directly across from link i on the left.
    for frame in 0..result.left.frame_count() {
        for i in 0..20 {
            let left = result.left.pose(frame, i).unwrap();
            let right = result.right.pose(frame, i).unwrap();
            for joint in [joints.j0(), joints.j1()] {
                assert_close(
                    &right.transform_point(&joint),
                    &(left.transform_point(&joint) + offset),
                );
            }
        }
    }
}

#[test]
fn test_driven_part_keys_in_place() {
    let mut scene = fixtures::scene();
    bake_scene(&mut scene, &fixtures::config()).unwrap();

    let idler = scene.find_object("Idler", None).unwrap();
    let keys = scene.keyframes(idler).unwrap();
    assert_eq!(keys.len(), 11);
    assert_eq!(keys[1].pose.translation, Vec3::new(30.0, 0.0, 0.0));
    // theta 0.4 x ratio 2 x sign -1 about X
    let scaled = keys[1].pose.rotation.scaled_axis();
    assert!((scaled - Vec3::new(-0.8, 0.0, 0.0)).norm() < 1e-9);
}
