use chainkit_core::{Point3, RigidPose, Vec3};
use chainkit_kinematics::{fit_rigid, pitch_radius, ChainDrive, JointPair, SampledPath};
use std::f64::consts::{PI, TAU};

const PITCH: f64 = 6.4;

/// Regular decagon with perimeter 64, so every side is one pitch long.
fn decagon() -> SampledPath {
    let n = 10;
    let circumradius = PITCH / (2.0 * (PI / n as f64).sin());
    let points: Vec<Point3> = (0..n)
        .map(|i| {
            let a = i as f64 / n as f64 * TAU;
            Point3::new(circumradius * a.cos(), circumradius * a.sin(), 0.0)
        })
        .collect();
    SampledPath::build(&points).unwrap()
}

fn place_ring(
    path: &SampledPath,
    joints: &JointPair,
    count: usize,
    traveled: f64,
    ups: &mut [Option<Vec3>],
) -> Vec<RigidPose> {
    let targets: Vec<Point3> = (0..count)
        .map(|i| path.distance_to_world(i as f64 * PITCH + traveled))
        .collect();
    let mut chain_up: Option<Vec3> = None;
    let mut poses = Vec::with_capacity(count);
    for i in 0..count {
        let hint = ups[i].or(chain_up);
        let fit = fit_rigid(&targets[i], &targets[(i + 1) % count], joints, hint.as_ref());
        ups[i] = Some(fit.up);
        chain_up = Some(fit.up);
        poses.push(fit.pose);
    }
    poses
}

#[test]
fn test_decagon_yields_ten_links() {
    let path = decagon();
    assert!((path.total_length() - 64.0).abs() < 1e-9);
    let count = ((path.total_length() / PITCH).round() as usize).max(2);
    assert_eq!(count, 10);

    for i in 0..count {
        let target = path.distance_to_world(i as f64 * PITCH);
        let vertex = path.points()[i];
        assert!((target - vertex).norm() < 1e-9);
    }
}

#[test]
fn test_hinges_coincide_at_rest() {
    let path = decagon();
    let joints = JointPair::along_y(PITCH).unwrap();
    let mut ups = vec![None; 10];
    let poses = place_ring(&path, &joints, 10, 0.0, &mut ups);

    for i in 0..10 {
        let end = poses[i].transform_point(&joints.j1());
        let next_start = poses[(i + 1) % 10].transform_point(&joints.j0());
        assert!((end - next_start).norm() < 1e-9, "gap after link {}", i);
    }
}

#[test]
fn test_one_loop_of_travel_returns_to_start() {
    let path = decagon();
    let joints = JointPair::along_y(PITCH).unwrap();
    let drive = ChainDrive::new(pitch_radius(PITCH, 40).unwrap(), 1.0);
    assert!((drive.pitch_radius - 40.7856).abs() < 1e-3);

    let mut ups = vec![None; 10];
    let start = place_ring(&path, &joints, 10, 0.0, &mut ups);

    let theta = drive.angle_per_loop(path.total_length());
    let traveled = drive.traveled(theta);
    assert!((traveled - 64.0).abs() < 1e-9);

    let after = place_ring(&path, &joints, 10, traveled, &mut ups);
    for (a, b) in start.iter().zip(&after) {
        assert!(a.approx_eq(b, 1e-7));
    }
}
