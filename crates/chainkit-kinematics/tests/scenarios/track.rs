use chainkit_core::{Point3, Quat, Vec3};
use chainkit_kinematics::{
    direction_sign_match, generate_track_path, GearDisc, SampledPath, TrackPathParams,
};
use std::f64::consts::PI;

fn gears() -> (GearDisc, GearDisc) {
    let dims = Vec3::new(84.0, 8.0, 84.0);
    (
        GearDisc::new(Point3::new(-60.0, 0.0, 0.0), Quat::identity(), dims),
        GearDisc::new(Point3::new(60.0, 0.0, 0.0), Quat::identity(), dims),
    )
}

#[test]
fn test_track_length_matches_stadium() {
    let (a, b) = gears();
    let track = generate_track_path(&a, &b, &TrackPathParams::default()).unwrap();
    let path = SampledPath::build(&track.points).unwrap();

    let exact = 2.0 * 120.0 + 2.0 * PI * track.radius;
    let relative = (path.total_length() - exact).abs() / exact;
    assert!(relative < 1e-3, "length {} vs {}", path.total_length(), exact);
    assert!(path.total_length() < exact);
}

#[test]
fn test_mirrored_rails_detected() {
    let (a, b) = gears();
    let params = TrackPathParams::default();
    let left = generate_track_path(&a, &b, &params).unwrap();

    // Same loop built from the opposite gear order runs the other way.
    let right = generate_track_path(&b, &a, &params).unwrap();

    let left = SampledPath::build(&left.points).unwrap();
    let right = SampledPath::build(&right.points).unwrap();
    assert_eq!(direction_sign_match(&left, &left, 6.4), 1.0);
    assert_eq!(direction_sign_match(&left, &right, 6.4), -1.0);
}
