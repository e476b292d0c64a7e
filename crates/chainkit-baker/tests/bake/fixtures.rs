use chainkit_core::{MemoryScene, ObjectKind, Point3, RotationKey, SceneObject, Vec3};
use chainkit_settings::{BakeConfig, DrivenPart, FrameRange, PitchRadiusSource};

pub const PITCH: f64 = 2.0;
pub const SIDE: f64 = 10.0;
/// Gap between the two rails along Z
pub const RAIL_GAP: f64 = 20.0;

/// Square loop of perimeter 40 in the plane `z`, starting at the origin
/// heading +X.
pub fn square(z: f64) -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, z),
        Point3::new(SIDE, 0.0, z),
        Point3::new(SIDE, SIDE, z),
        Point3::new(0.0, SIDE, z),
    ]
}

/// The same square traversed the other way, first heading -X.
pub fn reversed_square(z: f64) -> Vec<Point3> {
    vec![
        Point3::new(SIDE, 0.0, z),
        Point3::new(0.0, 0.0, z),
        Point3::new(0.0, SIDE, z),
        Point3::new(SIDE, SIDE, z),
    ]
}

/// The square started halfway along its first side, heading +X, or heading
/// -X from the same point when `reversed`.
pub fn mid_edge_square(z: f64, reversed: bool) -> Vec<Point3> {
    let half = SIDE / 2.0;
    let mut points = vec![
        Point3::new(half, 0.0, z),
        Point3::new(SIDE, 0.0, z),
        Point3::new(SIDE, SIDE, z),
        Point3::new(0.0, SIDE, z),
        Point3::new(0.0, 0.0, z),
    ];
    if reversed {
        points[1..].reverse();
    }
    points
}

/// Scene builder with switches for the failure cases.
pub struct SceneFixture {
    pub left_rail: Vec<Point3>,
    pub right_rail: Vec<Point3>,
    pub with_joints_a: bool,
    pub with_cam_marker: bool,
}

impl Default for SceneFixture {
    fn default() -> Self {
        Self {
            left_rail: square(0.0),
            right_rail: square(RAIL_GAP),
            with_joints_a: true,
            with_cam_marker: true,
        }
    }
}

impl SceneFixture {
    pub fn build(self) -> MemoryScene {
        let mut scene = MemoryScene::new();
        let mut add = |obj: SceneObject| {
            scene.insert(obj).unwrap();
        };

        add(SceneObject::curve("TrackPath_L", self.left_rail));
        add(SceneObject::curve("TrackPath_R", self.right_rail));

        add(SceneObject::new("Link_A", ObjectKind::Mesh).with_dimensions(Vec3::new(1.0, 2.0, 0.5)));
        if self.with_joints_a {
            add(SceneObject::marker("J0", "Link_A", Vec3::zeros()));
            add(SceneObject::marker("J1", "Link_A", Vec3::new(0.0, PITCH, 0.0)));
        }

        add(SceneObject::new("Link_B", ObjectKind::Mesh).with_dimensions(Vec3::new(1.0, 2.0, 0.5)));
        add(SceneObject::marker("J0.001", "Link_B", Vec3::zeros()));
        add(SceneObject::marker("J1.001", "Link_B", Vec3::new(0.0, PITCH, 0.0)));
        if self.with_cam_marker {
            add(SceneObject::marker("C0", "Link_B", Vec3::new(0.0, 1.0, 0.0)));
        }

        // Gear turns 4 rad about X over frames 0..=10; radius 10 from bounds.
        add(SceneObject::new("Gear", ObjectKind::Mesh)
            .with_dimensions(Vec3::new(4.0, 20.0, 20.0))
            .with_rotation_keys(vec![
                RotationKey {
                    frame: 0,
                    euler: [0.0, 0.0, 0.0],
                },
                RotationKey {
                    frame: 10,
                    euler: [4.0, 0.0, 0.0],
                },
            ]));

        add(SceneObject::new("CamPin", ObjectKind::Mesh));
        add(SceneObject::marker("H0", "CamPin", Vec3::new(0.0, 0.0, 0.5)));
        add(SceneObject::new("CamFollower", ObjectKind::Mesh));
        add(SceneObject::marker("H0.001", "CamFollower", Vec3::zeros()));
        add(SceneObject::new("Wing", ObjectKind::Mesh));

        add(SceneObject::new("Idler", ObjectKind::Mesh).with_translation(Vec3::new(30.0, 0.0, 0.0)));

        scene
    }
}

pub fn scene() -> MemoryScene {
    SceneFixture::default().build()
}

/// Eleven frames, one full loop of travel, pitch radius from the gear bounds.
pub fn config() -> BakeConfig {
    let mut config = BakeConfig::default();
    config.frames = FrameRange::new(0, 10);
    config.drive.pitch_radius_source = PitchRadiusSource::GearBounds;
    config.driven_parts.push(DrivenPart {
        object: "Idler".to_string(),
        ratio: 2.0,
        sign: -1.0,
        axis: chainkit_core::Axis::X,
    });
    config
}

pub fn assert_close(a: &Point3, b: &Point3) {
    assert!((a - b).norm() < 1e-9, "{} != {}", a, b);
}
