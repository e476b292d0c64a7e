//! # ChainKit Kinematics
//!
//! Host-free building blocks of the chain baker:
//! - [`SampledPath`]: arc-length indexed closed polylines
//! - [`Basis`]: stable frame transport along a tangent
//! - [`fit_rigid`]: exact two-joint rigid placement
//! - drive model: pitch radius, travel, gear-ratio coupling
//! - [`AngleMap`]: cam/wing angle profile over the loop parameter
//! - [`generate_track_path`]: the closed loop around two equal gears
//!
//! Nothing here talks to a scene; every function is a pure computation over
//! `chainkit-core` math types.

pub mod angle_map;
pub mod drive;
pub mod frame;
pub mod joint_fit;
pub mod path;
pub mod track_path;

pub use angle_map::{AngleMap, ControlPoint, Easing};
pub use drive::{pitch_radius, radius_from_dimensions, ChainDrive, GearCoupling, SyntheticPhase};
pub use frame::{world_up, Basis};
pub use joint_fit::{fit_rigid, JointFit, JointPair};
pub use path::{direction_sign_match, SampledPath};
pub use track_path::{generate_track_path, GearDisc, TrackLoop, TrackPathParams};
