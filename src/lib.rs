//! This crate simulates the fixed multi-modal sensor array of a perimeter-monitoring
//! vehicle: 8 surround cameras, 5 lidars, and 5 millimeter-wave radars observing a
//! shared virtual obstacle scene. Each modality synthesizes plausible raw output on
//! demand (rasterized frames with burned-in overlays, 3D point clouds, and tracked
//! object detections) without any claim of metrological fidelity.
//!
//! The camera and lidar channels are stateless generators and can be invoked in
//! parallel across sensor ids. The radar channel owns the only persistent state (a
//! small set of moving tracks advanced on every detection request) and serializes
//! access to it internally.
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use sensim::LidarSimulator;
//!
//! let lidar = LidarSimulator::standard().unwrap();
//! let mut rng = StdRng::seed_from_u64(17);
//! let frame = lidar.synthesize_with(0, &mut rng).unwrap();
//! assert_eq!(frame.len(), 12_000);
//! ```

pub mod camera;
pub mod common;
pub mod errors;
pub mod lidar;
pub mod poses;
pub mod radar;
pub mod scene;
pub mod suite;

use std::error::Error;

pub use image;
pub use parry3d_f64::na;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

pub type Point3 = na::Point3<f64>;
pub type Vector3 = na::Vector3<f64>;
pub type Point2 = na::Point2<f64>;
pub type Vector2 = na::Vector2<f64>;

pub use camera::{CameraConfig, CameraFrame, CameraRenderer};
pub use errors::SensorError;
pub use lidar::{LidarConfig, LidarSimulator, PointCloudFrame};
pub use poses::{Modality, PoseTable, SensorPose};
pub use radar::{
    RadarConfig, RadarDetection, RadarScan, RadarSimulator, TrackedObstacle, standard_tracks,
};
pub use scene::{ObstacleKind, ObstacleTemplate, standard_scene};
pub use suite::{RadarStepping, SensorSuite, SuiteConfig};
