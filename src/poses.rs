//! Static mounting poses for each sensor modality. The tables are fixed at
//! construction: 8 cameras spaced at 45° of azimuth around the vehicle, and 5
//! lidar/radar units at the front and the four corners. Lookups past the configured
//! count fail with a typed error; the array managers in [`crate::suite`] only ever
//! iterate the table's own range.

use crate::errors::SensorError;
use crate::{Result, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modality {
    Camera,
    Lidar,
    Radar,
}

impl Display for Modality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Modality::Camera => write!(f, "camera"),
            Modality::Lidar => write!(f, "lidar"),
            Modality::Radar => write!(f, "radar"),
        }
    }
}

/// The mounting pose of one sensor in the vehicle frame: a position offset, a
/// yaw/pitch/roll orientation in degrees, and a human-readable direction label.
/// Orientation is carried for clients that want it; the generators in this crate
/// translate by `position` but do not rotate the synthesized scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorPose {
    pub position: Vector3,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    pub label: String,
}

impl SensorPose {
    pub fn new(position: Vector3, yaw: f64, pitch: f64, roll: f64, label: &str) -> Self {
        Self {
            position,
            yaw,
            pitch,
            roll,
            label: label.to_string(),
        }
    }
}

/// A read-only, per-modality list of sensor poses indexed by sensor id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseTable {
    modality: Modality,
    poses: Vec<SensorPose>,
}

impl PoseTable {
    pub fn new(modality: Modality, poses: Vec<SensorPose>) -> Self {
        Self { modality, poses }
    }

    /// The standard 8-camera surround arrangement, one unit every 45° of azimuth
    /// starting at the forward direction and sweeping clockwise.
    pub fn cameras() -> Self {
        let arrangement = [
            (0.0, "front"),
            (45.0, "front-right"),
            (90.0, "right"),
            (135.0, "rear-right"),
            (180.0, "rear"),
            (-135.0, "rear-left"),
            (-90.0, "left"),
            (-45.0, "front-left"),
        ];
        let poses = arrangement
            .iter()
            .map(|(yaw, label)| SensorPose::new(Vector3::zeros(), *yaw, 0.0, 0.0, label))
            .collect();
        Self::new(Modality::Camera, poses)
    }

    /// The standard 5-lidar arrangement: front center plus the four corners, all
    /// mounted 2 units above the ground plane.
    pub fn lidars() -> Self {
        Self::new(Modality::Lidar, corner_poses())
    }

    /// The standard 5-radar arrangement, co-located with the lidar mounts.
    pub fn radars() -> Self {
        Self::new(Modality::Radar, corner_poses())
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorPose> {
        self.poses.iter()
    }

    /// Look up the mounting pose for a sensor id, failing with
    /// [`SensorError::IdOutOfRange`] when the id is not in the table.
    pub fn pose_of(&self, id: usize) -> Result<&SensorPose> {
        self.poses.get(id).ok_or_else(|| {
            SensorError::IdOutOfRange {
                modality: self.modality,
                id,
                count: self.poses.len(),
            }
            .into()
        })
    }
}

fn corner_poses() -> Vec<SensorPose> {
    let arrangement = [
        ((0.0, 0.0), "front"),
        ((2.0, 2.0), "front-right"),
        ((2.0, -2.0), "front-left"),
        ((-2.0, 2.0), "rear-right"),
        ((-2.0, -2.0), "rear-left"),
    ];
    arrangement
        .iter()
        .map(|((x, y), label)| SensorPose::new(Vector3::new(*x, *y, 2.0), 0.0, 0.0, 0.0, label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_table_has_eight_units_at_45_degree_spacing() {
        let table = PoseTable::cameras();
        assert_eq!(table.len(), 8);

        let yaws: Vec<f64> = table.iter().map(|p| p.yaw).collect();
        assert_eq!(yaws, vec![0.0, 45.0, 90.0, 135.0, 180.0, -135.0, -90.0, -45.0]);
        for pair in yaws.windows(2) {
            let step = (pair[1] - pair[0]).rem_euclid(360.0);
            assert_eq!(step, 45.0);
        }
    }

    #[test]
    fn corner_tables_have_five_units() {
        assert_eq!(PoseTable::lidars().len(), 5);
        assert_eq!(PoseTable::radars().len(), 5);
        assert_eq!(PoseTable::lidars().modality(), Modality::Lidar);
    }

    #[test]
    fn front_unit_is_centered_above_the_ground_plane() {
        let table = PoseTable::radars();
        let front = table.pose_of(0).unwrap();
        assert_eq!(front.position, Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(front.label, "front");
    }

    #[test]
    fn out_of_range_lookup_is_a_typed_error() {
        let table = PoseTable::lidars();
        let err = table.pose_of(5).unwrap_err();
        let typed = err.downcast_ref::<SensorError>().unwrap();
        assert_eq!(
            *typed,
            SensorError::IdOutOfRange {
                modality: Modality::Lidar,
                id: 5,
                count: 5
            }
        );
    }
}
