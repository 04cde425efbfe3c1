//! Obstacle archetypes for the shared virtual scene. These are immutable templates:
//! the lidar channel resamples a fresh point cluster from them on every call, and the
//! camera channel draws fixed stand-ins for them, so nothing here carries state.

use crate::errors::SensorError;
use crate::{Point3, Result, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Truck,
    Person,
    Rock,
}

impl ObstacleKind {
    /// The number of points a lidar return samples from one obstacle of this kind.
    pub fn cluster_size(&self) -> usize {
        match self {
            ObstacleKind::Truck => 1000,
            ObstacleKind::Person => 200,
            ObstacleKind::Rock => 300,
        }
    }
}

impl Display for ObstacleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ObstacleKind::Truck => write!(f, "truck"),
            ObstacleKind::Person => write!(f, "person"),
            ObstacleKind::Rock => write!(f, "rock"),
        }
    }
}

/// One obstacle archetype: a kind, a nominal position on the ground, and an extent
/// along each axis. `size.z` is the obstacle's full height; the x and y components
/// are full widths, so samplers work with half-extents in the ground plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleTemplate {
    pub kind: ObstacleKind,
    pub position: Point3,
    pub size: Vector3,
}

impl ObstacleTemplate {
    pub fn new(kind: ObstacleKind, position: Point3, size: Vector3) -> Result<Self> {
        let template = Self {
            kind,
            position,
            size,
        };
        template.validate()?;
        Ok(template)
    }

    /// Check that the template can produce a non-degenerate point cluster. Samplers
    /// draw uniformly within the half-extents, so every size component must be a
    /// strictly positive finite number and the position must be finite.
    pub fn validate(&self) -> Result<()> {
        let degenerate = |detail| SensorError::DegenerateTemplate {
            kind: self.kind,
            detail,
        };
        if !(self.position.x.is_finite() && self.position.y.is_finite() && self.position.z.is_finite())
        {
            return Err(degenerate("position must be finite").into());
        }
        for extent in [self.size.x, self.size.y, self.size.z] {
            if !extent.is_finite() {
                return Err(degenerate("size must be finite").into());
            }
            if extent <= 0.0 {
                return Err(degenerate("size must be positive along every axis").into());
            }
        }
        Ok(())
    }

    pub fn half_extents(&self) -> Vector3 {
        self.size * 0.5
    }
}

/// The reference obstacle set: one haul truck, two people, and two large rocks laid
/// out ahead and to the sides of the vehicle.
pub fn standard_scene() -> Vec<ObstacleTemplate> {
    vec![
        ObstacleTemplate {
            kind: ObstacleKind::Truck,
            position: Point3::new(15.0, 0.0, 0.0),
            size: Vector3::new(5.0, 3.0, 2.5),
        },
        ObstacleTemplate {
            kind: ObstacleKind::Person,
            position: Point3::new(8.0, 5.0, 0.0),
            size: Vector3::new(0.5, 0.5, 1.7),
        },
        ObstacleTemplate {
            kind: ObstacleKind::Person,
            position: Point3::new(12.0, -4.0, 0.0),
            size: Vector3::new(0.5, 0.5, 1.7),
        },
        ObstacleTemplate {
            kind: ObstacleKind::Rock,
            position: Point3::new(10.0, 8.0, 0.0),
            size: Vector3::new(2.0, 2.0, 1.5),
        },
        ObstacleTemplate {
            kind: ObstacleKind::Rock,
            position: Point3::new(18.0, -6.0, 0.0),
            size: Vector3::new(1.5, 1.5, 1.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_scene_cluster_sizes() {
        let scene = standard_scene();
        assert_eq!(scene.len(), 5);

        let total: usize = scene.iter().map(|t| t.kind.cluster_size()).sum();
        assert_eq!(total, 2000);

        for template in &scene {
            template.validate().unwrap();
        }
    }

    #[test]
    fn zero_extent_template_is_rejected() {
        let err = ObstacleTemplate::new(
            ObstacleKind::Rock,
            Point3::new(1.0, 1.0, 0.0),
            Vector3::new(2.0, 0.0, 1.0),
        )
        .unwrap_err();
        let typed = err.downcast_ref::<SensorError>().unwrap();
        assert!(matches!(
            typed,
            SensorError::DegenerateTemplate {
                kind: ObstacleKind::Rock,
                ..
            }
        ));
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let result = ObstacleTemplate::new(
            ObstacleKind::Person,
            Point3::new(f64::NAN, 0.0, 0.0),
            Vector3::new(0.5, 0.5, 1.7),
        );
        assert!(result.is_err());
    }
}
