//! Array managers for the three sensor modalities: each query walks the modality's
//! pose table and collects one result per sensor id. Camera and lidar captures are
//! pure per call and fan out across rayon; radar queries stay sequential because
//! every detection request mutates the shared track field.

use crate::Result;
use crate::camera::{CameraConfig, CameraFrame, CameraRenderer};
use crate::lidar::{LidarConfig, LidarSimulator, PointCloudFrame};
use crate::poses::PoseTable;
use crate::radar::{RadarConfig, RadarScan, RadarSimulator, standard_tracks};
use crate::scene::standard_scene;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the shared radar track field advances when a whole-array query fans out over
/// the radar ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RadarStepping {
    /// One kinematics step per radar queried: five radars move the field five steps
    /// per sweep. This is the reference cadence.
    #[default]
    PerRadar,
    /// One kinematics step per logical sweep, after which every radar observes the
    /// same field state.
    PerSweep,
}

/// The whole-suite configuration, loadable from JSON. Missing fields fall back to
/// the reference constants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub camera: CameraConfig,
    pub lidar: LidarConfig,
    pub radar: RadarConfig,
    pub stepping: RadarStepping,
}

impl SuiteConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// The full perimeter-monitoring array: 8 cameras, 5 lidars, and 5 radars over the
/// standard scene and track field.
pub struct SensorSuite {
    cameras: CameraRenderer,
    lidars: LidarSimulator,
    radars: RadarSimulator,
    stepping: RadarStepping,
}

impl SensorSuite {
    /// Assemble a suite from already-built channels, for callers that want custom
    /// pose tables, scenes, or track fields.
    pub fn new(
        cameras: CameraRenderer,
        lidars: LidarSimulator,
        radars: RadarSimulator,
        stepping: RadarStepping,
    ) -> Self {
        Self {
            cameras,
            lidars,
            radars,
            stepping,
        }
    }

    /// Assemble the reference arrays with the given tuning parameters.
    pub fn from_config(config: SuiteConfig) -> Result<Self> {
        Ok(Self::new(
            CameraRenderer::new(PoseTable::cameras(), config.camera),
            LidarSimulator::new(PoseTable::lidars(), standard_scene(), config.lidar)?,
            RadarSimulator::new(PoseTable::radars(), standard_tracks(), config.radar)?,
            config.stepping,
        ))
    }

    /// The reference suite with default tuning.
    pub fn standard() -> Result<Self> {
        Self::from_config(SuiteConfig::default())
    }

    pub fn cameras(&self) -> &CameraRenderer {
        &self.cameras
    }

    pub fn lidars(&self) -> &LidarSimulator {
        &self.lidars
    }

    pub fn radars(&self) -> &RadarSimulator {
        &self.radars
    }

    /// One frame per camera id, rendered in parallel.
    pub fn camera_frames(&self) -> Result<Vec<CameraFrame>> {
        debug!(count = self.cameras.sensor_count(), "rendering camera array");
        (0..self.cameras.sensor_count())
            .into_par_iter()
            .map(|id| self.cameras.render(id))
            .collect()
    }

    /// One point cloud per lidar id, synthesized in parallel.
    pub fn point_clouds(&self) -> Result<Vec<PointCloudFrame>> {
        debug!(count = self.lidars.sensor_count(), "synthesizing lidar array");
        (0..self.lidars.sensor_count())
            .into_par_iter()
            .map(|id| self.lidars.synthesize(id))
            .collect()
    }

    /// One detection scan per radar id. Sequential: the track field is shared, and
    /// the stepping mode decides whether it advances per radar or once per sweep.
    pub fn radar_scans(&self) -> Result<Vec<RadarScan>> {
        debug!(
            count = self.radars.sensor_count(),
            stepping = ?self.stepping,
            "collecting radar array"
        );
        match self.stepping {
            RadarStepping::PerRadar => (0..self.radars.sensor_count())
                .map(|id| self.radars.detect(id))
                .collect(),
            RadarStepping::PerSweep => {
                self.radars.advance(self.radars.config().dt);
                (0..self.radars.sensor_count())
                    .map(|id| self.radars.observe(id))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn standard_suite_collects_every_sensor() {
        let suite = SensorSuite::standard().unwrap();

        let frames = suite.camera_frames().unwrap();
        assert_eq!(frames.len(), 8);
        for (id, frame) in frames.iter().enumerate() {
            assert_eq!(frame.camera_id, id);
        }

        let clouds = suite.point_clouds().unwrap();
        assert_eq!(clouds.len(), 5);
        for (id, cloud) in clouds.iter().enumerate() {
            assert_eq!(cloud.lidar_id, id);
            assert_eq!(cloud.len(), 12_000);
        }

        let scans = suite.radar_scans().unwrap();
        assert_eq!(scans.len(), 5);
        for (id, scan) in scans.iter().enumerate() {
            assert_eq!(scan.radar_id, id);
        }
    }

    fn noiseless_suite(stepping: RadarStepping) -> SensorSuite {
        let config = SuiteConfig {
            radar: RadarConfig::noiseless(),
            stepping,
            ..SuiteConfig::default()
        };
        SensorSuite::from_config(config).unwrap()
    }

    #[test]
    fn per_radar_stepping_advances_once_per_unit() {
        let suite = noiseless_suite(RadarStepping::PerRadar);
        suite.radar_scans().unwrap();
        // Five radar queries move the truck 5 × dt × 2.0 from its start at x = 15.
        let truck = &suite.radars().tracks()[0];
        assert_relative_eq!(truck.position.x, 14.0, epsilon = 1e-12);
    }

    #[test]
    fn per_sweep_stepping_advances_once_per_cycle() {
        let suite = noiseless_suite(RadarStepping::PerSweep);
        let scans = suite.radar_scans().unwrap();
        let truck = &suite.radars().tracks()[0];
        assert_relative_eq!(truck.position.x, 14.8, epsilon = 1e-12);

        // Every radar observed the same field state: the truck's distance from each
        // mount matches the single post-step position.
        for scan in &scans {
            let mount = &scan.pose.position;
            let expected =
                ((14.8 - mount.x).powi(2) + (0.0 - mount.y).powi(2)).sqrt();
            let hit = scan.detections.iter().find(|d| d.id == 1).unwrap();
            assert_relative_eq!(hit.distance, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SuiteConfig {
            stepping: RadarStepping::PerSweep,
            ..SuiteConfig::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        let parsed = SuiteConfig::from_json_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_config_falls_back_to_reference_constants() {
        let parsed = SuiteConfig::from_json_str(r#"{"stepping": "PerSweep"}"#).unwrap();
        assert_eq!(parsed.stepping, RadarStepping::PerSweep);
        assert_eq!(parsed.radar.max_range, 30.0);
        assert_eq!(parsed.camera.width, 1920);
        assert_eq!(parsed.lidar.grid_divisions, 100);
    }
}
