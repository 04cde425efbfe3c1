//! Renders a synthetic surveillance frame per camera unit: a gridded backdrop with a
//! horizon, identification and timestamp lines, distance-ring annotations, a
//! field-of-view wedge, a fixed set of annotated obstacle shapes, and an obstacle
//! summary panel. Every camera draws the identical obstacle layout at constant
//! canvas coordinates and differs only in its header text; there is no per-viewpoint
//! projection. Rendering is pure apart from reading the wall clock for the
//! timestamp, so frames for different units can be produced in parallel.

mod hud;

use crate::common::epoch_seconds;
use crate::poses::{PoseTable, SensorPose};
use crate::Result;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

const GRID_COLOR: Rgb<u8> = Rgb([30, 30, 30]);
const HORIZON_COLOR: Rgb<u8> = Rgb([50, 50, 50]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TRUCK_BODY_COLOR: Rgb<u8> = Rgb([0, 200, 200]);
const TRUCK_CAB_COLOR: Rgb<u8> = Rgb([0, 150, 150]);
const WHEEL_COLOR: Rgb<u8> = Rgb([100, 100, 100]);
const PERSON_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const ROCK_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

const GRID_CELL: u32 = 50;
const RING_SPACING: u32 = 5;
const RING_MAX: u32 = 30;
const FOV_DEGREES: i32 = 90;
const FOV_RADIUS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// One rendered frame: the raster with its overlays burned in, plus the identity of
/// the camera that produced it. Encoding to a transport format is a caller concern.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    pub image: RgbImage,
    pub camera_id: usize,
    pub pose: SensorPose,
    pub timestamp: f64,
}

pub struct CameraRenderer {
    poses: PoseTable,
    config: CameraConfig,
}

impl CameraRenderer {
    pub fn new(poses: PoseTable, config: CameraConfig) -> Self {
        Self { poses, config }
    }

    /// The reference array: eight surround cameras at 1080p.
    pub fn standard() -> Self {
        Self::new(PoseTable::cameras(), CameraConfig::default())
    }

    pub fn sensor_count(&self) -> usize {
        self.poses.len()
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Render a frame for one camera unit, stamped with the current wall-clock time.
    pub fn render(&self, camera_id: usize) -> Result<CameraFrame> {
        self.render_at(camera_id, epoch_seconds())
    }

    /// Render a frame for one camera unit with an explicit timestamp. Rendering is
    /// deterministic in `(camera_id, timestamp)`.
    pub fn render_at(&self, camera_id: usize, timestamp: f64) -> Result<CameraFrame> {
        let pose = self.poses.pose_of(camera_id)?.clone();
        let (w, h) = (self.config.width, self.config.height);
        let mut image = RgbImage::new(w, h);

        self.draw_backdrop(&mut image);

        let header = format!("CAMERA {} - {}", camera_id + 1, pose.label);
        hud::draw_text(&mut image, &header, (50.0, 50.0), 22.0, 2, TEXT_COLOR);
        let clock = format!("TIME: {timestamp:.3} | FPS: 30");
        hud::draw_text(&mut image, &clock, (50.0, 100.0), 22.0, 2, TEXT_COLOR);

        self.draw_distance_rings(&mut image);
        self.draw_fov_wedge(&mut image);
        self.draw_obstacles(&mut image);
        self.draw_summary_panel(&mut image);

        Ok(CameraFrame {
            image,
            camera_id,
            pose,
            timestamp,
        })
    }

    fn draw_backdrop(&self, image: &mut RgbImage) {
        let (w, h) = (self.config.width as f32, self.config.height as f32);
        for y in (0..self.config.height).step_by(GRID_CELL as usize) {
            draw_line_segment_mut(image, (0.0, y as f32), (w, y as f32), GRID_COLOR);
        }
        for x in (0..self.config.width).step_by(GRID_CELL as usize) {
            draw_line_segment_mut(image, (x as f32, 0.0), (x as f32, h), GRID_COLOR);
        }

        let horizon = (self.config.height / 3) as f32;
        draw_line_segment_mut(image, (0.0, horizon), (w, horizon), HORIZON_COLOR);
        draw_line_segment_mut(image, (0.0, horizon + 1.0), (w, horizon + 1.0), HORIZON_COLOR);
    }

    /// Horizontal range annotations, nearest at the bottom of the frame and the
    /// maximum range on the top edge.
    fn draw_distance_rings(&self, image: &mut RgbImage) {
        let w = self.config.width as f32;
        for distance in (RING_SPACING..=RING_MAX).step_by(RING_SPACING as usize) {
            let fraction = 1.0 - distance as f64 / RING_MAX as f64;
            let y = (self.config.height as f64 * fraction) as f32;
            draw_line_segment_mut(image, (0.0, y), (w, y), MARKER_COLOR);
            let label = format!("{distance}M");
            hud::draw_text(image, &label, (10.0, y - 10.0), 11.0, 1, MARKER_COLOR);
        }
    }

    /// The 90° field-of-view wedge, drawn as radial line segments at 1° resolution
    /// from the bottom center of the frame.
    fn draw_fov_wedge(&self, image: &mut RgbImage) {
        let cx = (self.config.width / 2) as f64;
        let cy = self.config.height as f64;
        for angle in -FOV_DEGREES / 2..=FOV_DEGREES / 2 {
            let rad = (angle as f64).to_radians();
            let tip_x = cx + FOV_RADIUS * rad.sin();
            let tip_y = cy - FOV_RADIUS * rad.cos();
            draw_line_segment_mut(
                image,
                (cx as f32, cy as f32),
                (tip_x as f32, tip_y as f32),
                MARKER_COLOR,
            );
        }
    }

    fn draw_obstacles(&self, image: &mut RgbImage) {
        self.draw_truck(image, 960, 700);
        self.draw_person(image, 500, 800);
        self.draw_person(image, 1400, 750);
        self.draw_rock(image, 700, 600);
        self.draw_rock(image, 1200, 650);
    }

    fn draw_truck(&self, image: &mut RgbImage, x: i32, y: i32) {
        draw_filled_rect_mut(
            image,
            Rect::at(x - 100, y - 50).of_size(200, 80),
            TRUCK_BODY_COLOR,
        );
        draw_filled_circle_mut(image, (x - 70, y + 30), 20, WHEEL_COLOR);
        draw_filled_circle_mut(image, (x + 70, y + 30), 20, WHEEL_COLOR);
        draw_filled_rect_mut(
            image,
            Rect::at(x - 30, y - 80).of_size(60, 30),
            TRUCK_CAB_COLOR,
        );

        annotate(
            image,
            Rect::at(x - 110, y - 90).of_size(220, 130),
            "HAUL TRUCK - 15.2M",
            (x - 100, y - 100),
        );
    }

    fn draw_person(&self, image: &mut RgbImage, x: i32, y: i32) {
        draw_filled_circle_mut(image, (x, y - 40), 15, PERSON_COLOR);
        thick_line(image, (x, y - 25), (x, y + 10), PERSON_COLOR);
        thick_line(image, (x, y - 10), (x - 20, y + 40), PERSON_COLOR);
        thick_line(image, (x, y - 10), (x + 20, y + 40), PERSON_COLOR);
        thick_line(image, (x, y - 20), (x - 20, y - 20), PERSON_COLOR);
        thick_line(image, (x, y - 20), (x + 20, y - 20), PERSON_COLOR);

        annotate(
            image,
            Rect::at(x - 30, y - 50).of_size(60, 100),
            "PERSON - 8.5M",
            (x - 40, y - 60),
        );
    }

    fn draw_rock(&self, image: &mut RgbImage, x: i32, y: i32) {
        let outline = [
            Point::new(x - 40, y + 30),
            Point::new(x - 30, y - 30),
            Point::new(x + 40, y - 20),
            Point::new(x + 30, y + 40),
        ];
        draw_polygon_mut(image, &outline, ROCK_COLOR);

        annotate(
            image,
            Rect::at(x - 50, y - 40).of_size(100, 90),
            "ROCK - 12.3M",
            (x - 40, y - 50),
        );
    }

    /// The semi-transparent obstacle-count panel in the lower-left corner.
    fn draw_summary_panel(&self, image: &mut RgbImage) {
        let (panel_w, panel_h) = (300u32, 120u32);
        let x = 20i32;
        let y = self.config.height.saturating_sub(panel_h + 20) as i32;

        dim_region(image, x, y, panel_w, panel_h);

        let base = (x as f32, y as f32);
        hud::draw_text(
            image,
            "OBSTACLES DETECTED:",
            (base.0 + 10.0, base.1 + 30.0),
            15.0,
            2,
            TEXT_COLOR,
        );
        hud::draw_text(
            image,
            "- HAUL TRUCKS: 1",
            (base.0 + 20.0, base.1 + 60.0),
            13.0,
            1,
            TRUCK_BODY_COLOR,
        );
        hud::draw_text(
            image,
            "- PERSONNEL: 2",
            (base.0 + 20.0, base.1 + 85.0),
            13.0,
            1,
            PERSON_COLOR,
        );
        hud::draw_text(
            image,
            "- LARGE ROCKS: 2",
            (base.0 + 20.0, base.1 + 110.0),
            13.0,
            1,
            ROCK_COLOR,
        );
    }
}

/// A 3-pixel brush line for the stick-figure limbs.
fn thick_line(image: &mut RgbImage, from: (i32, i32), to: (i32, i32), color: Rgb<u8>) {
    for offset in -1..=1 {
        draw_line_segment_mut(
            image,
            ((from.0 + offset) as f32, from.1 as f32),
            ((to.0 + offset) as f32, to.1 as f32),
            color,
        );
        draw_line_segment_mut(
            image,
            (from.0 as f32, (from.1 + offset) as f32),
            (to.0 as f32, (to.1 + offset) as f32),
            color,
        );
    }
}

/// A green annotation: a 2-pixel hollow marker box plus a distance label above it.
fn annotate(image: &mut RgbImage, marker: Rect, label: &str, label_at: (i32, i32)) {
    draw_hollow_rect_mut(image, marker, MARKER_COLOR);
    let inner = Rect::at(marker.left() + 1, marker.top() + 1)
        .of_size(marker.width() - 2, marker.height() - 2);
    draw_hollow_rect_mut(image, inner, MARKER_COLOR);
    hud::draw_text(
        image,
        label,
        (label_at.0 as f32, label_at.1 as f32),
        15.0,
        2,
        MARKER_COLOR,
    );
}

/// Halve every channel in a rectangular region, the burned-in equivalent of
/// compositing a 50% black panel over it.
fn dim_region(image: &mut RgbImage, x: i32, y: i32, w: u32, h: u32) {
    for py in y..y + h as i32 {
        for px in x..x + w as i32 {
            if px >= 0 && py >= 0 && (px as u32) < image.width() && (py as u32) < image.height() {
                let pixel = image.get_pixel_mut(px as u32, py as u32);
                pixel.0 = [pixel.0[0] / 2, pixel.0[1] / 2, pixel.0[2] / 2];
            }
        }
    }
}
