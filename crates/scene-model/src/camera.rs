//! Camera state and the model/pixel coordinate mapping.
//!
//! The scene engine positions everything in a continuous model space: the
//! camera frames a `frame_width x frame_height` window of it, centered on
//! `frame_center`, and projects that window onto a `pixel_width x
//! pixel_height` grid with y pointing down. Both mapping directions live
//! here, together with the stroke-width normalization that keeps line
//! weights resolution-independent on the wire.

use serde::{Deserialize, Serialize};

use crate::document::ViewportMeta;
use crate::style::{Color, Rgba};

/// A point on the pixel grid. Origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(v: [f64; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> [f64; 2] {
        [p.x, p.y]
    }
}

/// A point in model space. Origin at the scene center, y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A point on the z = 0 plane.
    pub fn flat(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> [f64; 3] {
        [p.x, p.y, p.z]
    }
}

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Flat projection of the z = 0 plane onto the pixel grid.
    #[default]
    Flat,
    /// Perspective projection. The capture pipeline rejects it.
    ThreeD,
}

/// Visible model-space frame height of the stock camera, in model units.
pub const DEFAULT_FRAME_HEIGHT: f64 = 8.0;

/// Camera configuration for a capture or replay session.
///
/// Frozen at session start; every frame of a session shares one camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Model-space coordinates of the frame center.
    pub frame_center_x: f64,
    pub frame_center_y: f64,

    /// Visible frame dimensions in model units.
    pub frame_width: f64,
    pub frame_height: f64,

    /// Output resolution in pixels.
    pub pixel_width: u32,
    pub pixel_height: u32,

    /// Frames per second of simulated time.
    pub frame_rate: f64,

    /// Background fill.
    pub background_color: Color,

    /// Background opacity `[0.0, 1.0]`.
    pub background_opacity: f64,

    /// Projection mode.
    #[serde(default)]
    pub projection: Projection,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::with_resolution(1920, 1080)
    }
}

impl CameraState {
    /// Camera with the given output resolution, keeping the stock
    /// model-space frame height and deriving the width from the pixel
    /// aspect ratio.
    pub fn with_resolution(pixel_width: u32, pixel_height: u32) -> Self {
        let frame_height = DEFAULT_FRAME_HEIGHT;
        let frame_width = frame_height * pixel_width as f64 / pixel_height as f64;
        Self {
            frame_center_x: 0.0,
            frame_center_y: 0.0,
            frame_width,
            frame_height,
            pixel_width,
            pixel_height,
            frame_rate: 60.0,
            background_color: Color::BLACK,
            background_opacity: 1.0,
            projection: Projection::Flat,
        }
    }

    /// Camera for replaying frames captured under the given viewport.
    ///
    /// Only the fields that drive the coordinate mapping come from the
    /// document; background styling keeps its defaults because every
    /// frame record carries its own background.
    pub fn for_playback(meta: &ViewportMeta) -> Self {
        Self {
            frame_center_x: 0.0,
            frame_center_y: 0.0,
            frame_width: meta.frame_width,
            frame_height: meta.frame_height,
            pixel_width: meta.pixel_width,
            pixel_height: meta.pixel_height,
            frame_rate: meta.frame_rate,
            background_color: Color::BLACK,
            background_opacity: 1.0,
            projection: Projection::Flat,
        }
    }

    /// Whether this camera uses the flat projection.
    pub fn is_flat(&self) -> bool {
        self.projection == Projection::Flat
    }

    /// Uniform model-to-pixel scale.
    ///
    /// Derived from the height ratio only; both axes scale by the same
    /// factor, so a non-matching width ratio letterboxes rather than
    /// stretches.
    pub fn pixels_per_unit(&self) -> f64 {
        self.pixel_height as f64 / self.frame_height
    }

    /// Map one model-space point onto the pixel grid.
    pub fn point_to_pixel(&self, p: Point3) -> Point2 {
        let scale = self.pixels_per_unit();
        let x = p.x - self.frame_center_x + self.frame_width / 2.0;
        let y = -(p.y - self.frame_center_y - self.frame_height / 2.0);
        Point2::new(x * scale, y * scale)
    }

    /// Map one pixel-grid point back into model space, on the z = 0 plane.
    pub fn point_to_model(&self, p: Point2) -> Point3 {
        let scale = self.frame_height / self.pixel_height as f64;
        let x = p.x * scale - self.frame_width / 2.0 + self.frame_center_x;
        let y = -(p.y * scale) + self.frame_height / 2.0 + self.frame_center_y;
        Point3::new(x, y, 0.0)
    }

    /// Map model-space points onto the pixel grid.
    /// Empty input maps to empty output.
    pub fn model_to_pixel(&self, points: &[Point3]) -> Vec<Point2> {
        points.iter().map(|p| self.point_to_pixel(*p)).collect()
    }

    /// Map pixel-grid points back into model space.
    /// Empty input maps to empty output.
    pub fn pixel_to_model(&self, points: &[Point2]) -> Vec<Point3> {
        points.iter().map(|p| self.point_to_model(*p)).collect()
    }

    /// Normalize a native stroke width for the wire.
    ///
    /// The wire unit is hundredths of the horizontal pixel density:
    /// `native * (pixel_width / frame_width) / 100`. Consumers scale it
    /// back up by their own output width.
    pub fn normalize_stroke_width(&self, width: f64) -> f64 {
        width * (self.pixel_width as f64 / self.frame_width) / 100.0
    }

    /// Invert [`normalize_stroke_width`](Self::normalize_stroke_width).
    pub fn denormalize_stroke_width(&self, width: f64) -> f64 {
        width * (self.frame_width / self.pixel_width as f64) * 100.0
    }

    /// The viewport metadata recorded once per document.
    pub fn viewport_meta(&self) -> ViewportMeta {
        ViewportMeta {
            frame_rate: self.frame_rate,
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            pixel_width: self.pixel_width,
            pixel_height: self.pixel_height,
        }
    }

    /// Background fill as an RGBA quad.
    pub fn background_rgba(&self) -> Rgba {
        self.background_color.with_opacity(self.background_opacity)
    }

    /// Problems that would prevent this camera from driving a session.
    /// Returns human-readable findings; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = vec![];
        if !self.frame_width.is_finite() || self.frame_width <= 0.0 {
            problems.push(format!("frame_width must be positive: {}", self.frame_width));
        }
        if !self.frame_height.is_finite() || self.frame_height <= 0.0 {
            problems.push(format!(
                "frame_height must be positive: {}",
                self.frame_height
            ));
        }
        if self.pixel_width == 0 {
            problems.push("pixel_width must be positive".to_string());
        }
        if self.pixel_height == 0 {
            problems.push("pixel_height must be positive".to_string());
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            problems.push(format!("frame_rate must be positive: {}", self.frame_rate));
        }
        if !(0.0..=1.0).contains(&self.background_opacity) {
            problems.push(format!(
                "background_opacity must be in [0, 1]: {}",
                self.background_opacity
            ));
        }
        if !self.is_flat() {
            problems.push("3D projection is not supported".to_string());
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 6x6 model frame on a 600x600 pixel grid, centered at the origin.
    fn square_camera() -> CameraState {
        CameraState {
            frame_center_x: 0.0,
            frame_center_y: 0.0,
            frame_width: 6.0,
            frame_height: 6.0,
            pixel_width: 600,
            pixel_height: 600,
            ..CameraState::default()
        }
    }

    #[test]
    fn test_top_right_corner_maps_to_top_right_pixel() {
        let camera = square_camera();
        let px = camera.point_to_pixel(Point3::flat(3.0, 3.0));
        assert!((px.x - 600.0).abs() < 1e-9);
        assert!(px.y.abs() < 1e-9);
    }

    #[test]
    fn test_pixel_maps_back_to_model() {
        let camera = square_camera();
        let model = camera.point_to_model(Point2::new(600.0, 0.0));
        assert!((model.x - 3.0).abs() < 1e-9);
        assert!((model.y - 3.0).abs() < 1e-9);
        assert_eq!(model.z, 0.0);
    }

    #[test]
    fn test_origin_maps_to_pixel_center() {
        let camera = square_camera();
        let px = camera.point_to_pixel(Point3::flat(0.0, 0.0));
        assert!((px.x - 300.0).abs() < 1e-9);
        assert!((px.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_off_center_camera_shifts_the_mapping() {
        let mut camera = square_camera();
        camera.frame_center_x = 1.0;
        camera.frame_center_y = -2.0;
        // The frame center always lands on the pixel center.
        let px = camera.point_to_pixel(Point3::flat(1.0, -2.0));
        assert!((px.x - 300.0).abs() < 1e-9);
        assert!((px.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_maps_to_empty_output() {
        let camera = square_camera();
        assert!(camera.model_to_pixel(&[]).is_empty());
        assert!(camera.pixel_to_model(&[]).is_empty());
    }

    #[test]
    fn test_scale_uses_height_ratio_only() {
        // Wide camera: width ratio differs from height ratio.
        let camera = CameraState {
            frame_width: 12.0,
            frame_height: 6.0,
            pixel_width: 600,
            pixel_height: 600,
            ..square_camera()
        };
        assert!((camera.pixels_per_unit() - 100.0).abs() < 1e-9);
        // One model unit moves 100 pixels on both axes.
        let a = camera.point_to_pixel(Point3::flat(0.0, 0.0));
        let b = camera.point_to_pixel(Point3::flat(1.0, 1.0));
        assert!((b.x - a.x - 100.0).abs() < 1e-9);
        assert!((a.y - b.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_camera_is_16_by_9() {
        let camera = CameraState::default();
        assert_eq!(camera.frame_height, DEFAULT_FRAME_HEIGHT);
        assert!((camera.frame_width - 8.0 * 1920.0 / 1080.0).abs() < 1e-9);
        assert!(camera.validate().is_empty());
    }

    #[test]
    fn test_validate_rejects_3d_projection() {
        let camera = CameraState {
            projection: Projection::ThreeD,
            ..CameraState::default()
        };
        let problems = camera.validate();
        assert!(problems.iter().any(|p| p.contains("3D")));
    }

    #[test]
    fn test_validate_rejects_degenerate_dimensions() {
        let camera = CameraState {
            frame_height: 0.0,
            pixel_width: 0,
            ..CameraState::default()
        };
        assert!(camera.validate().len() >= 2);
    }

    #[test]
    fn test_for_playback_round_trips_meta() {
        let camera = square_camera();
        let rebuilt = CameraState::for_playback(&camera.viewport_meta());
        assert_eq!(rebuilt.frame_width, camera.frame_width);
        assert_eq!(rebuilt.pixel_height, camera.pixel_height);
        assert_eq!(rebuilt.frame_rate, camera.frame_rate);
    }

    proptest! {
        #[test]
        fn prop_point_round_trip(
            x in -100.0f64..100.0,
            y in -100.0f64..100.0,
            cx in -10.0f64..10.0,
            cy in -10.0f64..10.0,
        ) {
            let camera = CameraState {
                frame_center_x: cx,
                frame_center_y: cy,
                ..CameraState::default()
            };
            let p = Point3::flat(x, y);
            let back = camera.point_to_model(camera.point_to_pixel(p));
            prop_assert!((back.x - p.x).abs() < 1e-8);
            prop_assert!((back.y - p.y).abs() < 1e-8);
            prop_assert_eq!(back.z, 0.0);
        }

        #[test]
        fn prop_stroke_width_round_trip(w in 0.0f64..1000.0) {
            let camera = CameraState::default();
            let back = camera.denormalize_stroke_width(camera.normalize_stroke_width(w));
            prop_assert!((back - w).abs() < 1e-9 * (1.0 + w));
        }
    }
}
