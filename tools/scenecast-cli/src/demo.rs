//! Built-in demo scene.
//!
//! A dot orbiting the origin, a filled square sliding along the lower
//! half, and a fixed raster badge in the top-left corner. Enough motion
//! to exercise every drawable kind without an external scene engine.

use scenecast_capture::{CaptureSession, SceneSource};
use scenecast_scene_model::{
    Color, Drawable, ObjectId, PathShape, PixelBuffer, Point3, PointCloud, RasterImage, SceneNode,
};

pub struct OrbitDemo {
    dot: ObjectId,
    slider: ObjectId,
    badge: ObjectId,
    bitmap: PixelBuffer,
    instant: u64,
    instants: u64,
}

impl OrbitDemo {
    /// Register the demo's identities and run for the given number of
    /// frames.
    pub fn new(session: &mut CaptureSession, instants: u64) -> Self {
        Self {
            dot: session.register(),
            slider: session.register(),
            badge: session.register(),
            bitmap: PixelBuffer::solid(2, 2, [252, 98, 85, 255]),
            instant: 0,
            instants: instants.max(1),
        }
    }

    fn orbit_dot(&self, angle: f64) -> SceneNode {
        SceneNode::leaf(
            self.dot,
            Drawable::Points(PointCloud {
                points: vec![Point3::flat(2.0 * angle.cos(), 2.0 * angle.sin())],
                color: Color::new(0x58, 0xc4, 0xdd),
                stroke_width: 8.0,
            }),
        )
    }

    fn sliding_square(&self, phase: f64) -> SceneNode {
        let x = -2.0 + 4.0 * phase;
        let half = 0.5;
        let corners = vec![
            Point3::flat(x - half, -2.0 + half),
            Point3::flat(x + half, -2.0 + half),
            Point3::flat(x + half, -2.0 - half),
            Point3::flat(x - half, -2.0 - half),
            Point3::flat(x - half, -2.0 + half),
        ];
        SceneNode::leaf(
            self.slider,
            Drawable::Path(PathShape {
                points: corners,
                fill_color: Color::new(0xfc, 0x62, 0x55),
                fill_opacity: 1.0,
                ..PathShape::default()
            }),
        )
    }

    fn badge(&self) -> SceneNode {
        SceneNode::leaf(
            self.badge,
            Drawable::Image(RasterImage {
                pixels: self.bitmap.clone(),
                width: 1.0,
                height: 1.0,
                top_left: Point3::flat(-3.5, 3.5),
            }),
        )
    }
}

impl SceneSource for OrbitDemo {
    fn scene(&mut self) -> Vec<SceneNode> {
        let phase = self.instant as f64 / self.instants as f64;
        let angle = phase * std::f64::consts::TAU;
        vec![
            SceneNode::group(vec![self.orbit_dot(angle), self.sliding_square(phase)]),
            self.badge(),
        ]
    }

    fn advance(&mut self) -> bool {
        self.instant += 1;
        self.instant < self.instants
    }
}
