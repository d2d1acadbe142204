//! Frame-record reconstruction.
//!
//! A [`Reconstructor`] is the receiving end of a capture: it owns a
//! registry of drawables keyed by the identities the producer minted and
//! replays frame records against it, converting wire geometry back into
//! model space. Registry entries are updated in place and never removed,
//! so an identity that leaves the scene and later returns continues its
//! earlier life instead of starting a new one.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use scenecast_common::error::{ScenecastError, ScenecastResult};
use scenecast_scene_model::{
    CameraState, Drawable, DrawableRecord, FrameRecord, ObjectId, PathShape, PathShapeRecord,
    PixelBuffer, PointCloud, PointCloudRecord, RasterImage, RasterImageRecord, Rgba,
};

/// What happens to objects absent from an incoming frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameProtocol {
    /// Each frame carries the complete scene; the visible list is rebuilt
    /// from exactly the frame's identities.
    #[default]
    Replace,
    /// Frames carry deltas; prior objects stay visible until
    /// [`Reconstructor::prune_absent`] removes them.
    Persist,
}

/// Rebuilds a scene from a sequence of frame records.
#[derive(Debug)]
pub struct Reconstructor {
    camera: CameraState,
    protocol: FrameProtocol,
    registry: BTreeMap<ObjectId, Drawable>,
    visible: Vec<ObjectId>,
    frames_applied: u64,
    time: f64,
    background: Rgba,
}

impl Reconstructor {
    /// Start a reconstruction session with a validated camera.
    pub fn new(camera: CameraState, protocol: FrameProtocol) -> ScenecastResult<Self> {
        if !camera.is_flat() {
            return Err(ScenecastError::unsupported(
                "3D camera projections cannot be replayed",
            ));
        }
        let problems = camera.validate();
        if !problems.is_empty() {
            return Err(ScenecastError::replay(format!(
                "Invalid camera: {}",
                problems.join("; ")
            )));
        }

        tracing::info!(
            pixel_width = camera.pixel_width,
            pixel_height = camera.pixel_height,
            protocol = ?protocol,
            "Reconstruction session started"
        );

        Ok(Self {
            background: camera.background_rgba(),
            camera,
            protocol,
            registry: BTreeMap::new(),
            visible: Vec::new(),
            frames_applied: 0,
            time: 0.0,
        })
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn protocol(&self) -> FrameProtocol {
        self.protocol
    }

    /// Simulated time of the last applied frame.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Background of the last applied frame.
    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }

    /// Every identity the session has ever seen, ascending.
    pub fn registered_identities(&self) -> Vec<ObjectId> {
        self.registry.keys().copied().collect()
    }

    /// Identities currently on display, in display order.
    pub fn visible_identities(&self) -> &[ObjectId] {
        &self.visible
    }

    /// The drawable registered under an identity, visible or not.
    pub fn lookup(&self, id: ObjectId) -> Option<&Drawable> {
        self.registry.get(&id)
    }

    /// The rebuilt scene: visible drawables in display order.
    pub fn objects(&self) -> Vec<(ObjectId, &Drawable)> {
        self.visible
            .iter()
            .filter_map(|id| self.registry.get(id).map(|drawable| (*id, drawable)))
            .collect()
    }

    /// Apply one frame record.
    ///
    /// Every object in the record is decoded before any state changes, so
    /// a record that fails (variant mismatch, bad pixel data) leaves the
    /// scene exactly as it was.
    pub fn apply(&mut self, record: &FrameRecord) -> ScenecastResult<()> {
        let mut decoded = Vec::with_capacity(record.objects.len());
        for (&id, object) in &record.objects {
            decoded.push((id, self.decode_object(id, object)?));
        }

        match self.protocol {
            FrameProtocol::Replace => {
                self.visible.clear();
                self.visible.extend(decoded.iter().map(|(id, _)| *id));
            }
            FrameProtocol::Persist => {
                for (id, _) in &decoded {
                    if !self.visible.contains(id) {
                        self.visible.push(*id);
                    }
                }
            }
        }

        for (id, drawable) in decoded {
            match self.registry.get_mut(&id) {
                Some(existing) => *existing = drawable,
                None => {
                    self.registry.insert(id, drawable);
                }
            }
        }

        self.time = record.time;
        self.background = record.background;
        self.frames_applied += 1;
        tracing::debug!(
            time = record.time,
            objects = record.objects.len(),
            "Applied frame record"
        );
        Ok(())
    }

    /// Parse a frame record from JSON text and apply it.
    ///
    /// A record tagged with a stream identity is accepted; the tag is
    /// ignored here. Parse failure mutates nothing.
    pub fn apply_raw(&mut self, json: &str) -> ScenecastResult<()> {
        let record: FrameRecord = serde_json::from_str(json)?;
        self.apply(&record)
    }

    /// Drop from display every identity absent from the given frame.
    /// Registry entries survive; only visibility changes.
    pub fn prune_absent(&mut self, record: &FrameRecord) {
        self.visible.retain(|id| record.objects.contains_key(id));
    }

    fn decode_object(&self, id: ObjectId, record: &DrawableRecord) -> ScenecastResult<Drawable> {
        if let Some(existing) = self.registry.get(&id) {
            if existing.kind() != record.kind() {
                return Err(ScenecastError::replay(format!(
                    "Identity {id} is registered as {} but the frame carries {}",
                    existing.kind(),
                    record.kind()
                )));
            }
        }
        match record {
            DrawableRecord::PathShape(path) => Ok(Drawable::Path(self.decode_path(path))),
            DrawableRecord::RasterImage(image) => Ok(Drawable::Image(self.decode_image(image)?)),
            DrawableRecord::PointCloud(cloud) => Ok(Drawable::Points(self.decode_cloud(cloud))),
        }
    }

    fn decode_path(&self, record: &PathShapeRecord) -> PathShape {
        PathShape {
            points: self.camera.pixel_to_model(&record.points),
            fill_color: record.fill_color,
            fill_opacity: record.fill_opacity,
            stroke_color: record.stroke_color,
            stroke_opacity: record.stroke_opacity,
            stroke_width: self.camera.denormalize_stroke_width(record.stroke_width),
            line_cap: record.line_cap,
            line_join: record.line_join,
            gradient_points: record.gradient_points.map(|[from, to]| {
                [
                    self.camera.point_to_model(from),
                    self.camera.point_to_model(to),
                ]
            }),
            background_stroke_color: record.background_stroke_color,
            background_stroke_width: self
                .camera
                .denormalize_stroke_width(record.background_stroke_width),
        }
    }

    fn decode_image(&self, record: &RasterImageRecord) -> ScenecastResult<RasterImage> {
        let data = BASE64
            .decode(&record.data)
            .map_err(|e| ScenecastError::replay(format!("Invalid base64 pixel data: {e}")))?;
        let pixels = PixelBuffer {
            rows: record.rows,
            cols: record.cols,
            data,
        };
        if !pixels.is_consistent() {
            return Err(ScenecastError::replay(format!(
                "Pixel buffer is {} bytes but {}x{} RGBA needs {}",
                pixels.data.len(),
                record.rows,
                record.cols,
                PixelBuffer::expected_len(record.rows, record.cols)
            )));
        }
        Ok(RasterImage {
            pixels,
            width: record.width,
            height: record.height,
            top_left: self.camera.point_to_model(record.top_left),
        })
    }

    fn decode_cloud(&self, record: &PointCloudRecord) -> PointCloud {
        PointCloud {
            points: self.camera.pixel_to_model(&record.points),
            color: record.color,
            stroke_width: self.camera.denormalize_stroke_width(record.stroke_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecast_scene_model::{Color, LineCap, LineJoin, Point2};

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

    fn path_record_at(points: &[(f64, f64)]) -> DrawableRecord {
        DrawableRecord::PathShape(PathShapeRecord {
            points: points.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
            fill_color: Color::WHITE,
            fill_opacity: 1.0,
            stroke_color: Color::WHITE,
            stroke_opacity: 1.0,
            stroke_width: 4.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            gradient_points: None,
            background_stroke_color: Color::BLACK,
            background_stroke_width: 0.0,
        })
    }

    fn cloud_record() -> DrawableRecord {
        DrawableRecord::PointCloud(PointCloudRecord {
            points: vec![Point2::new(300.0, 300.0)],
            color: Color::WHITE,
            stroke_width: 1.0,
        })
    }

    fn frame_with(time: f64, objects: Vec<(u64, DrawableRecord)>) -> FrameRecord {
        let mut frame = FrameRecord::new(time, Rgba::new(0.0, 0.0, 0.0, 1.0));
        for (id, record) in objects {
            frame.objects.insert(ObjectId(id), record);
        }
        frame
    }

    fn replace_reconstructor() -> Reconstructor {
        Reconstructor::new(square_camera(), FrameProtocol::Replace).unwrap()
    }

    #[test]
    fn test_new_rejects_three_d_camera() {
        let camera = CameraState {
            projection: scenecast_scene_model::Projection::ThreeD,
            ..square_camera()
        };
        let err = Reconstructor::new(camera, FrameProtocol::Replace).unwrap_err();
        assert!(matches!(err, ScenecastError::Unsupported { .. }));
    }

    #[test]
    fn test_apply_registers_and_converts_to_model_space() {
        let mut reconstructor = replace_reconstructor();
        reconstructor
            .apply(&frame_with(0.0, vec![(1, path_record_at(&[(600.0, 0.0)]))]))
            .unwrap();

        let objects = reconstructor.objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].0, ObjectId(1));
        let Drawable::Path(path) = objects[0].1 else {
            panic!("expected a path");
        };
        // Pixel (600, 0) is the top-right corner: model (3, 3).
        assert!((path.points[0].x - 3.0).abs() < 1e-9);
        assert!((path.points[0].y - 3.0).abs() < 1e-9);
        // 600 px / 6 units wide: wire width 4.0 denormalizes to 4.0.
        assert!((path.stroke_width - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_updates_existing_entry_without_reregistering() {
        let mut reconstructor = replace_reconstructor();
        reconstructor
            .apply(&frame_with(0.0, vec![(1, path_record_at(&[(0.0, 0.0)]))]))
            .unwrap();
        reconstructor
            .apply(&frame_with(0.1, vec![(1, path_record_at(&[(300.0, 300.0)]))]))
            .unwrap();

        assert_eq!(reconstructor.registered_identities(), vec![ObjectId(1)]);
        let Some(Drawable::Path(path)) = reconstructor.lookup(ObjectId(1)) else {
            panic!("expected a path");
        };
        // Pixel (300, 300) is the center: model origin.
        assert!(path.points[0].x.abs() < 1e-9);
        assert!(path.points[0].y.abs() < 1e-9);
    }

    #[test]
    fn test_variant_change_is_fatal_and_mutates_nothing() {
        let mut reconstructor = replace_reconstructor();
        reconstructor
            .apply(&frame_with(0.0, vec![(1, path_record_at(&[(600.0, 0.0)]))]))
            .unwrap();

        let err = reconstructor
            .apply(&frame_with(0.1, vec![(1, cloud_record())]))
            .unwrap_err();
        assert!(matches!(err, ScenecastError::Replay { .. }));
        assert!(err.to_string().contains("path_shape"));

        // The failed frame changed nothing.
        assert_eq!(reconstructor.frames_applied(), 1);
        let Some(Drawable::Path(path)) = reconstructor.lookup(ObjectId(1)) else {
            panic!("expected the original path");
        };
        assert!((path.points[0].x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_raw_rejects_unknown_variant_without_mutation() {
        let mut reconstructor = replace_reconstructor();
        let raw = r#"{
            "time": 0.0,
            "background": [0.0, 0.0, 0.0, 1.0],
            "objects": {"1": {"type": "Unknown", "points": []}}
        }"#;
        assert!(reconstructor.apply_raw(raw).is_err());
        assert!(reconstructor.registered_identities().is_empty());
        assert_eq!(reconstructor.frames_applied(), 0);
    }

    #[test]
    fn test_apply_raw_accepts_stream_tagged_records() {
        let mut reconstructor = replace_reconstructor();
        let raw = r#"{"stream":"demo","time":0.5,"background":[0.1,0.2,0.3,1.0],"objects":{}}"#;
        reconstructor.apply_raw(raw).unwrap();
        assert_eq!(reconstructor.frames_applied(), 1);
        assert!((reconstructor.time() - 0.5).abs() < 1e-12);
        assert!((reconstructor.background().b - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_replace_protocol_rebuilds_visibility_each_frame() {
        let mut reconstructor = replace_reconstructor();
        reconstructor
            .apply(&frame_with(
                0.0,
                vec![
                    (1, path_record_at(&[(0.0, 0.0)])),
                    (2, path_record_at(&[(10.0, 10.0)])),
                ],
            ))
            .unwrap();
        reconstructor
            .apply(&frame_with(0.1, vec![(1, path_record_at(&[(5.0, 5.0)]))]))
            .unwrap();

        assert_eq!(reconstructor.visible_identities(), &[ObjectId(1)]);
        // Absent objects stay registered for reappearance.
        assert_eq!(
            reconstructor.registered_identities(),
            vec![ObjectId(1), ObjectId(2)]
        );
        assert!(reconstructor.lookup(ObjectId(2)).is_some());
    }

    #[test]
    fn test_persist_protocol_keeps_absent_objects_until_pruned() {
        let mut reconstructor =
            Reconstructor::new(square_camera(), FrameProtocol::Persist).unwrap();
        reconstructor
            .apply(&frame_with(
                0.0,
                vec![
                    (1, path_record_at(&[(0.0, 0.0)])),
                    (2, path_record_at(&[(10.0, 10.0)])),
                ],
            ))
            .unwrap();
        let second = frame_with(0.1, vec![(1, path_record_at(&[(5.0, 5.0)]))]);
        reconstructor.apply(&second).unwrap();

        assert_eq!(
            reconstructor.visible_identities(),
            &[ObjectId(1), ObjectId(2)]
        );

        reconstructor.prune_absent(&second);
        assert_eq!(reconstructor.visible_identities(), &[ObjectId(1)]);
        assert!(reconstructor.lookup(ObjectId(2)).is_some());
    }

    #[test]
    fn test_image_record_decodes_pixels_and_placement() {
        let mut reconstructor = replace_reconstructor();
        let buffer = PixelBuffer::solid(1, 2, [9, 8, 7, 255]);
        let record = DrawableRecord::RasterImage(RasterImageRecord {
            data: BASE64.encode(&buffer.data),
            rows: 1,
            cols: 2,
            width: 2.0,
            height: 1.0,
            top_left: Point2::new(0.0, 0.0),
        });
        reconstructor
            .apply(&frame_with(0.0, vec![(7, record)]))
            .unwrap();

        let Some(Drawable::Image(image)) = reconstructor.lookup(ObjectId(7)) else {
            panic!("expected an image");
        };
        assert_eq!(image.pixels, buffer);
        assert_eq!(image.width, 2.0);
        assert_eq!(image.height, 1.0);
        // Pixel (0, 0) is the top-left corner: model (-3, 3).
        assert!((image.top_left.x + 3.0).abs() < 1e-9);
        assert!((image.top_left.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_corrupt_pixel_data_is_fatal() {
        let mut reconstructor = replace_reconstructor();
        let not_base64 = DrawableRecord::RasterImage(RasterImageRecord {
            data: "!!not base64!!".to_string(),
            rows: 1,
            cols: 1,
            width: 1.0,
            height: 1.0,
            top_left: Point2::new(0.0, 0.0),
        });
        let err = reconstructor
            .apply(&frame_with(0.0, vec![(1, not_base64)]))
            .unwrap_err();
        assert!(matches!(err, ScenecastError::Replay { .. }));

        let short_buffer = DrawableRecord::RasterImage(RasterImageRecord {
            data: BASE64.encode([0u8, 1, 2]),
            rows: 1,
            cols: 1,
            width: 1.0,
            height: 1.0,
            top_left: Point2::new(0.0, 0.0),
        });
        let err = reconstructor
            .apply(&frame_with(0.0, vec![(1, short_buffer)]))
            .unwrap_err();
        assert!(err.to_string().contains("3 bytes"));
        assert!(reconstructor.registered_identities().is_empty());
    }

    #[test]
    fn test_time_and_background_track_the_last_frame() {
        let mut reconstructor = replace_reconstructor();
        reconstructor
            .apply(&FrameRecord::new(1.25, Rgba::new(1.0, 0.5, 0.25, 1.0)))
            .unwrap();
        assert!((reconstructor.time() - 1.25).abs() < 1e-12);
        assert!((reconstructor.background().g - 0.5).abs() < 1e-12);
        assert_eq!(reconstructor.frames_applied(), 1);
    }
}
