use scenecast_capture::{CaptureSession, DocumentRecorder, FrameStreamWriter, SceneSource};
use scenecast_replay::{FrameProtocol, FrameStreamReader, Playback, Reconstructor};
use scenecast_scene_model::{
    CameraState, Color, Document, Drawable, ObjectId, PathShape, PixelBuffer, Point3, PointCloud,
    RasterImage, SceneNode,
};

/// 6x6 model frame on a 600x600 pixel grid at 30 fps.
fn square_camera() -> CameraState {
    CameraState {
        frame_center_x: 0.0,
        frame_center_y: 0.0,
        frame_width: 6.0,
        frame_height: 6.0,
        pixel_width: 600,
        pixel_height: 600,
        frame_rate: 30.0,
        background_color: Color::new(0x1a, 0x1a, 0x1a),
        ..CameraState::default()
    }
}

/// A path sliding right under a fixed bitmap, three instants long.
struct SlidingScene {
    path_id: ObjectId,
    image_id: ObjectId,
    bitmap: PixelBuffer,
    instant: u32,
    instants: u32,
}

impl SlidingScene {
    fn new(path_id: ObjectId, image_id: ObjectId, instants: u32) -> Self {
        Self {
            path_id,
            image_id,
            bitmap: PixelBuffer::solid(1, 2, [10, 20, 30, 255]),
            instant: 0,
            instants,
        }
    }
}

impl SceneSource for SlidingScene {
    fn scene(&mut self) -> Vec<SceneNode> {
        let x = self.instant as f64 * 0.5;
        vec![
            SceneNode::leaf(
                self.path_id,
                Drawable::Path(PathShape {
                    points: vec![Point3::flat(x, 1.0), Point3::flat(x + 1.0, 1.0)],
                    ..PathShape::default()
                }),
            ),
            SceneNode::leaf(
                self.image_id,
                Drawable::Image(RasterImage {
                    pixels: self.bitmap.clone(),
                    width: 2.0,
                    height: 1.0,
                    top_left: Point3::flat(-3.0, 3.0),
                }),
            ),
        ]
    }

    fn advance(&mut self) -> bool {
        self.instant += 1;
        self.instant < self.instants
    }
}

#[test]
fn captured_document_reconstructs_the_original_scene() {
    let mut session = CaptureSession::new(square_camera()).unwrap();
    let path_id = session.register();
    let image_id = session.register();
    let mut recorder = DocumentRecorder::new(session);
    recorder
        .record_all(&mut SlidingScene::new(path_id, image_id, 3))
        .unwrap();
    let document = recorder.finish();

    assert_eq!(document.frame_count(), 3);
    assert!((document.duration_secs() - 0.1).abs() < 1e-9);

    // Through the file format and back.
    let json = document.to_json().unwrap();
    let parsed = Document::from_json(&json).unwrap();
    assert_eq!(parsed, document);

    let mut playback = Playback::new(parsed, FrameProtocol::Replace).unwrap();
    assert_eq!(playback.run_to_end().unwrap(), 3);
    let scene = playback.into_reconstructor();

    assert_eq!(scene.registered_identities(), vec![path_id, image_id]);
    assert_eq!(scene.visible_identities(), &[path_id, image_id]);
    assert!((scene.time() - 2.0 / 30.0).abs() < 1e-9);
    // Background came from the camera: 0x1a / 255.
    assert!((scene.background().r - 26.0 / 255.0).abs() < 1e-9);

    // The path came back at its last model-space position, native width.
    let Some(Drawable::Path(path)) = scene.lookup(path_id) else {
        panic!("expected a path");
    };
    assert!((path.points[0].x - 1.0).abs() < 1e-9);
    assert!((path.points[0].y - 1.0).abs() < 1e-9);
    assert!((path.points[1].x - 2.0).abs() < 1e-9);
    assert!((path.stroke_width - 4.0).abs() < 1e-9);

    // The bitmap survived byte for byte, placement and size intact.
    let Some(Drawable::Image(image)) = scene.lookup(image_id) else {
        panic!("expected an image");
    };
    assert_eq!(image.pixels, PixelBuffer::solid(1, 2, [10, 20, 30, 255]));
    assert!((image.top_left.x + 3.0).abs() < 1e-9);
    assert!((image.top_left.y - 3.0).abs() < 1e-9);
    assert!((image.width - 2.0).abs() < 1e-12);
    assert!((image.height - 1.0).abs() < 1e-12);
}

#[test]
fn live_wire_feed_reconstructs_through_the_reader() {
    let mut session = CaptureSession::new(square_camera()).unwrap();
    let dot_id = session.register();
    let meta = session.viewport_meta();

    let mut wire = Vec::new();
    {
        let mut writer = FrameStreamWriter::new(&mut wire, &meta)
            .unwrap()
            .with_stream_id("demo".into());
        for instant in 0..3 {
            let y = instant as f64;
            let nodes = vec![SceneNode::leaf(
                dot_id,
                Drawable::Points(PointCloud {
                    points: vec![Point3::flat(0.0, y)],
                    color: Color::WHITE,
                    stroke_width: 2.0,
                }),
            )];
            let (_, record) = session.snapshot_next(&nodes).unwrap();
            writer.write_frame(&record).unwrap();
        }
        assert_eq!(writer.frames_written(), 3);
    }

    let mut reader = FrameStreamReader::new(&wire[..]).unwrap();
    assert_eq!(reader.meta().pixel_width, 600);

    let camera = CameraState::for_playback(reader.meta());
    let mut scene = Reconstructor::new(camera, FrameProtocol::Replace).unwrap();
    for frame in &mut reader {
        let frame = frame.unwrap();
        assert_eq!(frame.stream.as_ref().map(|s| s.0.as_str()), Some("demo"));
        scene.apply(&frame.frame).unwrap();
    }

    assert_eq!(scene.frames_applied(), 3);
    assert!((scene.time() - 2.0 / 30.0).abs() < 1e-9);
    assert_eq!(scene.visible_identities(), &[dot_id]);

    let Some(Drawable::Points(cloud)) = scene.lookup(dot_id) else {
        panic!("expected a point cloud");
    };
    assert!((cloud.points[0].y - 2.0).abs() < 1e-9);
    assert!((cloud.stroke_width - 2.0).abs() < 1e-9);
}
