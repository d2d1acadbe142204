//! Capture sessions and batch recording.

use scenecast_common::clock::FrameClock;
use scenecast_common::error::{ScenecastError, ScenecastResult};
use scenecast_scene_model::{
    CameraState, Document, FrameIndex, FrameRecord, ObjectId, SceneNode, ViewportMeta,
};

use crate::snapshot::snapshot_scene;
use crate::SceneSource;

/// A capture session.
///
/// Owns the camera (frozen for the session lifetime), mints object
/// identities, and stamps each snapshot with simulated time. Accumulation
/// is left to the drivers: [`DocumentRecorder`] for batch documents,
/// [`LiveStream`](crate::stream::LiveStream) for live delivery.
#[derive(Debug)]
pub struct CaptureSession {
    camera: CameraState,
    clock: FrameClock,
    next_id: u64,
}

impl CaptureSession {
    /// Create a session for the given camera.
    ///
    /// Fails fast on 3D projections and on degenerate viewports; nothing
    /// may be captured under a camera that cannot be replayed.
    pub fn new(camera: CameraState) -> ScenecastResult<Self> {
        if !camera.is_flat() {
            return Err(ScenecastError::unsupported(
                "3D camera projections cannot be captured",
            ));
        }
        let problems = camera.validate();
        if !problems.is_empty() {
            return Err(ScenecastError::capture(format!(
                "Invalid camera: {}",
                problems.join("; ")
            )));
        }

        let clock = FrameClock::start(camera.frame_rate);
        tracing::info!(
            epoch_wall = %clock.epoch_wall(),
            pixel_width = camera.pixel_width,
            pixel_height = camera.pixel_height,
            frame_rate = camera.frame_rate,
            "Capture session started"
        );
        Ok(Self {
            camera,
            clock,
            next_id: 1,
        })
    }

    /// The session camera.
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Viewport metadata recorded once per document or stream.
    pub fn viewport_meta(&self) -> ViewportMeta {
        self.camera.viewport_meta()
    }

    /// Mint the identity for a newly created drawable.
    ///
    /// Ids start at 1 and are never reused within a session.
    pub fn register(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Frames captured so far.
    pub fn frames_captured(&self) -> u64 {
        self.clock.frame()
    }

    /// Snapshot the scene at the current instant and advance the clock.
    pub fn snapshot_next(
        &mut self,
        nodes: &[SceneNode],
    ) -> ScenecastResult<(FrameIndex, FrameRecord)> {
        let record = snapshot_scene(nodes, &self.camera, self.clock.time())?;
        let index = self.clock.tick();
        tracing::debug!(index, objects = record.objects.len(), "Captured frame");
        Ok((index, record))
    }
}

/// Batch driver: accumulates session snapshots into a [`Document`].
pub struct DocumentRecorder {
    session: CaptureSession,
    document: Document,
}

impl DocumentRecorder {
    pub fn new(session: CaptureSession) -> Self {
        let document = Document::new(session.viewport_meta());
        Self { session, document }
    }

    /// The underlying session, for identity minting.
    pub fn session_mut(&mut self) -> &mut CaptureSession {
        &mut self.session
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// The document accumulated so far.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Capture the scene as the next frame.
    pub fn record_frame(&mut self, nodes: &[SceneNode]) -> ScenecastResult<FrameIndex> {
        let (index, record) = self.session.snapshot_next(nodes)?;
        self.document.insert_frame(index, record);
        Ok(index)
    }

    /// Drive a source to completion, one frame per sampled instant.
    pub fn record_all(&mut self, source: &mut dyn SceneSource) -> ScenecastResult<u64> {
        let mut recorded = 0u64;
        loop {
            let nodes = source.scene();
            self.record_frame(&nodes)?;
            recorded += 1;
            if !source.advance() {
                break;
            }
        }
        tracing::info!(frames = recorded, "Recording finished");
        Ok(recorded)
    }

    /// Finish recording and hand back the document.
    pub fn finish(self) -> Document {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecast_scene_model::{Drawable, PathShape, Point3, Projection};

    fn test_camera() -> CameraState {
        CameraState {
            frame_width: 6.0,
            frame_height: 6.0,
            pixel_width: 600,
            pixel_height: 600,
            frame_rate: 30.0,
            ..CameraState::default()
        }
    }

    fn dot(x: f64, y: f64) -> Drawable {
        Drawable::Path(PathShape {
            points: vec![Point3::flat(x, y)],
            ..PathShape::default()
        })
    }

    /// A source that moves one shape right by one unit per instant.
    struct Slide {
        id: ObjectId,
        x: f64,
        remaining: u32,
    }

    impl Slide {
        fn new(session: &mut CaptureSession, instants: u32) -> Self {
            Self {
                id: session.register(),
                x: 0.0,
                remaining: instants,
            }
        }
    }

    impl SceneSource for Slide {
        fn scene(&mut self) -> Vec<SceneNode> {
            vec![SceneNode::leaf(self.id, dot(self.x, 0.0))]
        }

        fn advance(&mut self) -> bool {
            self.x += 1.0;
            self.remaining -= 1;
            self.remaining > 0
        }
    }

    #[test]
    fn test_register_mints_monotonic_ids() {
        let mut session = CaptureSession::new(test_camera()).unwrap();
        assert_eq!(session.register(), ObjectId(1));
        assert_eq!(session.register(), ObjectId(2));
        assert_eq!(session.register(), ObjectId(3));
    }

    #[test]
    fn test_new_rejects_3d_projection() {
        let camera = CameraState {
            projection: Projection::ThreeD,
            ..test_camera()
        };
        let err = CaptureSession::new(camera).unwrap_err();
        assert!(matches!(err, ScenecastError::Unsupported { .. }));
    }

    #[test]
    fn test_new_rejects_degenerate_camera() {
        let camera = CameraState {
            frame_rate: 0.0,
            ..test_camera()
        };
        let err = CaptureSession::new(camera).unwrap_err();
        assert!(err.to_string().contains("frame_rate"));
    }

    #[test]
    fn test_snapshot_next_advances_simulated_time() {
        let mut session = CaptureSession::new(test_camera()).unwrap();
        let id = session.register();
        let nodes = vec![SceneNode::leaf(id, dot(0.0, 0.0))];

        let (first, record) = session.snapshot_next(&nodes).unwrap();
        assert_eq!(first, 0);
        assert_eq!(record.time, 0.0);

        let (second, record) = session.snapshot_next(&nodes).unwrap();
        assert_eq!(second, 1);
        assert!((record.time - 1.0 / 30.0).abs() < 1e-12);
        assert_eq!(session.frames_captured(), 2);
    }

    #[test]
    fn test_recorder_accumulates_sequential_frames() {
        let mut session = CaptureSession::new(test_camera()).unwrap();
        let mut source = Slide::new(&mut session, 3);
        let mut recorder = DocumentRecorder::new(session);

        let recorded = recorder.record_all(&mut source).unwrap();
        assert_eq!(recorded, 3);

        let doc = recorder.finish();
        assert_eq!(doc.frame_count(), 3);
        let indices: Vec<u64> = doc.frames.keys().copied().collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(doc.meta.frame_rate, 30.0);
        assert_eq!(doc.identities(), vec![ObjectId(1)]);
    }

    #[test]
    fn test_unchanged_object_keeps_identity_and_data_across_frames() {
        let mut session = CaptureSession::new(test_camera()).unwrap();
        let id = session.register();
        let mut recorder = DocumentRecorder::new(session);

        let nodes = vec![SceneNode::leaf(id, dot(1.0, 1.0))];
        recorder.record_frame(&nodes).unwrap();
        recorder.record_frame(&nodes).unwrap();

        let doc = recorder.finish();
        assert_eq!(doc.frames[&0].objects, doc.frames[&1].objects);
        assert!(doc.frames[&0].objects.contains_key(&id));
    }
}
