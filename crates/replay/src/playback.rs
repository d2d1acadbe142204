//! Frame sources for reconstruction.
//!
//! [`Playback`] drives a loaded document through a reconstructor one
//! stored frame per tick, in ascending frame order. Gaps in the stored
//! indices compress: frames 0, 5, 9 play on three consecutive ticks.
//! [`FrameStreamReader`] binds to a live wire feed instead, yielding
//! frames as they arrive.

use std::collections::VecDeque;
use std::io::Read;

use serde::Deserialize;

use scenecast_common::error::{ScenecastError, ScenecastResult};
use scenecast_scene_model::{
    CameraState, Document, FrameIndex, FrameRecord, StreamFrame, ViewportMeta,
};

use crate::reconstruct::{FrameProtocol, Reconstructor};

/// Replays a document's stored frames in order.
pub struct Playback {
    reconstructor: Reconstructor,
    frames: VecDeque<(FrameIndex, FrameRecord)>,
}

impl Playback {
    /// Replay under the camera the document was captured with.
    pub fn new(document: Document, protocol: FrameProtocol) -> ScenecastResult<Self> {
        let camera = CameraState::for_playback(&document.meta);
        Self::with_camera(document, camera, protocol)
    }

    /// Replay under an overriding camera, e.g. a different resolution.
    pub fn with_camera(
        document: Document,
        camera: CameraState,
        protocol: FrameProtocol,
    ) -> ScenecastResult<Self> {
        let reconstructor = Reconstructor::new(camera, protocol)?;
        let frames: VecDeque<(FrameIndex, FrameRecord)> = document.frames.into_iter().collect();
        tracing::info!(frames = frames.len(), "Playback ready");
        Ok(Self {
            reconstructor,
            frames,
        })
    }

    /// Apply the next stored frame.
    /// Returns its original index, or `None` when the document is spent.
    pub fn tick(&mut self) -> ScenecastResult<Option<FrameIndex>> {
        match self.frames.pop_front() {
            Some((index, record)) => {
                self.reconstructor.apply(&record)?;
                Ok(Some(index))
            }
            None => Ok(None),
        }
    }

    /// Tick until the document is spent; returns the frame count applied.
    pub fn run_to_end(&mut self) -> ScenecastResult<u64> {
        let mut applied = 0;
        while self.tick()?.is_some() {
            applied += 1;
        }
        Ok(applied)
    }

    /// Stored frames not yet applied.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn reconstructor(&self) -> &Reconstructor {
        &self.reconstructor
    }

    /// Give up the playback and keep the rebuilt scene.
    pub fn into_reconstructor(self) -> Reconstructor {
        self.reconstructor
    }
}

/// Reads the live wire format: one viewport-meta object, then frame
/// records as concatenated JSON objects until the feed ends.
pub struct FrameStreamReader<R: Read> {
    meta: ViewportMeta,
    frames: serde_json::StreamDeserializer<'static, serde_json::de::IoRead<R>, StreamFrame>,
}

impl<R: Read> FrameStreamReader<R> {
    /// Bind to a feed by reading the leading viewport meta.
    pub fn new(reader: R) -> ScenecastResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_reader(reader);
        let meta = ViewportMeta::deserialize(&mut deserializer)
            .map_err(|e| ScenecastError::stream(format!("Invalid viewport meta: {e}")))?;
        Ok(Self {
            meta,
            frames: deserializer.into_iter(),
        })
    }

    /// The viewport the producer captured under.
    pub fn meta(&self) -> &ViewportMeta {
        &self.meta
    }

    /// The next frame on the feed, or `None` at end of stream.
    pub fn next_frame(&mut self) -> Option<ScenecastResult<StreamFrame>> {
        self.frames
            .next()
            .map(|result| result.map_err(ScenecastError::from))
    }
}

impl<R: Read> std::fmt::Debug for FrameStreamReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStreamReader")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl<R: Read> Iterator for FrameStreamReader<R> {
    type Item = ScenecastResult<StreamFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame()
    }
}
