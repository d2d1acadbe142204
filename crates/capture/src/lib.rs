//! Scenecast Capture
//!
//! Turns live scene graphs into frame records, documents, and live
//! streams:
//!
//! ```text
//!                                  ┌─> DocumentRecorder ─> Document (batch)
//!   SceneSource ─> CaptureSession ─┤
//!    (engine)      (ids + clock)   └─> LiveStream ─> FrameReceiver (live)
//! ```
//!
//! - **snapshot:** flattening a node tree into one frame record
//! - **session:** identity minting and the frozen per-session viewport
//! - **stream:** the single-slot live channel and the wire writer

pub mod session;
pub mod snapshot;
pub mod stream;

pub use session::{CaptureSession, DocumentRecorder};
pub use snapshot::snapshot_scene;
pub use stream::{frame_channel, FrameReceiver, FrameSender, FrameStreamWriter, LiveStream};

use scenecast_scene_model::SceneNode;

/// Contract between the driving animation engine and the capture
/// pipeline.
///
/// The engine owns all timing decisions except the frame interval: the
/// capture side samples `scene()` exactly once per simulated frame, then
/// calls `advance()` to let the engine move its state forward.
pub trait SceneSource {
    /// The scene tree at the current sampled instant.
    fn scene(&mut self) -> Vec<SceneNode>;

    /// Advance to the next sampled instant.
    /// Returns `false` when the animation has finished.
    fn advance(&mut self) -> bool;
}
