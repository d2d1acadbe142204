//! Live frame delivery.
//!
//! A live stream hands each captured frame to one consumer through a
//! single-slot channel: the producer replaces any unread frame (latest
//! wins, never more than one in flight) and paces itself to the frame
//! interval, so a slow consumer skips frames instead of stalling the
//! producer. Either side may close the channel; dropping an endpoint
//! closes it too.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use scenecast_common::clock::FramePacer;
use scenecast_common::error::{ScenecastError, ScenecastResult};
use scenecast_scene_model::{FrameRecord, StreamId, ViewportMeta};

use crate::session::CaptureSession;
use crate::SceneSource;

struct Slot {
    state: Mutex<SlotState>,
    available: Condvar,
}

struct SlotState {
    pending: Option<FrameRecord>,
    open: bool,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn close(&self) {
        let mut state = self.lock();
        state.open = false;
        self.available.notify_all();
    }
}

/// Create a connected single-slot sender/receiver pair.
pub fn frame_channel() -> (FrameSender, FrameReceiver) {
    let slot = Arc::new(Slot {
        state: Mutex::new(SlotState {
            pending: None,
            open: true,
        }),
        available: Condvar::new(),
    });
    (
        FrameSender { slot: slot.clone() },
        FrameReceiver { slot },
    )
}

/// Producer half of the single-slot channel.
pub struct FrameSender {
    slot: Arc<Slot>,
}

impl FrameSender {
    /// Publish a frame, replacing any unread one.
    /// Returns `false` once the channel is closed.
    pub fn send(&self, frame: FrameRecord) -> bool {
        let mut state = self.slot.lock();
        if !state.open {
            return false;
        }
        if state.pending.is_some() {
            tracing::trace!("Consumer behind; replacing pending frame");
        }
        state.pending = Some(frame);
        self.slot.available.notify_one();
        true
    }

    /// Whether the consumer is still attached.
    pub fn is_open(&self) -> bool {
        self.slot.lock().open
    }

    /// Close the channel. A pending frame stays readable.
    pub fn close(&self) {
        self.slot.close();
    }
}

impl Drop for FrameSender {
    fn drop(&mut self) {
        self.slot.close();
    }
}

/// Consumer half of the single-slot channel.
///
/// Iterating yields frames until the stream closes.
pub struct FrameReceiver {
    slot: Arc<Slot>,
}

impl FrameReceiver {
    /// Block until a frame is pending or the stream closes.
    /// After close, drains the pending frame before returning `None`.
    pub fn recv(&self) -> Option<FrameRecord> {
        let mut state = self.slot.lock();
        loop {
            if let Some(frame) = state.pending.take() {
                return Some(frame);
            }
            if !state.open {
                return None;
            }
            state = self
                .slot
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Take the pending frame without blocking.
    pub fn try_recv(&self) -> Option<FrameRecord> {
        self.slot.lock().pending.take()
    }

    /// Close the channel; the producer's next send observes it.
    pub fn close(&self) {
        self.slot.close();
    }
}

impl Iterator for FrameReceiver {
    type Item = FrameRecord;

    fn next(&mut self) -> Option<FrameRecord> {
        self.recv()
    }
}

impl Drop for FrameReceiver {
    fn drop(&mut self) {
        self.slot.close();
    }
}

/// Handle to a live capture driver thread.
///
/// The driver samples its source once per frame interval and publishes
/// each snapshot to the channel. It checks liveness before capturing and
/// again after the pacing sleep, so it terminates within one frame
/// interval of a stop request or of the consumer going away.
pub struct LiveStream {
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<ScenecastResult<u64>>>,
}

impl LiveStream {
    /// Spawn the driving thread for a source and session.
    pub fn spawn<S>(
        mut source: S,
        mut session: CaptureSession,
        sender: FrameSender,
    ) -> ScenecastResult<Self>
    where
        S: SceneSource + Send + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop = stop_flag.clone();
        let handle = std::thread::Builder::new()
            .name("scenecast-live".to_string())
            .spawn(move || -> ScenecastResult<u64> {
                let mut pacer = FramePacer::new(session.camera().frame_rate);
                let mut produced = 0u64;
                loop {
                    if stop.load(Ordering::Relaxed) || !sender.is_open() {
                        break;
                    }
                    let nodes = source.scene();
                    let (_, record) = session.snapshot_next(&nodes)?;
                    if !sender.send(record) {
                        break;
                    }
                    produced += 1;
                    if !source.advance() {
                        break;
                    }
                    pacer.pace();
                }
                sender.close();
                tracing::info!(frames = produced, "Live stream finished");
                Ok(produced)
            })
            .map_err(|e| ScenecastError::stream(format!("Failed to spawn driver thread: {e}")))?;

        Ok(Self {
            stop_flag,
            handle: Some(handle),
        })
    }

    /// Request stop, then join the driver and return its frame count.
    pub fn stop(mut self) -> ScenecastResult<u64> {
        self.stop_flag.store(true, Ordering::SeqCst);
        self.join_inner()
    }

    /// Wait for the source to finish on its own.
    pub fn join(mut self) -> ScenecastResult<u64> {
        self.join_inner()
    }

    /// Stop flag shared with the driver thread.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    fn join_inner(&mut self) -> ScenecastResult<u64> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ScenecastError::stream("Live driver thread panicked"))?,
            None => Err(ScenecastError::stream("Live stream already joined")),
        }
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}

/// Encodes the live wire format: one viewport-meta object, then frame
/// records as concatenated compact JSON objects, no delimiters between
/// them.
pub struct FrameStreamWriter<W: Write> {
    writer: W,
    stream_id: Option<StreamId>,
    frames_written: u64,
}

#[derive(serde::Serialize)]
struct WireFrame<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<&'a StreamId>,
    #[serde(flatten)]
    frame: &'a FrameRecord,
}

impl<W: Write> FrameStreamWriter<W> {
    /// Start a stream by writing the viewport meta.
    pub fn new(mut writer: W, meta: &ViewportMeta) -> ScenecastResult<Self> {
        let header = serde_json::to_string(meta)?;
        writer.write_all(header.as_bytes())?;
        Ok(Self {
            writer,
            stream_id: None,
            frames_written: 0,
        })
    }

    /// Tag every subsequent frame with the producing stream's identity.
    pub fn with_stream_id(mut self, id: StreamId) -> Self {
        self.stream_id = Some(id);
        self
    }

    /// Append one frame record and flush it through.
    /// Live consumers read frame by frame; buffering a frame back would
    /// hold the newest state away from them.
    pub fn write_frame(&mut self, record: &FrameRecord) -> ScenecastResult<()> {
        let wire = WireFrame {
            stream: self.stream_id.as_ref(),
            frame: record,
        };
        let json = serde_json::to_string(&wire)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.flush()?;
        self.frames_written += 1;
        Ok(())
    }

    /// Frames written so far (the leading meta object not counted).
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl<W: Write> Drop for FrameStreamWriter<W> {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
