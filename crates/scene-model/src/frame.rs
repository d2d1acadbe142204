//! Frame records and identity types.
//!
//! A frame record is everything captured at one sampled instant: the
//! simulated timestamp, the background fill, and the visible objects keyed
//! by identity. On the live wire a frame may additionally carry the
//! identity of the stream that produced it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::DrawableRecord;
use crate::style::Rgba;

/// Frame number within a capture, used as the document key.
pub type FrameIndex = u64;

/// Session-scoped identity of a captured object.
///
/// Minted monotonically by a capture session. Serialized as the decimal
/// string key of the frame's `objects` map, so the key text survives a
/// round-trip unchanged; ids are never renumbered on load. The string
/// form (rather than a bare integer) also keeps the map deserializable
/// inside `#[serde(flatten)]` contexts like [`StreamFrame`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(into = "String", try_from = "String")]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> String {
        id.0.to_string()
    }
}

impl TryFrom<String> for ObjectId {
    type Error = std::num::ParseIntError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map(ObjectId)
    }
}

/// Identity of a live stream, tagged onto wire frames when several
/// producers share one consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(pub String);

impl From<&str> for StreamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything captured at one sampled instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Simulated seconds since capture start.
    pub time: f64,

    /// Background fill for the whole frame.
    pub background: Rgba,

    /// Visible objects, keyed by identity.
    pub objects: BTreeMap<ObjectId, DrawableRecord>,
}

impl FrameRecord {
    /// An empty frame at the given instant.
    pub fn new(time: f64, background: Rgba) -> Self {
        Self {
            time,
            background,
            objects: BTreeMap::new(),
        }
    }

    /// Identities visible in this frame, ascending.
    pub fn identities(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// A frame record on the live wire, optionally tagged with its stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFrame {
    /// Producing stream, present when multiplexing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamId>,

    /// The frame itself.
    #[serde(flatten)]
    pub frame: FrameRecord,
}
