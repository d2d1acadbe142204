//! Batch documents: a whole capture as one JSON value.
//!
//! A document ties the frames of one capture session to the viewport they
//! were captured under. The wire encoding is compact JSON with frames
//! keyed by frame index and objects keyed by identity; key order is
//! ascending numeric, which for sequentially captured frames and
//! monotonically minted ids equals insertion order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::frame::{FrameIndex, FrameRecord, ObjectId};

/// Viewport metadata captured once per session and shared by every frame
/// of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMeta {
    /// Frames per second of simulated time.
    pub frame_rate: f64,

    /// Model-space frame dimensions.
    pub frame_width: f64,
    pub frame_height: f64,

    /// Output resolution in pixels.
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// A complete captured animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Viewport the frames were captured under.
    pub meta: ViewportMeta,

    /// Frame records keyed by frame index.
    pub frames: BTreeMap<FrameIndex, FrameRecord>,
}

impl Document {
    /// An empty document for the given viewport.
    pub fn new(meta: ViewportMeta) -> Self {
        Self {
            meta,
            frames: BTreeMap::new(),
        }
    }

    /// Insert (or overwrite) the record for a frame index.
    pub fn insert_frame(&mut self, index: FrameIndex, record: FrameRecord) {
        self.frames.insert(index, record);
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Simulated duration in seconds, counting the last frame's interval.
    pub fn duration_secs(&self) -> f64 {
        match self.frames.keys().next_back() {
            Some(last) => (last + 1) as f64 / self.meta.frame_rate,
            None => 0.0,
        }
    }

    /// Every identity that appears in any frame, ascending.
    pub fn identities(&self) -> Vec<ObjectId> {
        let mut ids = BTreeSet::new();
        for frame in self.frames.values() {
            ids.extend(frame.identities());
        }
        ids.into_iter().collect()
    }

    /// Serialize to the compact wire encoding.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from the wire encoding.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a document file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| DocumentError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| DocumentError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save with the compact wire encoding, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = self.to_json().map_err(|e| DocumentError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| DocumentError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check cross-frame invariants: a sane viewport, and one record
    /// variant per identity for the document's whole lifetime.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let invalid = |message: String| DocumentError::ValidationError { message };

        if !self.meta.frame_rate.is_finite() || self.meta.frame_rate <= 0.0 {
            return Err(invalid(format!(
                "frame_rate must be positive: {}",
                self.meta.frame_rate
            )));
        }
        if self.meta.frame_width <= 0.0 || self.meta.frame_height <= 0.0 {
            return Err(invalid("frame dimensions must be positive".to_string()));
        }
        if self.meta.pixel_width == 0 || self.meta.pixel_height == 0 {
            return Err(invalid("pixel dimensions must be positive".to_string()));
        }

        let mut variants: BTreeMap<ObjectId, &'static str> = BTreeMap::new();
        for (index, frame) in &self.frames {
            for (id, record) in &frame.objects {
                let kind = record.kind();
                match variants.get(id) {
                    None => {
                        variants.insert(*id, kind);
                    }
                    Some(seen) if *seen != kind => {
                        return Err(invalid(format!(
                            "identity {id} changes type from {seen} to {kind} at frame {index}"
                        )));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

/// Errors that can occur when working with documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid document: {message}")]
    ValidationError { message: String },
}
