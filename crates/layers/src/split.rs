//! Per-identity document splitting.
//!
//! A layer is the life of one identity: every frame it appears in, with
//! every other identity removed and the original frame indices kept. A
//! frame where the identity is absent contributes nothing to its layer,
//! so a layer document can be sparser than its source.

use scenecast_common::error::{ScenecastError, ScenecastResult};
use scenecast_scene_model::{Document, FrameRecord, ObjectId};

/// How a layer behaves over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Present in exactly one frame.
    Still,
    /// Present in more than one frame.
    Motion,
}

/// One identity's slice of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerExport {
    pub id: ObjectId,
    /// Export label, `{prefix}_{id}`.
    pub label: String,
    pub kind: LayerKind,
    pub document: Document,
}

impl LayerExport {
    /// File name the layer saves under.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.label)
    }
}

/// Extract the layer of a single identity.
///
/// Fatal when the identity appears in no frame; an empty layer has
/// nothing to export.
pub fn extract_layer(
    source: &Document,
    id: ObjectId,
    prefix: &str,
) -> ScenecastResult<LayerExport> {
    let mut document = Document::new(source.meta);
    for (&index, frame) in &source.frames {
        if let Some(record) = frame.objects.get(&id) {
            let mut kept = FrameRecord::new(frame.time, frame.background);
            kept.objects.insert(id, record.clone());
            document.insert_frame(index, kept);
        }
    }

    if document.frames.is_empty() {
        return Err(ScenecastError::export(format!(
            "Identity {id} appears in no frame of the document"
        )));
    }

    let kind = if document.frame_count() == 1 {
        LayerKind::Still
    } else {
        LayerKind::Motion
    };
    Ok(LayerExport {
        id,
        label: format!("{prefix}_{id}"),
        kind,
        document,
    })
}

/// Split a document into one layer per identity it ever recorded,
/// ascending by identity.
pub fn split_layers(source: &Document, prefix: &str) -> ScenecastResult<Vec<LayerExport>> {
    let identities = source.identities();
    let mut layers = Vec::with_capacity(identities.len());
    for id in identities {
        layers.push(extract_layer(source, id, prefix)?);
    }
    tracing::info!(layers = layers.len(), "Split document into layers");
    Ok(layers)
}
