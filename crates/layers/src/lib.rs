//! Layer extraction.
//!
//! Splits a captured document into one document per identity, so a
//! compositor can re-animate or restyle each object on its own.

pub mod split;

pub use split::{extract_layer, split_layers, LayerExport, LayerKind};
