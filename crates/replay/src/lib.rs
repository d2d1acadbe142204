//! Scene reconstruction.
//!
//! The decode side of the pipeline: frame records come in from a document
//! or a live wire feed, and a [`Reconstructor`] rebuilds the drawables
//! they describe, keyed by the identities the capture session minted.
//!
//! ```text
//! Document ──> Playback ─────┐
//!                            ├──> Reconstructor ──> (ObjectId, Drawable)*
//! wire ──> FrameStreamReader ┘
//! ```
//!
//! The reconstructor's registry persists across frames, so an identity
//! that leaves the scene and returns picks up its earlier drawable.

pub mod playback;
pub mod reconstruct;

pub use playback::{FrameStreamReader, Playback};
pub use reconstruct::{FrameProtocol, Reconstructor};
