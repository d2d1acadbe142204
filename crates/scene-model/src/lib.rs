//! Scenecast Scene Model
//!
//! Defines the core data contracts for captured animations:
//! - **Camera:** model/pixel coordinate mapping and stroke normalization
//! - **Drawables:** the scene-side shape model handed to the snapshotter
//! - **Records:** the pixel-space JSON wire form of each drawable
//! - **Frames & documents:** frame records keyed by object identity,
//!   documents keyed by frame index
//!
//! Wire geometry is always pixel space; scene geometry is always model
//! space. The camera is the only bridge between the two.

pub mod camera;
pub mod document;
pub mod drawable;
pub mod frame;
pub mod record;
pub mod style;

pub use camera::*;
pub use document::*;
pub use drawable::*;
pub use frame::*;
pub use record::*;
pub use style::*;
