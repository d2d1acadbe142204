//! One module per subcommand.

pub mod capture;
pub mod info;
pub mod init;
pub mod replay;
pub mod split;
pub mod stream;

use std::path::Path;

use scenecast_common::config::CaptureDefaults;
use scenecast_common::error::ScenecastError;
use scenecast_scene_model::{CameraState, Color, Document, Projection};

/// Load a document for a subcommand, reporting a missing path as such
/// instead of surfacing the raw I/O error.
pub(crate) fn load_document(path: &Path) -> anyhow::Result<Document> {
    if !path.exists() {
        return Err(ScenecastError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(Document::load(path)?)
}

/// Build the session camera from config defaults and command-line
/// overrides. The model-space frame width always follows the pixel
/// aspect ratio.
pub(crate) fn build_camera(
    defaults: &CaptureDefaults,
    fps: Option<f64>,
    pixel_width: Option<u32>,
    pixel_height: Option<u32>,
    frame_height: Option<f64>,
    background: Option<&str>,
) -> anyhow::Result<CameraState> {
    let pixel_width = pixel_width.unwrap_or(defaults.pixel_width);
    let pixel_height = pixel_height.unwrap_or(defaults.pixel_height);
    if pixel_width == 0 || pixel_height == 0 {
        anyhow::bail!("Pixel dimensions must be positive");
    }
    let frame_height = frame_height.unwrap_or(defaults.frame_height);
    let hex = background.unwrap_or(&defaults.background_color);
    let background_color =
        Color::from_hex(hex).map_err(|e| anyhow::anyhow!("Invalid background color: {e}"))?;

    Ok(CameraState {
        frame_center_x: 0.0,
        frame_center_y: 0.0,
        frame_width: frame_height * pixel_width as f64 / pixel_height as f64,
        frame_height,
        pixel_width,
        pixel_height,
        frame_rate: fps.unwrap_or(defaults.frame_rate),
        background_color,
        background_opacity: 1.0,
        projection: Projection::Flat,
    })
}
