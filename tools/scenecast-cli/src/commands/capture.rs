//! Capture the demo scene into a document file.

use std::path::PathBuf;

use scenecast_capture::{CaptureSession, DocumentRecorder};
use scenecast_common::config::AppConfig;

use crate::demo::OrbitDemo;

pub fn run(
    output: Option<PathBuf>,
    frames: u64,
    fps: Option<f64>,
    pixel_width: Option<u32>,
    pixel_height: Option<u32>,
    frame_height: Option<f64>,
    background: Option<String>,
) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let output = output.unwrap_or_else(|| config.documents_dir.join("scene.json"));
    let camera = super::build_camera(
        &config.capture,
        fps,
        pixel_width,
        pixel_height,
        frame_height,
        background.as_deref(),
    )?;

    println!(
        "Capturing {} frames at {}x{} @ {}fps",
        frames, camera.pixel_width, camera.pixel_height, camera.frame_rate
    );

    let mut session = CaptureSession::new(camera)?;
    let mut demo = OrbitDemo::new(&mut session, frames);
    let mut recorder = DocumentRecorder::new(session);
    recorder.record_all(&mut demo)?;
    let document = recorder.finish();

    document.save(&output)?;

    println!("Document written to {}", output.display());
    println!("  Frames: {}", document.frame_count());
    println!("  Duration: {:.2}s", document.duration_secs());
    println!("  Identities: {}", document.identities().len());

    Ok(())
}
