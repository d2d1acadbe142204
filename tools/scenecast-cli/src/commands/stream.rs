//! Stream the demo scene as live wire JSON.
//!
//! The wire goes to stdout by default, so all human-facing output here
//! uses stderr.

use std::io::Write;
use std::path::PathBuf;

use scenecast_capture::{
    frame_channel, CaptureSession, FrameReceiver, FrameStreamWriter, LiveStream,
};
use scenecast_common::config::AppConfig;

use crate::demo::OrbitDemo;

pub fn run(
    frames: u64,
    stream_id: Option<String>,
    output: Option<PathBuf>,
    fps: Option<f64>,
    pixel_width: Option<u32>,
    pixel_height: Option<u32>,
    frame_height: Option<f64>,
    background: Option<String>,
) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let camera = super::build_camera(
        &config.capture,
        fps,
        pixel_width,
        pixel_height,
        frame_height,
        background.as_deref(),
    )?;

    let mut session = CaptureSession::new(camera)?;
    let demo = OrbitDemo::new(&mut session, frames);
    let meta = session.viewport_meta();

    let (sender, receiver) = frame_channel();
    let stream = LiveStream::spawn(demo, session, sender)?;

    let delivered = match output {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            let writer = FrameStreamWriter::new(std::io::BufWriter::new(file), &meta)?;
            pump(receiver, writer, stream_id)?
        }
        None => {
            let stdout = std::io::stdout();
            let writer = FrameStreamWriter::new(stdout.lock(), &meta)?;
            pump(receiver, writer, stream_id)?
        }
    };

    let produced = stream.join()?;
    eprintln!("Streamed {delivered} of {produced} captured frames");
    Ok(())
}

fn pump<W: Write>(
    receiver: FrameReceiver,
    writer: FrameStreamWriter<W>,
    stream_id: Option<String>,
) -> anyhow::Result<u64> {
    let mut writer = match stream_id {
        Some(id) => writer.with_stream_id(id.as_str().into()),
        None => writer,
    };
    let mut delivered = 0;
    for frame in receiver {
        writer.write_frame(&frame)?;
        delivered += 1;
    }
    Ok(delivered)
}
