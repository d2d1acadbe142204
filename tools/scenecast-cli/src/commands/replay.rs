//! Reconstruct a document frame by frame.

use std::path::PathBuf;

use scenecast_replay::{FrameProtocol, Playback};

pub fn run(path: PathBuf, persist: bool) -> anyhow::Result<()> {
    let document = super::load_document(&path)?;
    let protocol = if persist {
        FrameProtocol::Persist
    } else {
        FrameProtocol::Replace
    };

    println!(
        "Replaying {} ({} frames, {:.2}s)",
        path.display(),
        document.frame_count(),
        document.duration_secs()
    );

    let mut playback = Playback::new(document, protocol)?;
    while let Some(index) = playback.tick()? {
        let scene = playback.reconstructor();
        println!(
            "  frame {index:>5}  t={:.3}s  visible={}  registered={}",
            scene.time(),
            scene.visible_identities().len(),
            scene.registered_identities().len()
        );
    }

    let scene = playback.into_reconstructor();
    println!(
        "Reconstructed {} frames; {} identities lived in this document.",
        scene.frames_applied(),
        scene.registered_identities().len()
    );

    Ok(())
}
