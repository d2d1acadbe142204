//! Show document information.

use std::collections::BTreeMap;
use std::path::PathBuf;

use scenecast_scene_model::ObjectId;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let document = super::load_document(&path)?;
    let meta = &document.meta;

    println!("Document: {}", path.display());
    println!(
        "  Viewport: {}x{} px ({}x{} model units)",
        meta.pixel_width, meta.pixel_height, meta.frame_width, meta.frame_height
    );
    println!("  Frame rate: {} fps", meta.frame_rate);
    println!(
        "  Frames: {} ({:.2}s)",
        document.frame_count(),
        document.duration_secs()
    );
    println!();

    let mut lives: BTreeMap<ObjectId, (&'static str, usize)> = BTreeMap::new();
    for frame in document.frames.values() {
        for (id, record) in &frame.objects {
            lives.entry(*id).or_insert((record.kind(), 0)).1 += 1;
        }
    }

    println!("Objects: {}", lives.len());
    for (id, (kind, frames)) in &lives {
        println!("  {id}: {kind}, present in {frames} frame(s)");
    }

    match document.validate() {
        Ok(()) => println!("\nDocument is valid."),
        Err(e) => println!("\nValidation issue: {e}"),
    }

    Ok(())
}
