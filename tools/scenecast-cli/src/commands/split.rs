//! Write one document per identity.

use std::path::PathBuf;

use scenecast_layers::split_layers;

pub fn run(path: PathBuf, output: PathBuf, prefix: Option<String>) -> anyhow::Result<()> {
    let document = super::load_document(&path)?;

    let prefix = prefix.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "layer".to_string())
    });

    let layers = split_layers(&document, &prefix)?;
    if layers.is_empty() {
        println!("No identities in {}; nothing to split.", path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&output)?;
    for layer in &layers {
        let target = output.join(layer.file_name());
        layer.document.save(&target)?;
        println!(
            "  {} -> {} ({} frames, {:?})",
            layer.label,
            target.display(),
            layer.document.frame_count(),
            layer.kind
        );
    }

    println!("Wrote {} layer document(s) to {}", layers.len(), output.display());
    Ok(())
}
