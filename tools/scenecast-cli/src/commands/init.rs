//! Write the default configuration file.

use scenecast_common::config::{config_file_path, AppConfig};

pub fn run(force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if path.exists() && !force {
        println!("Configuration already exists at {}", path.display());
        println!("Pass --force to overwrite it with the defaults.");
        return Ok(());
    }

    let config = AppConfig::default();
    config.save()?;
    std::fs::create_dir_all(&config.documents_dir)?;

    println!("Configuration written to {}", path.display());
    println!("  Documents: {}", config.documents_dir.display());
    println!(
        "  Capture defaults: {}x{} @ {}fps",
        config.capture.pixel_width, config.capture.pixel_height, config.capture.frame_rate
    );
    println!("  Log level: {}", config.logging.level);
    Ok(())
}
