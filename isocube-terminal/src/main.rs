/// Isocube Terminal Demo - Rotating Isometric Cubes
///
/// Usage: isocube-terminal [preset] [key=value ...]
///
/// Presets: wireframe, cutoff, faces, silhouette, hex-field, stars.
/// Overrides such as `size=60 shape=faces grid=3x5` are applied on top.
/// Controls:
///   - Q/ESC: Quit

use anyhow::Context;
use isocube_core::config::{parse_scene, PRESETS};
use isocube_core::Scene;
use isocube_terminal::TerminalApp;
use log::info;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; redirect it to keep the alternate screen clean
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_scene(&args.join(" "))
        .with_context(|| format!("bad scene arguments (presets: {})", PRESETS.join(", ")))?;
    let title = args
        .first()
        .filter(|first| !first.contains('='))
        .cloned()
        .unwrap_or_else(|| "wireframe".to_string());
    info!("scene config: {:?}", config);

    let scene = Scene::new(config).context("failed to build scene")?;

    println!("Starting isocube terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene, title)?;
    app.run()?;

    Ok(())
}
