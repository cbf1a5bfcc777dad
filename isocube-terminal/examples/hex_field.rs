/// Example: a hex field of cube outlines in the terminal
///
/// Usage: cargo run --example hex_field -- [key=value ...]

use anyhow::Context;
use isocube_core::{Scene, SceneConfig};
use isocube_terminal::TerminalApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let overrides: Vec<String> = std::env::args().skip(1).collect();
    let config = SceneConfig::preset("hex-field")?
        .with_overrides(&overrides.join(" "))
        .context("failed to parse overrides")?;

    println!(
        "Rendering a {} field (press Q to quit)...",
        config
            .tiling
            .as_ref()
            .map(|t| format!("{}x{}", t.rows, t.cols))
            .unwrap_or_else(|| "single-cube".to_string())
    );
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(Scene::new(config)?, "hex-field")?;
    app.run()
}
