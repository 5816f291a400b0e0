/// Hyperview Terminal Demo - Orbiting Cube
///
/// Renders the demo scene with a camera orbiting the cube.
/// Controls:
///   - WASD / Arrow Keys: Pan the camera
///   - +/-: Move closer / further
///   - Space: Pause the orbit
///   - Q/ESC: Quit
///
/// Settings are read from `hyperview.toml` in the working directory when
/// present. Logging goes to stderr and is controlled with `RUST_LOG`.
use std::io;
use std::path::Path;

use hyperview_core::RenderConfig;
use hyperview_terminal::{demo_world, TerminalApp};

const CONFIG_PATH: &str = "hyperview.toml";

fn load_config() -> RenderConfig {
    if !Path::new(CONFIG_PATH).exists() {
        return RenderConfig::default();
    }
    RenderConfig::load_from_file(CONFIG_PATH).unwrap_or_else(|e| {
        log::warn!("Failed to load {}: {}. Using defaults.", CONFIG_PATH, e);
        RenderConfig::default()
    })
}

fn main() -> io::Result<()> {
    env_logger::init();

    let config = load_config();
    let world = demo_world(&config.transform())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let mut app = TerminalApp::new(world, config)?;
    app.run()?;

    Ok(())
}
