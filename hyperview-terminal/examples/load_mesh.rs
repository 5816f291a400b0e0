/// Example: Load and render an STL file in the terminal
///
/// Usage: cargo run --example load_mesh -- path/to/file.stl
///
/// The mesh is placed so that it sits in front of the camera, scaled to
/// fit a unit box.
use std::env;
use std::io;

use hyperview_core::{stl, Mesh, Object, RenderConfig, Transform, World};
use hyperview_terminal::{demo_world, TerminalApp};

fn invalid<E: Into<Box<dyn std::error::Error + Send + Sync>>>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Fit the mesh into the unit cube, then push it away from the camera
fn place(mesh: &mut Mesh, t: &Transform) -> Result<(), hyperview_core::GeometryError> {
    if mesh.vertex_count() == 0 {
        return Ok(());
    }
    let min: Vec<f64> = mesh.vertices.row_iter().map(|r| r.min()).collect();
    let max: Vec<f64> = mesh.vertices.row_iter().map(|r| r.max()).collect();
    let extent = min
        .iter()
        .zip(&max)
        .map(|(lo, hi)| hi - lo)
        .fold(f64::EPSILON, f64::max);

    let back: Vec<f64> = min.iter().map(|v| -v).collect();
    mesh.transform(&t.translation(&back)?)?;
    mesh.transform(&t.scaling(&vec![1.0 / extent; t.dimensions()])?)?;
    mesh.transform(&t.translation(&[0.0, 0.0, 2.0])?)?;
    Ok(())
}

fn main() -> io::Result<()> {
    env_logger::init();

    let config = RenderConfig::default();
    let t = config.transform();
    let args: Vec<String> = env::args().collect();

    let world = match args.get(1) {
        Some(path) => {
            println!("Loading STL file: {}", path);
            let mut mesh = stl::load_from_file(path).map_err(invalid)?;
            place(&mut mesh, &t).map_err(invalid)?;
            println!("Loaded {} triangles", mesh.triangle_count());
            World::new(vec![Object::sun(t.identity(), mesh).map_err(invalid)?])
        }
        None => {
            eprintln!("Usage: {} <stl-file>", args[0]);
            eprintln!("\nNo STL file provided, using default cube...");
            demo_world(&t).map_err(invalid)?
        }
    };

    let mut app = TerminalApp::new(world, config)?;
    app.run()
}
