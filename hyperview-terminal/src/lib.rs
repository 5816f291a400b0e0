/// Terminal front end for the hyperview renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use hyperview_core::{
    cube, project, Camera, GeometryError, Matrix, Object, RenderConfig, Transform, World,
};
use log::{debug, info};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Camera movement per key press
const PAN_STEP: f64 = 0.05;

/// The classic demo scene: one small cube floating in front of the camera
pub fn demo_world(transform: &Transform) -> Result<World, GeometryError> {
    let dimensions = transform.dimensions();
    let mut mesh = cube::generate(dimensions)?;

    let mut offset = vec![0.1; dimensions];
    if let Some(depth) = offset.last_mut() {
        *depth = 4.6;
    }
    mesh.transform(&transform.translation(&offset)?)?;
    mesh.transform(&transform.scaling(&vec![0.1; dimensions])?)?;

    Ok(World::new(vec![Object::sun(transform.identity(), mesh)?]))
}

fn invalid_input(err: GeometryError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    world: World,
    config: RenderConfig,
    camera: Camera,
    projection: Matrix,
    renderer: AsciiRenderer,
    tick: Duration,
    running: bool,
    paused: bool,
    ticks: u64,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(world: World, config: RenderConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(world, config, width as usize, height as usize)
    }

    /// Build the app for a screen of a given size without touching the terminal
    pub fn with_size(
        world: World,
        config: RenderConfig,
        width: usize,
        height: usize,
    ) -> io::Result<Self> {
        if config.dimensions != 3 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "the terminal renders 3D worlds only, got {} dimensions",
                    config.dimensions
                ),
            ));
        }
        let camera = config.build_camera().map_err(invalid_input)?;
        let tick = config
            .window
            .tick()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let mut app = Self {
            world,
            camera,
            projection: config.transform().identity(),
            renderer: AsciiRenderer::new(width, height),
            tick,
            running: true,
            paused: false,
            ticks: 0,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            config,
        };
        app.resize(width, height)?;
        Ok(app)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    fn resize(&mut self, width: usize, height: usize) -> io::Result<()> {
        self.renderer = AsciiRenderer::new(width, height);
        self.projection = self
            .config
            .build_viewport(width as f64, height as f64)
            .projection_matrix(&self.config.transform())
            .map_err(invalid_input)?;
        debug!("viewport resized to {}x{}", width, height);
        Ok(())
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        info!("running at {:.0} ticks per second", self.config.window.tick_hz);
        let mut previous = Instant::now();
        let mut lag = Duration::ZERO;

        while self.running {
            let frame_start = Instant::now();
            lag += frame_start - previous;
            previous = frame_start;

            // Handle input
            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?)?;
            }

            // Fixed-interval updates
            while lag >= self.tick {
                self.update();
                lag -= self.tick;
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.tick {
                std::thread::sleep(self.tick - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => self.resize(width as usize, height as usize),
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> io::Result<()> {
        let pan = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                None
            }
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
                None
            }
            KeyCode::Char('w') | KeyCode::Up => Some((1, -PAN_STEP)),
            KeyCode::Char('s') | KeyCode::Down => Some((1, PAN_STEP)),
            KeyCode::Char('a') | KeyCode::Left => Some((0, PAN_STEP)),
            KeyCode::Char('d') | KeyCode::Right => Some((0, -PAN_STEP)),
            KeyCode::Char('+') => Some((2, -PAN_STEP)),
            KeyCode::Char('-') => Some((2, PAN_STEP)),
            _ => None,
        };
        if let Some((axis, amount)) = pan {
            let mut offset = vec![0.0; self.config.dimensions];
            offset[axis] = amount;
            self.camera.pan(&offset).map_err(invalid_input)?;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One fixed tick: orbit the camera
    pub fn update(&mut self) {
        if !self.paused {
            self.camera.advance();
            self.ticks += 1;
        }
    }

    /// Rasterize the whole world into the renderer's buffers
    pub fn draw_world(&mut self) -> io::Result<usize> {
        self.renderer.clear();
        let mut drawn = 0;
        for object in self.world.objects() {
            let screen = project(
                &self.projection,
                self.camera.matrix(),
                object.object_to_world(),
                &object.mesh.vertices,
            )
            .map_err(invalid_input)?;
            drawn += self
                .renderer
                .render_mesh(&screen, &object.mesh.triangles, &self.config.palette);
        }
        Ok(drawn)
    }

    fn render(&mut self) -> io::Result<()> {
        self.draw_world()?;

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | FPS: {:.1} | tick {}{} | WASD/Arrows=Pan +/-=Zoom Space=Pause Q=Quit",
                self.config.window.caption,
                self.fps,
                self.ticks,
                if self.paused { " (paused)" } else { "" }
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
