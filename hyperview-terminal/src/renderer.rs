/// Depth-coloured triangle rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use hyperview_core::{Matrix, Palette, Rgb, TriangleIndices};
use std::io::Write;

/// Character ramp for depth (far to near)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// One projected corner: screen position and clamped depth
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScreenVertex {
    x: f64,
    y: f64,
    depth: f64,
}

/// Renderer that rasterizes projected triangles into terminal cells
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Rgb>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![[0, 0, 0]; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill([0, 0, 0]);
    }

    /// Character and colour at a cell, `None` if nothing was drawn there
    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Rgb)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        self.depth_buffer[idx]
            .is_finite()
            .then(|| (self.char_buffer[idx], self.color_buffer[idx]))
    }

    /// Draw every triangle of a projected mesh
    ///
    /// `screen` is the output of `project` for a 2D screen: rows are
    /// screen x, screen y and depth. Triangles with a vertex behind the
    /// camera are skipped whole. Returns the number of triangles drawn.
    pub fn render_mesh(
        &mut self,
        screen: &Matrix,
        triangles: &[TriangleIndices],
        palette: &Palette,
    ) -> usize {
        let mut drawn = 0;
        for triangle in triangles {
            if let Some(corners) = self.visible_corners(screen, triangle) {
                self.rasterize_triangle(&corners, palette);
                drawn += 1;
            }
        }
        drawn
    }

    fn visible_corners(
        &self,
        screen: &Matrix,
        triangle: &TriangleIndices,
    ) -> Option<[ScreenVertex; 3]> {
        let mut corners = [ScreenVertex {
            x: 0.0,
            y: 0.0,
            depth: 0.0,
        }; 3];
        for (corner, &index) in corners.iter_mut().zip(triangle) {
            let (x, y, depth) = (screen[(0, index)], screen[(1, index)], screen[(2, index)]);
            if depth < 0.0 || !(x.is_finite() && y.is_finite() && depth.is_finite()) {
                return None;
            }
            // screen y grows upwards, terminal rows grow downwards
            *corner = ScreenVertex {
                x,
                y: self.height as f64 - y,
                depth: depth.min(1.0),
            };
        }
        Some(corners)
    }

    fn rasterize_triangle(&mut self, corners: &[ScreenVertex; 3], palette: &Palette) {
        let [v0, v1, v2] = *corners;
        let colors = [v0, v1, v2].map(|v| palette.color(v.depth));
        let outline = [v0, v1, v2].map(|v| (v.x, v.y));

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                let Some((w0, w1, w2)) = barycentric(outline, (px, py)) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = shade(depth);
                    self.color_buffer[idx] = blend(&colors, (w0, w1, w2));
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let [r, g, b] = self.color_buffer[idx];
                writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pick a ramp character; nearer fragments get denser glyphs
fn shade(depth: f64) -> char {
    let nearness = (1.0 - depth).clamp(0.0, 1.0);
    let index = (nearness * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

fn blend(colors: &[Rgb; 3], (w0, w1, w2): (f64, f64, f64)) -> Rgb {
    let mut out = [0u8; 3];
    for (channel, value) in out.iter_mut().enumerate() {
        let mixed = w0 * f64::from(colors[0][channel])
            + w1 * f64::from(colors[1][channel])
            + w2 * f64::from(colors[2][channel]);
        *value = mixed.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    [v0, v1, v2]: [(f64, f64); 3],
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
