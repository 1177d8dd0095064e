//! CPU rendering module
//!
//! Tessellates the per-frame draw list into colored triangles in normalized
//! device coordinates, ready to upload as a single vertex buffer. Text is
//! passed through as labels for the platform's font renderer.

pub mod shapes;
pub mod vertex;

pub use vertex::Vertex;

use std::time::Duration;

use glam::Vec2;

use crate::palette::{self, Rgba};
use crate::platform::{Drawable, Renderer};

/// Triangles per circle
const CIRCLE_SEGMENTS: u32 = 24;

/// A text run positioned in game coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub pos: Vec2,
    pub text: String,
    pub color: Rgba,
}

/// Renderer that produces vertex buffers instead of talking to a GPU
#[derive(Debug, Clone)]
pub struct VertexRenderer {
    size: (f32, f32),
    vertices: Vec<Vertex>,
    labels: Vec<TextLabel>,
    message: Option<(String, Duration)>,
    frames: u64,
}

impl VertexRenderer {
    /// `width`/`height` are the arena size in game units
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: (width.max(1.0), height.max(1.0)),
            vertices: Vec::new(),
            labels: Vec::new(),
            message: None,
            frames: 0,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.size = (width, height);
        }
    }

    /// Convert game coordinates (origin top-left, y down) to NDC (-1 to 1, y up)
    pub fn game_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let (w, h) = self.size;
        (x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
    }

    /// Vertices of the last presented frame, in NDC
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertex buffer contents of the last presented frame
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    /// Most recent banner and how long it was meant to stay up
    pub fn message(&self) -> Option<(&str, Duration)> {
        self.message.as_ref().map(|(text, d)| (text.as_str(), *d))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Color the target is cleared to before each frame
    pub fn clear_color(&self) -> Rgba {
        palette::BACKGROUND
    }
}

impl Renderer for VertexRenderer {
    fn draw(&mut self, scene: &[Drawable]) {
        let mut vertices = Vec::with_capacity(scene.len() * 6);
        self.labels.clear();

        for item in scene {
            match item {
                Drawable::Rect { bounds, color } => {
                    vertices.extend(shapes::rect(bounds, *color));
                }
                Drawable::Circle {
                    center,
                    radius,
                    color,
                } => {
                    vertices.extend(shapes::circle(*center, *radius, *color, CIRCLE_SEGMENTS));
                }
                Drawable::Text { pos, text, color } => self.labels.push(TextLabel {
                    pos: *pos,
                    text: text.clone(),
                    color: *color,
                }),
            }
        }

        self.vertices = vertices
            .into_iter()
            .map(|v| {
                let (x, y) = self.game_to_ndc(v.position[0], v.position[1]);
                Vertex::new(x, y, v.color)
            })
            .collect();
        self.frames += 1;
    }

    fn show_message(&mut self, text: &str, duration: Duration) {
        self.message = Some((text.to_string(), duration));
    }
}
