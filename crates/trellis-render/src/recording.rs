//! A renderer that records draw commands instead of rasterizing them.
//!
//! Useful headless (printing, snapshot tests) and as a reference backend.
//! Commands are stored in absolute coordinates with the active clip applied
//! as a culling test only.

use crate::renderer::{RenderStateStack, Renderer};
use crate::types::{Color, Point, Rect};

/// A single recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A filled rectangle.
    FillRect { rect: Rect, color: Color },
    /// A filled polygon.
    FillPolygon { points: Vec<Point>, color: Color },
    /// A line of text.
    Text {
        text: String,
        origin: Point,
        color: Color,
    },
}

/// Records every primitive drawn through the [`Renderer`] interface.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    state: RenderStateStack,
    commands: Vec<DrawCommand>,
    culled: usize,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of primitives dropped because they fell outside the clip.
    pub fn culled_count(&self) -> usize {
        self.culled
    }

    /// Filled rectangles with the given color.
    pub fn rects_with_color(&self, color: Color) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillRect { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Every text string drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.culled = 0;
    }

    fn push_if_visible(&mut self, bounds: Rect, command: DrawCommand) {
        if self.state.is_clipped(&bounds) {
            self.culled += 1;
        } else {
            self.commands.push(command);
        }
    }
}

impl Renderer for RecordingRenderer {
    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.state.translate(tx, ty);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.state.clip(rect);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.state.to_absolute(rect);
        self.push_if_visible(rect, DrawCommand::FillRect { rect, color });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.is_empty() {
            return;
        }
        let points: Vec<Point> = points.iter().map(|p| self.state.point_to_absolute(*p)).collect();
        let (mut min, mut max) = (points[0], points[0]);
        for p in &points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        // Degenerate bounds still count as visible when they touch the clip.
        let bounds = Rect::new(min.x, min.y, (max.x - min.x).max(1.0), (max.y - min.y).max(1.0));
        self.push_if_visible(bounds, DrawCommand::FillPolygon { points, color });
    }

    fn draw_text(&mut self, text: &str, origin: Point, color: Color) {
        let origin = self.state.point_to_absolute(origin);
        let bounds = Rect::new(origin.x, origin.y, 1.0, 1.0);
        self.push_if_visible(
            bounds,
            DrawCommand::Text {
                text: text.to_string(),
                origin,
                color,
            },
        );
    }
}
