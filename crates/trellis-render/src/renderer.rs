//! The drawing surface a table and its cells paint onto.
//!
//! The [`Renderer`] trait is object safe so widgets and cell content can take
//! `&mut dyn Renderer`. Backends translate these primitives to their own
//! drawing API.

use crate::types::{Color, Point, Rect};

/// A 2D drawing surface with a save/restore stack of translation and clip.
///
/// ```ignore
/// renderer.save();
/// renderer.translate(10.0, 10.0);
/// renderer.fill_rect(rect, Color::GRAY);
/// renderer.restore();
/// ```
pub trait Renderer {
    /// Push the current translation and clip.
    fn save(&mut self);

    /// Pop back to the last [`save`](Self::save).
    fn restore(&mut self);

    /// Move the origin by `(tx, ty)`.
    fn translate(&mut self, tx: f32, ty: f32);

    /// Intersect the current clip with `rect` (in local coordinates).
    fn clip_rect(&mut self, rect: Rect);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], color: Color);

    /// Draw a single line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point, color: Color);
}

/// One entry of a [`RenderStateStack`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderState {
    /// Accumulated translation.
    pub offset: Point,
    /// Clip rect in absolute coordinates.
    pub clip: Option<Rect>,
}

/// Save/restore bookkeeping for translation and clip, shared by backends.
#[derive(Debug, Clone, Default)]
pub struct RenderStateStack {
    stack: Vec<RenderState>,
    current: RenderState,
}

impl RenderStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> &RenderState {
        &self.current
    }

    pub fn save(&mut self) {
        self.stack.push(self.current);
    }

    /// Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.current = state;
        }
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.current.offset = self.current.offset + Point::new(tx, ty);
    }

    /// Intersect the clip with `rect`, given in local coordinates. Disjoint
    /// clips collapse to an empty rect.
    pub fn clip(&mut self, rect: Rect) {
        let absolute = self.to_absolute(rect);
        self.current.clip = Some(match self.current.clip {
            Some(existing) => existing.intersect(&absolute).unwrap_or(Rect::new(absolute.x(), absolute.y(), 0.0, 0.0)),
            None => absolute,
        });
    }

    /// Map a local rectangle to absolute coordinates.
    #[inline]
    pub fn to_absolute(&self, rect: Rect) -> Rect {
        rect.offset(self.current.offset.x, self.current.offset.y)
    }

    /// Map a local point to absolute coordinates.
    #[inline]
    pub fn point_to_absolute(&self, point: Point) -> Point {
        point + self.current.offset
    }

    /// Whether an absolute rectangle is entirely clipped away.
    pub fn is_clipped(&self, absolute: &Rect) -> bool {
        match self.current.clip {
            Some(clip) => clip.intersect(absolute).is_none(),
            None => false,
        }
    }
}
