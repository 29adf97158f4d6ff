//! Drawing surface and geometry types for Trellis.
//!
//! Widgets paint through the object-safe [`Renderer`] trait. A host supplies a
//! backend implementation; [`RecordingRenderer`] captures the draw commands
//! instead, which is what printing and the test-suites use.
//!
//! ```
//! use trellis_render::{Color, RecordingRenderer, Rect, Renderer};
//!
//! let mut renderer = RecordingRenderer::new();
//! renderer.save();
//! renderer.translate(200.0, 100.0);
//! renderer.fill_rect(Rect::new(0.0, 0.0, 80.0, 80.0), Color::GRAY);
//! renderer.restore();
//!
//! assert_eq!(renderer.commands().len(), 1);
//! ```

mod recording;
mod renderer;
mod types;

pub use recording::{DrawCommand, RecordingRenderer};
pub use renderer::{RenderState, RenderStateStack, Renderer};
pub use types::{Color, Insets, Point, Rect, Size};
