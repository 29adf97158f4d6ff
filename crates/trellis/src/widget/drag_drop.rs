//! Drag payloads and the press-to-drag gesture.
//!
//! A table that supports dragging arms a [`DragGesture`] on press. Once the
//! pointer has travelled past the threshold it packs the selected rows into a
//! [`DragData`] under its drag key and hands the shared payload to the host,
//! which offers it to whichever table ends up under the pointer.
//!
//! ```
//! use trellis::widget::drag_drop::{DragData, DropAction};
//!
//! let mut data = DragData::new();
//! data.set_text("2 rows");
//! data.set_payload("rows", vec![1_u32, 2]);
//!
//! assert_eq!(data.payload::<Vec<u32>>("rows"), Some(&vec![1, 2]));
//! assert!(data.payload::<String>("rows").is_none());
//! assert!((DropAction::COPY | DropAction::MOVE).contains(DropAction::MOVE));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use trellis_render::Point;

/// What a completed drop did to the dragged rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DropAction(u8);

impl DropAction {
    pub const NONE: Self = Self(0);
    /// The rows were copied; the source is untouched.
    pub const COPY: Self = Self(1);
    /// The rows were moved out of their old parent.
    pub const MOVE: Self = Self(2);

    /// Whether every action in `other` is also in `self`. `NONE` is never
    /// contained.
    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for DropAction {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

type Payload = Arc<dyn Any + Send + Sync>;

/// What travels with a drag: a short human-readable summary and any number
/// of typed payloads, each under its own key.
#[derive(Clone, Default)]
pub struct DragData {
    text: Option<String>,
    payloads: HashMap<String, Payload>,
}

impl fmt::Debug for DragData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.payloads.keys().collect();
        keys.sort();
        f.debug_struct("DragData")
            .field("text", &self.text)
            .field("keys", &keys)
            .finish()
    }
}

impl DragData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The drag summary, e.g. "3 rows".
    pub fn text(&self) -> Option<String> {
        self.text.clone()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Whether something is stored under `key`, whatever its type.
    pub fn has_payload(&self, key: &str) -> bool {
        self.payloads.contains_key(key)
    }

    /// Store `payload` under `key`, replacing any previous payload there.
    pub fn set_payload<P: Send + Sync + 'static>(&mut self, key: impl Into<String>, payload: P) {
        self.payloads.insert(key.into(), Arc::new(payload));
    }

    /// The payload under `key`, if there is one and it has type `P`.
    pub fn payload<P: Send + Sync + 'static>(&self, key: &str) -> Option<&P> {
        self.payloads.get(key)?.downcast_ref::<P>()
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Armed { origin: Point },
    Dragging(Arc<DragData>),
}

/// Press-to-drag state for one widget.
///
/// A press arms the gesture; it becomes a drag only after the pointer has
/// moved [`threshold`](Self::threshold) pixels from where it was pressed.
#[derive(Debug, Clone)]
pub struct DragGesture {
    phase: Phase,
    threshold: f32,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new()
    }
}

impl DragGesture {
    /// Pointer travel, in pixels, before a press turns into a drag.
    pub const DEFAULT_THRESHOLD: f32 = 4.0;

    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Arm on a press at `origin`, abandoning any previous gesture.
    pub fn arm(&mut self, origin: Point) {
        self.phase = Phase::Armed { origin };
    }

    /// Whether an armed gesture has travelled far enough to start dragging.
    pub fn passed_threshold(&self, pos: Point) -> bool {
        match self.phase {
            Phase::Armed { origin } => pos.distance(origin) >= self.threshold,
            _ => false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// The payload of the drag in progress.
    pub fn payload(&self) -> Option<&Arc<DragData>> {
        match &self.phase {
            Phase::Dragging(data) => Some(data),
            _ => None,
        }
    }

    /// Start dragging `data`. Returns the shared handle offered to targets.
    pub fn begin(&mut self, data: DragData) -> Arc<DragData> {
        let data = Arc::new(data);
        self.phase = Phase::Dragging(data.clone());
        data
    }

    /// End the gesture on release, returning the payload if a drag was in
    /// progress.
    pub fn finish(&mut self) -> Option<Arc<DragData>> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(data) => Some(data),
            _ => None,
        }
    }
}
