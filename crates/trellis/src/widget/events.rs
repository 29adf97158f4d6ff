//! Input events the host forwards to a table.
//!
//! The host translates platform input into these plain structs and calls the
//! matching handler. Positions are in the receiving table's coordinates.

use trellis_render::Point;

/// Modifier keys held during an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    pub shift: bool,
    pub control: bool,
    /// Option on macOS.
    pub alt: bool,
    /// Cmd on macOS, the Windows key elsewhere.
    pub meta: bool,
}

impl KeyboardModifiers {
    pub const NONE: Self = Self::held(false, false, false, false);
    pub const SHIFT: Self = Self::held(true, false, false, false);
    pub const CTRL: Self = Self::held(false, true, false, false);
    pub const ALT: Self = Self::held(false, false, true, false);
    pub const META: Self = Self::held(false, false, false, true);

    const fn held(shift: bool, control: bool, alt: bool, meta: bool) -> Self {
        Self {
            shift,
            control,
            alt,
            meta,
        }
    }

    /// Whether the platform's toggle-selection modifier is held: Cmd on
    /// macOS, Ctrl everywhere else.
    pub fn discontiguous_selection(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta
        } else {
            self.control
        }
    }
}

impl std::ops::BitOr for KeyboardModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::held(
            self.shift || rhs.shift,
            self.control || rhs.control,
            self.alt || rhs.alt,
            self.meta || rhs.meta,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// This button's bit in [`MouseMoveEvent::buttons`].
    pub const fn mask(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 4,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MousePressEvent {
    pub button: MouseButton,
    pub local_pos: Point,
    /// Consecutive clicks at this spot: 2 for a double click.
    pub click_count: u32,
    pub modifiers: KeyboardModifiers,
}

impl MousePressEvent {
    pub fn new(button: MouseButton, local_pos: Point, click_count: u32, modifiers: KeyboardModifiers) -> Self {
        Self {
            button,
            local_pos,
            click_count,
            modifiers,
        }
    }

    pub fn is_double_click(&self) -> bool {
        self.click_count == 2
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MouseReleaseEvent {
    pub button: MouseButton,
    pub local_pos: Point,
    pub modifiers: KeyboardModifiers,
}

impl MouseReleaseEvent {
    pub fn new(button: MouseButton, local_pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            button,
            local_pos,
            modifiers,
        }
    }
}

/// Pointer motion, with or without buttons held.
#[derive(Debug, Clone, Copy)]
pub struct MouseMoveEvent {
    pub local_pos: Point,
    /// Held buttons, as a set of [`MouseButton::mask`] bits.
    pub buttons: u8,
    pub modifiers: KeyboardModifiers,
}

impl MouseMoveEvent {
    /// Motion with no button held.
    pub fn hover(local_pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            local_pos,
            buttons: 0,
            modifiers,
        }
    }

    /// Motion with `button` held.
    pub fn drag(local_pos: Point, button: MouseButton, modifiers: KeyboardModifiers) -> Self {
        Self {
            local_pos,
            buttons: button.mask(),
            modifiers,
        }
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons & button.mask() != 0
    }
}

/// Keys a table responds to. Hosts map everything else to [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    NumpadEnter,
    Tab,
    Escape,
    /// The host's code for an unmapped key.
    Other(u32),
}

impl Key {
    /// Whether the key activates the selection, like a double click.
    pub fn is_control_action(&self) -> bool {
        matches!(self, Key::Enter | Key::NumpadEnter)
    }
}

#[derive(Debug, Clone)]
pub struct KeyPressEvent {
    pub key: Key,
    pub modifiers: KeyboardModifiers,
}

impl KeyPressEvent {
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }
}
