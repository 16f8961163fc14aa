//! Setting up and responding to user defined key/mouse bindings.
use crate::{backend::Backend, core::space::Space, pure::geometry::Point, Error, Result, WinId};

use std::collections::HashMap;
use std::convert::TryFrom;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Some action to be run by a user key binding.
pub type KeyEventHandler<B> = Box<dyn FnMut(&mut Space<B>, &B) -> Result<()>>;

/// An action to be run in response to a mouse event.
pub type MouseEventHandler<B> = Box<dyn FnMut(&mut Space<B>, &B, &MouseEvent) -> Result<()>>;

/// User defined key bindings.
pub type KeyBindings<B> = HashMap<KeyCode, KeyEventHandler<B>>;

/// User defined mouse bindings.
pub type MouseBindings<B> = HashMap<(MouseEventKind, MouseState), MouseEventHandler<B>>;

/// A u16 key-code modifier bitmask.
pub type KeyCodeMask = u16;

/// A u8 key-code value.
pub type KeyCodeValue = u8;

/// A key press and held modifiers, as delivered by the backend's grab
/// mechanism. Opaque beyond mask/code: keysym resolution is the backend's
/// job (see the `penrose_keysyms` crate for symbolic names).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyCode {
    pub mask: KeyCodeMask,
    pub code: KeyCodeValue,
}

impl KeyCode {
    /// A copy of this [KeyCode] with the given mask bits cleared, used when
    /// matching a binding against a key press that also reports lock keys
    /// (NumLock, CapsLock) the user did not ask to bind against.
    pub fn ignoring_modifier(&self, mask: KeyCodeMask) -> KeyCode {
        KeyCode {
            mask: self.mask & !mask,
            code: self.code,
        }
    }
}

/// Known mouse buttons for binding actions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
}

impl From<MouseButton> for u8 {
    fn from(b: MouseButton) -> u8 {
        match b {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
        }
    }
}

/// Known modifier keys for bindings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, EnumIter, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum ModifierKey {
    Ctrl,
    Alt,
    Shift,
    Meta,
}

impl TryFrom<&str> for ModifierKey {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        match s {
            "C" => Ok(Self::Ctrl),
            "A" => Ok(Self::Alt),
            "S" => Ok(Self::Shift),
            "M" => Ok(Self::Meta),
            _ => Err(Error::Raw(format!("{s} is not a known modifier"))),
        }
    }
}

/// A mouse button plus the modifiers held at the time, used as the key for
/// [`MouseBindings`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct MouseState {
    pub button: MouseButton,
    pub modifiers: Vec<ModifierKey>,
}

impl MouseState {
    pub fn new(button: MouseButton, mut modifiers: Vec<ModifierKey>) -> Self {
        modifiers.sort();
        Self { button, modifiers }
    }
}

/// The kind of mouse event a [MouseEvent] represents.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    Motion,
}

/// A mouse movement or button event routed through the input filter chain.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct MouseEvent {
    /// The window under the pointer when the event was received.
    pub id: WinId,
    /// Absolute coordinate of the event.
    pub rpt: Point,
    /// Coordinate of the event relative to the top-left of `id`'s frame.
    pub wpt: Point,
    pub state: MouseState,
    pub kind: MouseEventKind,
}

impl MouseEvent {
    pub fn new(id: WinId, rpt: Point, wpt: Point, state: MouseState, kind: MouseEventKind) -> Self {
        MouseEvent {
            id,
            rpt,
            wpt,
            state,
            kind,
        }
    }
}
