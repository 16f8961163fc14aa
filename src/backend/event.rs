//! Data types for the decoded event stream the backend hands the core.
//! Wire decoding itself (X11/Wayland) is out of scope: by the time an
//! event reaches `Space::handle_event` it is already one of these.
use crate::{
    core::bindings::{KeyCode, MouseEvent},
    pure::geometry::{Point, Rect},
    backend::Atom,
    WinId,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// A single-finger touch point used for both raw touch events and
/// screen-edge swipe gestures (§4.G, §4.H). `slot` distinguishes
/// concurrent touch points on multi-touch hardware.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub slot: u32,
    pub pos: Point,
}

/// A multi-finger swipe gesture, as reported by a touchpad or touchscreen
/// once decoded past raw touch points. `delta` is the incremental offset
/// since the last `Update`, normalised to screen fractions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeUpdate {
    pub fingers: u32,
    pub delta_x: f64,
    pub delta_y: f64,
}

/// A multi-finger pinch gesture.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchUpdate {
    pub fingers: u32,
    pub scale: f64,
    pub rotation: f64,
}

/// The decoded event stream consumed by the input filter chain (§4.H).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// A message has been sent to a particular client.
    ClientMessage(ClientMessage),
    /// Client config has changed in some way.
    ConfigureNotify(ConfigureEvent),
    /// A client is requesting to be repositioned.
    ConfigureRequest(ConfigureEvent),
    /// The mouse pointer has entered a new client window.
    Enter(PointerChange),
    /// A part or all of a client has become visible.
    Expose(ExposeEvent),
    /// A client should have focus.
    FocusIn(WinId),
    /// A client window has been closed.
    Destroy(WinId),
    /// A grabbed key combination has been entered by the user.
    KeyPress(KeyCode),
    /// A grabbed key combination has been released.
    KeyRelease(KeyCode),
    /// The mouse pointer has left the current client window.
    Leave(PointerChange),
    /// Keybindings have changed.
    MappingNotify,
    /// A client window is requesting to be positioned and rendered.
    MapRequest(WinId),
    /// The mouse has moved or a mouse button has been pressed.
    MouseEvent(MouseEvent),
    /// A scroll/axis event, reported as a signed delta per axis.
    PointerAxis { horizontal: f64, vertical: f64 },
    /// A client property has changed in some way.
    PropertyNotify(PropertyEvent),
    /// Output topology changed (new outputs, resolution change etc).
    RandrNotify,
    /// Focus has moved to a different screen.
    ScreenChange,
    /// A client is being unmapped.
    UnmapNotify(WinId),
    /// A client answered a liveness ping previously sent via
    /// [`crate::backend::Backend::ping`], tagged with the serial the ping
    /// was sent with.
    Pong(WinId, u64),
    /// A finger touched down.
    TouchDown(TouchPoint),
    /// A touch point moved.
    TouchMotion(TouchPoint),
    /// A finger was lifted.
    TouchUp { slot: u32 },
    /// A multi-finger swipe gesture began.
    SwipeBegin { fingers: u32 },
    /// A multi-finger swipe gesture progressed.
    SwipeUpdate(SwipeUpdate),
    /// A multi-finger swipe gesture ended (fingers lifted normally).
    SwipeEnd,
    /// A multi-finger swipe gesture was cancelled (e.g. by the hardware).
    SwipeCancel,
    /// A pinch gesture began.
    PinchBegin { fingers: u32 },
    /// A pinch gesture progressed.
    PinchUpdate(PinchUpdate),
    /// A pinch gesture ended normally.
    PinchEnd,
    /// A pinch gesture was cancelled.
    PinchCancel,
}

impl std::fmt::Display for BackendEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BackendEvent::*;

        match self {
            ClientMessage(_) => write!(f, "ClientMessage"),
            ConfigureNotify(_) => write!(f, "ConfigureNotify"),
            ConfigureRequest(_) => write!(f, "ConfigureRequest"),
            Enter(_) => write!(f, "Enter"),
            Expose(_) => write!(f, "Expose"),
            FocusIn(_) => write!(f, "FocusIn"),
            Destroy(_) => write!(f, "Destroy"),
            KeyPress(_) => write!(f, "KeyPress"),
            KeyRelease(_) => write!(f, "KeyRelease"),
            Leave(_) => write!(f, "Leave"),
            MappingNotify => write!(f, "MappingNotify"),
            MapRequest(_) => write!(f, "MapRequest"),
            MouseEvent(_) => write!(f, "MouseEvent"),
            PointerAxis { .. } => write!(f, "PointerAxis"),
            PropertyNotify(_) => write!(f, "PropertyNotify"),
            RandrNotify => write!(f, "RandrNotify"),
            ScreenChange => write!(f, "ScreenChange"),
            UnmapNotify(_) => write!(f, "UnmapNotify"),
            Pong(..) => write!(f, "Pong"),
            TouchDown(_) => write!(f, "TouchDown"),
            TouchMotion(_) => write!(f, "TouchMotion"),
            TouchUp { .. } => write!(f, "TouchUp"),
            SwipeBegin { .. } => write!(f, "SwipeBegin"),
            SwipeUpdate(_) => write!(f, "SwipeUpdate"),
            SwipeEnd => write!(f, "SwipeEnd"),
            SwipeCancel => write!(f, "SwipeCancel"),
            PinchBegin { .. } => write!(f, "PinchBegin"),
            PinchUpdate(_) => write!(f, "PinchUpdate"),
            PinchEnd => write!(f, "PinchEnd"),
            PinchCancel => write!(f, "PinchCancel"),
        }
    }
}

/// Known client message formats the core needs to send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientMessageKind {
    /// Inform a client that it is being closed.
    DeleteWindow(WinId),
    /// Request that a client take input focus.
    TakeFocus(WinId),
}

impl ClientMessageKind {
    /// Build a default [ClientMessage], resolving the relevant protocol
    /// atom through the backend's atom interning.
    pub fn as_message<B>(&self, b: &B) -> crate::Result<ClientMessage>
    where
        B: crate::backend::Backend,
    {
        let proto_msg = |id: WinId, atom: Atom| {
            let proto = Atom::WmProtocols.as_ref();
            let data = &[*b.intern_atom(atom.as_ref())?, 0, 0, 0, 0];
            let mask = ClientEventMask::NoEventMask;

            Ok(ClientMessage::new(id, mask, proto, data.into()))
        };

        match self {
            ClientMessageKind::DeleteWindow(id) => proto_msg(*id, Atom::WmDeleteWindow),
            ClientMessageKind::TakeFocus(id) => proto_msg(*id, Atom::WmTakeFocus),
        }
    }
}

/// Event masks used when sending client events.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientEventMask {
    SubstructureNotify,
    StructureNotify,
    NoEventMask,
}

/// The raw data contained in a [`ClientMessage`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClientMessageData {
    U8([u8; 20]),
    U16([u16; 10]),
    U32([u32; 5]),
}

macro_rules! cast_slice {
    ($s:expr, $t:ty) => {
        $s.iter().map(|&v| v as $t).collect::<Vec<$t>>()
    };
}

impl ClientMessageData {
    pub fn as_usize(&self) -> Vec<usize> {
        match self {
            Self::U8(data) => cast_slice!(data, usize),
            Self::U16(data) => cast_slice!(data, usize),
            Self::U32(data) => cast_slice!(data, usize),
        }
    }
}

macro_rules! __impl_client_message_data(
    { $t:ty; $count:expr, $variant:expr, $method:ident } => {
        impl ClientMessageData {
            pub fn $method(&self) -> Vec<$t> {
                match self {
                    Self::U8(data) => cast_slice!(data, $t),
                    Self::U16(data) => cast_slice!(data, $t),
                    Self::U32(data) => cast_slice!(data, $t),
                }
            }
        }
        impl From<[$t; $count]> for ClientMessageData {
            fn from(data: [$t; $count]) -> Self {
                $variant(data)
            }
        }
        impl From<&[$t; $count]> for ClientMessageData {
            fn from(data: &[$t; $count]) -> Self {
                $variant(*data)
            }
        }
        impl TryFrom<&[$t]> for ClientMessageData {
            type Error = std::array::TryFromSliceError;

            fn try_from(data: &[$t]) -> std::result::Result<Self, Self::Error> {
                Ok($variant(<[$t; $count]>::try_from(data)?))
            }
        }
    }
);

__impl_client_message_data!(u8; 20, ClientMessageData::U8, as_u8);
__impl_client_message_data!(u16; 10, ClientMessageData::U16, as_u16);
__impl_client_message_data!(u32; 5, ClientMessageData::U32, as_u32);

/// A client message that needs to be parsed and handled based on its type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientMessage {
    pub id: WinId,
    pub mask: ClientEventMask,
    pub dtype: String,
    pub data: ClientMessageData,
}

impl ClientMessage {
    pub fn new(id: WinId, mask: ClientEventMask, dtype: impl Into<String>, data: ClientMessageData) -> Self {
        Self {
            id,
            mask,
            dtype: dtype.into(),
            data,
        }
    }
}

/// A configure request or notification when a client changes position or size.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigureEvent {
    pub id: WinId,
    pub r: Rect,
    pub is_root: bool,
}

/// A notification that a window has become visible.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExposeEvent {
    pub id: WinId,
    pub r: Rect,
    pub count: usize,
}

/// A notification that the mouse pointer has entered or left a window.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerChange {
    pub id: WinId,
    pub abs: Point,
    pub relative: Point,
    pub same_screen: bool,
}

/// A property change on a known client.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyEvent {
    pub id: WinId,
    pub atom: String,
    pub is_root: bool,
}
