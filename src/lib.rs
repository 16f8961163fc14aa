//! Core window-management engine: window model & transient graph, virtual
//! subspaces, stacking order, focus chain & activation policy, move/resize,
//! screen edges, rule book and the input filter chain that drives them.
//!
//! Everything here is a pure, single-threaded, in-memory state machine.
//! Protocol decoding, rendering and IPC are external collaborators reached
//! through the [`backend::Backend`] trait.
use std::fmt;
use std::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod backend;
pub mod core;
pub mod pure;

/// A stable identifier for a tracked window, independent of the backend's
/// own resource id scheme (an X11 XID or a Wayland surface handle).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct WinId(pub(crate) u32);

impl fmt::Display for WinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for WinId {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for WinId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<WinId> for u32 {
    fn from(id: WinId) -> Self {
        id.0
    }
}

/// Every recoverable condition the core can raise. No variant here is ever
/// fatal: call sites either recover locally or degrade a single window,
/// edge or rule, never the whole [`core::space::Space`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A client made a malformed or out-of-turn request (e.g. configure on
    /// a window that no longer exists). The offending request is dropped.
    #[error("protocol violation from {id}: {detail}")]
    ProtocolViolation { id: WinId, detail: String },

    /// A client failed to respond to a ping within the configured timeout.
    #[error("client {id} is not responding to ping")]
    UnresponsiveClient { id: WinId },

    /// An external collaborator the backend is expected to provide (a
    /// decoration factory, a non-empty output set) returned nothing.
    #[error("missing backend dependency: {detail}")]
    MissingBackendDependency { detail: String },

    /// A single rule failed to parse or apply; the rule book skips it.
    #[error("invalid rule: {reason}")]
    InvalidRule { reason: String },

    /// Persisted subspace layout did not parse.
    #[error("invalid persisted subspace layout")]
    InvalidSubspaceLayout,

    /// An operation required more subspaces than currently exist (e.g.
    /// removing the last remaining subspace).
    #[error("insufficient subspaces for this operation")]
    InsufficientWorkspaces,

    /// A duplicate tag/name was supplied where uniqueness is required.
    #[error("tags are not unique: {tags:?}")]
    NonUniqueTags { tags: Vec<String> },

    /// Reference to a window the core has no record of.
    #[error("{0} is not a known window")]
    UnknownClient(WinId),

    /// An operation that requires a visible client was run against a
    /// window that is hidden, minimized, or on another subspace.
    #[error("{0} is not currently visible")]
    ClientIsNotVisible(WinId),

    /// The underlying connection to the display server is closed.
    #[error("the underlying display connection is closed")]
    ConnectionClosed,

    /// A typed state extension was requested that was never registered.
    #[error("no state extension of the requested type is registered")]
    UnknownStateExtension,

    /// Parsing an atom name returned by the backend failed.
    #[error("{0}")]
    Strum(#[from] strum::ParseError),

    /// A generic error for backend-supplied opaque error text.
    #[error("{0}")]
    Raw(String),
}

/// Crate-wide result alias; every fallible core operation returns this.
pub type Result<T> = std::result::Result<T, Error>;
