//! The boundary between the core and the display system actually in use
//! (X11 or Wayland). Everything in this module is IO: wire protocol
//! decoding, rendering and compositing happen entirely on the far side of
//! it. The core only ever sees [`WinId`]s, [`Rect`]s and already-decoded
//! [`event::BackendEvent`]s.
use crate::{
    core::bindings::{KeyCode, MouseState},
    pure::geometry::{Point, Rect},
    Result, WinId,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

pub mod atom;
pub mod event;
pub mod property;
pub mod query;

#[cfg(test)]
pub mod mock;

#[cfg(test)]
pub use mock::MockBackend;

pub use atom::Atom;
pub use event::BackendEvent;
pub use property::{Prop, WindowAttributes, WmState};
pub use query::Query;

/// On screen configuration for a client window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClientConfig {
    /// Absolute size and position on the output, as a [Rect].
    Position(Rect),
    /// Mark this window as stacking immediately above the given sibling.
    StackAbove(WinId),
}

/// Attributes affecting how a client window is tracked rather than how it
/// is drawn (decoration and colour are the decoration factory's concern).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientAttr {
    /// Restore the default event mask (map/unmap/property notifications).
    ClientEventMask,
    /// Mask out unmap notifications for the duration of a WM-initiated hide.
    ClientUnmapMask,
}

/// Border margins a decoration factory contributes around a client's
/// buffer, as returned by [`Backend::create_decoration`]. `frame_rect =
/// client_rect` grown by these margins on each side (§3).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecorationMargins {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// The abstraction the core talks to in order to drive either an X11
/// screen or a Wayland display. An implementer is free to back this with
/// whatever wire protocol it likes: the core only assumes WinId-stable
/// identity and the semantics documented per method.
pub trait Backend {
    /// The id of the window manager's root/background surface.
    fn root(&self) -> WinId;
    /// The geometry of every currently connected output.
    fn screen_details(&self) -> Result<Vec<Rect>>;
    /// The current pointer position, in root-relative coordinates.
    fn cursor_position(&self) -> Result<Point>;

    /// Grab the given key and mouse combinations so that they are
    /// delivered to the window manager instead of the focused client.
    fn grab(&self, key_codes: &[KeyCode], mouse_states: &[MouseState]) -> Result<()>;
    /// Block for the next decoded event.
    fn next_event(&self) -> Result<BackendEvent>;
    /// Flush any requests queued against the backend.
    fn flush(&self);

    /// Resolve an atom name to a stable id, interning it if necessary.
    fn intern_atom(&self, name: &str) -> Result<WinId>;
    /// Resolve an atom id back to its string name.
    fn atom_name(&self, id: WinId) -> Result<String>;

    /// The client's current buffer geometry, as last reported by the
    /// backend (not the WM's own frame rect).
    fn client_geometry(&self, client: WinId) -> Result<Rect>;
    /// Every client window the backend currently knows about (used when
    /// adopting clients that existed before the WM started).
    fn existing_clients(&self) -> Result<Vec<WinId>>;

    /// Map the client, making it visible.
    fn map(&self, client: WinId) -> Result<()>;
    /// Unmap the client, hiding it.
    fn unmap(&self, client: WinId) -> Result<()>;
    /// Request that the client close itself.
    fn kill(&self, client: WinId) -> Result<()>;
    /// Assign input focus to the client.
    fn focus(&self, client: WinId) -> Result<()>;

    /// Look up a named property on a client.
    fn get_prop(&self, client: WinId, prop_name: &str) -> Result<Option<Prop>>;
    /// List every property name currently set on a client.
    fn list_props(&self, client: WinId) -> Result<Vec<String>>;
    /// The ICCCM WM_STATE currently recorded for a client.
    fn get_wm_state(&self, client: WinId) -> Result<Option<WmState>>;
    /// Static attributes fetched once, at manage time.
    fn get_window_attributes(&self, client: WinId) -> Result<WindowAttributes>;

    /// Record the ICCCM WM_STATE for a client.
    fn set_wm_state(&self, client: WinId, wm_state: WmState) -> Result<()>;
    /// Set a named property on a client.
    fn set_prop(&self, client: WinId, name: &str, val: Prop) -> Result<()>;
    /// Remove a named property from a client.
    fn delete_prop(&self, client: WinId, prop_name: &str) -> Result<()>;
    /// Set one or more [ClientAttr] on a client.
    fn set_client_attributes(&self, client: WinId, attrs: &[ClientAttr]) -> Result<()>;
    /// Apply one or more [ClientConfig] changes to a client.
    fn set_client_config(&self, client: WinId, data: &[ClientConfig]) -> Result<()>;
    /// Send a backend-level client message.
    fn send_client_message(&self, msg: event::ClientMessage) -> Result<()>;

    /// Move the pointer to an absolute root-relative position.
    fn warp_pointer(&self, p: Point) -> Result<()>;

    /// Ask a client to answer a liveness ping, tagged with `serial` so the
    /// eventual [`BackendEvent::Pong`] can be matched back to this request
    /// (§5's serial-keyed continuations).
    fn ping(&self, client: WinId, serial: u64) -> Result<()>;

    /// Request repaint of all (`window = None`) or part of the scene.
    fn schedule_repaint(&self, window: Option<WinId>);
    /// Mark a region of the scene as needing repaint without a full
    /// recomposite.
    fn add_repaint(&self, region: Rect);
    /// Whether `id` is a compositor-internal surface the core should not
    /// track as an ordinary client (e.g. a shadow or blur helper window).
    fn is_overlay_window(&self, id: WinId) -> bool;
    /// Whether the compositor currently has an active fullscreen effect
    /// running, which suppresses screen-edge activation (§4.G).
    fn effects_active_fullscreen(&self) -> bool;
    /// Ask the decoration factory to build a decoration for `window`,
    /// yielding the border margins it contributes. Returns
    /// `Error::MissingBackendDependency` if no factory is registered, in
    /// which case the caller falls back to a no-border decoration (§7).
    fn create_decoration(&self, window: WinId) -> Result<DecorationMargins>;
}

/// Derived conveniences layered on top of the primitive [Backend]
/// operations. Nothing here mutates core state: anything that needs to
/// read or write `Space` lives on `Space` itself (see
/// `core::space::Space::modify_and_refresh`).
pub trait BackendExt: Backend + Sized {
    /// Display a client by mapping it and marking its WmState Normal.
    /// Idempotent if already visible.
    fn reveal(&self, client: WinId, mapped: &mut HashSet<WinId>) -> Result<()> {
        self.set_wm_state(client, WmState::Normal)?;
        self.map(client)?;
        mapped.insert(client);
        Ok(())
    }

    /// Hide a client by unmapping it and marking its WmState Iconic,
    /// masking the unmap notification we caused ourselves so the handler
    /// for unsolicited client-initiated unmaps doesn't also fire.
    fn hide(
        &self,
        client: WinId,
        mapped: &mut HashSet<WinId>,
        pending_unmap: &mut HashMap<WinId, usize>,
    ) -> Result<()> {
        if !mapped.contains(&client) {
            return Ok(());
        }

        self.set_client_attributes(client, &[ClientAttr::ClientUnmapMask])?;
        self.unmap(client)?;
        self.set_client_attributes(client, &[ClientAttr::ClientEventMask])?;
        self.set_wm_state(client, WmState::Iconic)?;

        mapped.remove(&client);
        pending_unmap
            .entry(client)
            .and_modify(|count| *count += 1)
            .or_insert(1);

        Ok(())
    }

    /// Reposition a client, applying its WM_NORMAL_HINTS size constraints
    /// first if it has any.
    fn position_client(&self, client: WinId, mut r: Rect) -> Result<()> {
        let p = Atom::WmNormalHints.as_ref();
        if let Ok(Some(Prop::WmNormalHints(hints))) = self.get_prop(client, p) {
            trace!(?client, ?hints, "client has WmNormalHints: applying size hints");
            r = hints.apply_to(r);
        }

        trace!(?client, ?r, "positioning client");
        self.set_client_config(client, &[ClientConfig::Position(r)])
    }

    /// Restack the given windows bottom to top, each one immediately
    /// above the last.
    fn restack<'a, I>(&self, mut ids: I) -> Result<()>
    where
        I: Iterator<Item = &'a WinId>,
    {
        let mut previous = match ids.next() {
            Some(id) => *id,
            None => return Ok(()),
        };

        for &id in ids {
            self.set_client_config(id, &[ClientConfig::StackAbove(previous)])?;
            previous = id;
        }

        Ok(())
    }

    /// Move the pointer to the center of a client's current frame.
    fn warp_pointer_to_window(&self, id: WinId) -> Result<()> {
        let r = self.client_geometry(id)?;
        self.warp_pointer(r.midpoint())
    }

    /// Every currently-set property on a client, keyed by name.
    fn all_props_for(&self, id: WinId) -> Result<HashMap<String, Prop>> {
        self.list_props(id)?
            .into_iter()
            .map(|s| {
                self.get_prop(id, &s)
                    .map(|opt| (s, opt.expect("prop to be set")))
            })
            .collect()
    }

    /// A client's title, following ICCCM/EWMH fallback order.
    fn window_title(&self, id: WinId) -> Result<String> {
        match query::str_prop(Atom::WmName, id, self) {
            Ok(Some(mut strs)) => Ok(strs.remove(0)),
            _ => match query::str_prop(Atom::NetWmName, id, self)? {
                Some(mut strs) => Ok(strs.remove(0)),
                None => Ok(String::new()),
            },
        }
    }

    /// Whether a client declares support for a given WM_PROTOCOLS atom.
    fn client_supports_protocol(&self, id: WinId, proto: &str) -> Result<bool> {
        if let Some(Prop::Atom(protocols)) = self.get_prop(id, Atom::WmProtocols.as_ref())? {
            Ok(protocols.iter().any(|p| p == proto))
        } else {
            Ok(false)
        }
    }

    /// A client's reported PID, if it set `_NET_WM_PID`.
    fn window_pid(&self, id: WinId) -> Option<u32> {
        if let Ok(Some(Prop::Cardinal(vals))) = self.get_prop(id, "_NET_WM_PID") {
            Some(vals[0])
        } else {
            None
        }
    }

    /// Whether a client's class is one the rule book or config has asked
    /// to auto-float.
    fn client_should_float(&self, client: WinId, floating_classes: &[String]) -> Result<bool> {
        trace!(?client, "fetching WmClass prop");
        if let Some(Prop::UTF8String(strs)) = self.get_prop(client, Atom::WmClass.as_ref())? {
            if strs.iter().any(|c| floating_classes.contains(c)) {
                debug!(?client, "window has a floating class");
                return Ok(true);
            }
        }

        let window_types = self.get_prop(client, Atom::NetWmWindowType.as_ref())?;
        let float_types: &[&str] = atom::AUTO_FLOAT_WINDOW_TYPES;

        let should_float = match window_types {
            Some(Prop::Atom(atoms)) => atoms.iter().any(|a| float_types.contains(&a.as_str())),
            _ => false,
        };

        Ok(should_float)
    }

    /// Run a [Query] against a client.
    fn query(&self, query: &dyn Query<Self>, id: WinId) -> Result<bool> {
        query.run(id, self)
    }

    /// Run a [Query], falling back to `default` if the backend errors.
    fn query_or(&self, default: bool, query: &dyn Query<Self>, id: WinId) -> bool {
        query.run(id, self).unwrap_or(default)
    }
}

impl<T> BackendExt for T where T: Backend {}
