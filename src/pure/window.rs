//! The window entity: per-window state, geometry and transient links.
use crate::{
    pure::focus::FspLevel,
    pure::geometry::Rect,
    pure::rules::RuleSnapshot,
    pure::stacking::Layer,
    WinId,
};
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Either every subspace (the empty set) or a fixed set of subspace ids.
///
/// Kept as its own type rather than `Option<HashSet<usize>>` so that the
/// "on all desktops" case can never be confused with "on no desktops",
/// which is not a state a window can be in.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Desktops(HashSet<usize>);

impl Desktops {
    /// A window present on every subspace.
    pub fn all() -> Self {
        Self(HashSet::new())
    }

    /// A window confined to a single subspace.
    pub fn one(id: usize) -> Self {
        Self(HashSet::from([id]))
    }

    pub fn from_set(ids: HashSet<usize>) -> Self {
        Self(ids)
    }

    pub fn is_on_all(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.is_on_all() || self.0.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &usize> {
        self.0.iter()
    }

    pub fn insert(&mut self, id: usize) {
        self.0.insert(id);
    }

    pub fn retain_clamped(&mut self, max: usize) {
        self.0.retain(|&id| id < max);
    }
}

/// The sum of independent maximize axes. `Full` is both at once.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaximizeState {
    pub horizontal: bool,
    pub vertical: bool,
}

impl MaximizeState {
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
    };
    pub const FULL: Self = Self {
        horizontal: true,
        vertical: true,
    };

    pub fn is_full(&self) -> bool {
        self.horizontal && self.vertical
    }

    pub fn is_none(&self) -> bool {
        !self.horizontal && !self.vertical
    }
}

/// Half- or quarter-screen tiling target, set via shortcut or drag-to-edge.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuickTile {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Maximize,
}

/// Boolean flags carried by every window. Kept as a single struct (rather
/// than bitflags) since each flag has its own setter with independent
/// rule-checking semantics (§4.A) rather than being toggled as a mask.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowFlags {
    pub keep_above: bool,
    pub keep_below: bool,
    pub skip_taskbar: bool,
    pub skip_pager: bool,
    pub skip_switcher: bool,
    pub demands_attention: bool,
    pub modal: bool,
    pub no_border: bool,
    pub user_no_border: bool,
    pub fullscreen: bool,
    pub blocks_compositing: bool,
}

/// All the rects a window carries: what the user sees, what the client
/// draws into, what the compositor samples, and the rects used to restore
/// from a transient state.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowGeometry {
    pub frame: Rect,
    pub client: Rect,
    pub buffer: Rect,
    pub restore: Option<Rect>,
    pub fullscreen_restore: Option<Rect>,
    pub quick_tile_restore: Option<Rect>,
    /// The maximize state in effect before a quick-tile was entered,
    /// restored when the tile is cleared (§4.F: entering
    /// `QuickTile::Maximize` forces `MaximizeState::FULL`).
    pub quick_tile_maximize_restore: Option<MaximizeState>,
}

/// Stable identity carried over from the protocol event stream.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct WindowIdentity {
    pub client_id: u64,
    pub desktop_file: Option<String>,
    pub resource_class: Option<String>,
    pub resource_name: Option<String>,
    pub title: String,
    pub role: Option<String>,
    pub machine: Option<String>,
    pub pid: Option<u32>,
}

/// Either the WM positions and decorates the window (`Controlled`) or it is
/// merely tracked for z-order (`Unmanaged`, e.g. tooltips, popups).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Controlled,
    Unmanaged,
}

/// A window's destruction is staged: it is first marked `Closing` (still
/// displayable as a remnant for close animations) and later `Released` once
/// no external party still references it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Live,
    Closing,
    Released,
}

/// The central entity: per-window state, geometry, flags and transient links.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Window {
    pub id: WinId,
    pub identity: WindowIdentity,
    pub control: Control,
    pub lifecycle: Lifecycle,

    pub geometry: WindowGeometry,

    pub mapped: bool,
    pub minimized: bool,
    pub hidden: bool,
    pub ready_for_painting: bool,

    pub flags: WindowFlags,
    pub maximize: MaximizeState,
    pub requested_maximize: MaximizeState,
    pub quick_tile: QuickTile,

    pub desktops: Desktops,

    pub parent: Option<WinId>,
    pub children: HashSet<WinId>,

    pub group: Option<u64>,

    pub layer: Option<Layer>,
    pub layer_dirty: bool,

    pub user_time: Option<u32>,

    pub rules: RuleSnapshot,

    pub shortcut: Option<String>,

    /// This window's own focus-stealing-prevention level, compared
    /// two-sidedly against whatever is currently active (§4.E, SPEC_FULL
    /// §10.1). Defaults to `Medium`, matching `FspLevel::default()`.
    pub fsp_level: FspLevel,
}

impl Window {
    pub fn new(id: WinId, identity: WindowIdentity) -> Self {
        Self {
            id,
            identity,
            control: Control::Controlled,
            lifecycle: Lifecycle::Live,
            geometry: WindowGeometry::default(),
            mapped: false,
            minimized: false,
            hidden: false,
            ready_for_painting: false,
            flags: WindowFlags::default(),
            maximize: MaximizeState::NONE,
            requested_maximize: MaximizeState::NONE,
            quick_tile: QuickTile::None,
            desktops: Desktops::all(),
            parent: None,
            children: HashSet::new(),
            group: None,
            layer: None,
            layer_dirty: true,
            user_time: None,
            rules: RuleSnapshot::default(),
            shortcut: None,
            fsp_level: FspLevel::default(),
        }
    }

    /// `modal implies transient`: a modal window with no parent is invalid
    /// and must never be constructed.
    pub fn is_valid_modal(&self) -> bool {
        !self.flags.modal || self.parent.is_some()
    }

    pub fn is_transient(&self) -> bool {
        self.parent.is_some()
    }

    pub fn is_modal(&self) -> bool {
        self.flags.modal && self.parent.is_some()
    }

    /// The most recent user-time reported across every member of this
    /// window's client group, the fallback FSP consults when a window maps
    /// with no user-time of its own (SPEC_FULL.md §10.4, grounded on
    /// `focus_stealing.h`'s "user-time of −1 forces the decision to use the
    /// window's group user-time").
    pub fn group_user_time<'a>(&self, siblings: impl Iterator<Item = &'a Window>) -> Option<u32> {
        let group = self.group?;
        siblings
            .filter(|w| w.group == Some(group))
            .filter_map(|w| w.user_time)
            .max()
    }

    pub fn is_on_current(&self, current: usize) -> bool {
        self.desktops.contains(current)
    }

    pub fn is_shown(&self) -> bool {
        self.mapped && !self.minimized && !self.hidden && self.lifecycle == Lifecycle::Live
    }

    pub fn wants_tab_focus(&self) -> bool {
        self.is_shown() && self.control == Control::Controlled && !self.flags.skip_switcher
    }

    /// `frame_rect = client_rect ⊕ decoration_margins`, exposed for callers
    /// that need the margins currently in effect rather than re-deriving
    /// them from the decoration factory.
    pub fn decoration_margins(&self) -> (u32, u32, u32, u32) {
        let f = self.geometry.frame;
        let c = self.geometry.client;
        let left = c.x.saturating_sub(f.x);
        let top = c.y.saturating_sub(f.y);
        let right = (f.w.saturating_sub(left)).saturating_sub(c.w);
        let bottom = (f.h.saturating_sub(top)).saturating_sub(c.h);
        (left, top, right, bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_desktops_is_encoded_as_empty_set() {
        let d = Desktops::all();
        assert!(d.is_on_all());
        assert!(d.contains(0));
        assert!(d.contains(41));
    }

    #[test]
    fn one_desktop_only_contains_itself() {
        let d = Desktops::one(2);
        assert!(!d.is_on_all());
        assert!(d.contains(2));
        assert!(!d.contains(3));
    }

    #[test]
    fn modal_without_parent_is_invalid() {
        let mut w = Window::new(WinId::from(1), WindowIdentity::default());
        assert!(w.is_valid_modal());
        w.flags.modal = true;
        assert!(!w.is_valid_modal());
        w.parent = Some(WinId::from(2));
        assert!(w.is_valid_modal());
    }
}
