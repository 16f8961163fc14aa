//! The top-level coordinator (§4.I): owns every other component, exposes
//! the single [`Space::event`] entry point the event loop calls for every
//! decoded [`BackendEvent`], and implements the handful of operations that
//! cut across more than one component (`activate_window`,
//! `send_to_desktop`, `update_client_area`, the show-desktop toggle).
use crate::{
    backend::{event::BackendEvent, Backend, BackendExt},
    core::{
        bindings::MouseEventKind,
        filter::FilterChain,
        hooks::Hooks,
    },
    pure::{
        focus::{ChainChange, FspLevel},
        geometry::Point,
        move_resize::{Contact, MoveResize},
        rules::RuleBook,
        screen::Screen,
        screen_edge::{Border, EdgeConfig, ScreenEdge, Trigger},
        stacking::StackingOrder,
        subspace::SubspaceManager,
        window::{Desktops, Window},
        Diff, FocusChain,
    },
    Error, Result, WinId,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// A set of windows that share taskbar/grouping identity (e.g. every
/// window opened by the same application instance). Membership is opaque
/// beyond the id the backend reports via `WM_CLIENT_LEADER`/group atoms;
/// `Window::group` carries the id a window belongs to, if any.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub id: u64,
    pub members: HashSet<WinId>,
}

/// The top-level window-management state. Generic over the backend so it
/// can be driven identically against either an X11 or a Wayland
/// implementation (and, in tests, [`crate::backend::MockBackend`]).
pub struct Space<B: Backend> {
    pub(crate) windows: HashMap<WinId, Window>,
    pub(crate) stacking: StackingOrder,
    /// The last computed, fully layered render order (§4.D); recomputed
    /// whenever any window's layer-affecting state changes.
    pub(crate) stacking_cache: Vec<WinId>,
    pub(crate) subspaces: SubspaceManager,
    pub(crate) focus: FocusChain,
    pub(crate) active: Option<WinId>,
    pub(crate) move_resize: Option<MoveResize>,
    pub(crate) screens: Vec<Screen>,
    pub(crate) edges: Vec<ScreenEdge>,
    pub(crate) edge_config: EdgeConfig,
    pub(crate) rules: RuleBook,
    pub(crate) groups: HashMap<u64, Group>,
    pub(crate) showing_desktop: bool,
    /// Windows the backend currently reports as mapped, tracked here so
    /// `BackendExt::hide` can skip redundant unmaps.
    pub(crate) mapped: HashSet<WinId>,
    /// Unmap events we caused ourselves via `BackendExt::hide`, counted so
    /// they can be told apart from a client-initiated withdrawal.
    pub(crate) pending_unmap: HashMap<WinId, usize>,
    pub(crate) filters: FilterChain<B>,
    pub(crate) hooks: Hooks<B>,
    diff: Diff,
    /// Set once a geometry or subspace-layout change has happened that
    /// should eventually debounce a rule-book or layout write-back. No
    /// actual timer fires here; the event loop owns wall-clock scheduling
    /// and calls `take_dirty_rules`/`take_dirty_layout` on its own cadence.
    rules_dirty: bool,
    layout_dirty: bool,
}

impl<B: Backend> Default for Space<B> {
    fn default() -> Self {
        Self {
            windows: HashMap::new(),
            stacking: StackingOrder::new(),
            stacking_cache: Vec::new(),
            subspaces: SubspaceManager::default(),
            focus: FocusChain::new(),
            active: None,
            move_resize: None,
            screens: Vec::new(),
            edges: Vec::new(),
            edge_config: EdgeConfig::default(),
            rules: RuleBook::default(),
            groups: HashMap::new(),
            showing_desktop: false,
            mapped: HashSet::new(),
            pending_unmap: HashMap::new(),
            filters: FilterChain::new(),
            hooks: Vec::new(),
            diff: Diff::default(),
            rules_dirty: false,
            layout_dirty: false,
        }
    }
}

impl<B: Backend> Space<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: RuleBook) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn push_filter(&mut self, filter: Box<dyn crate::core::filter::InputFilter<B>>) {
        self.filters.push(filter);
    }

    pub fn push_hook(&mut self, hook: Box<dyn crate::core::hooks::Hook<B>>) {
        self.hooks.push(hook);
    }

    pub fn window(&self, id: WinId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn active(&self) -> Option<WinId> {
        self.active
    }

    pub fn client_list(&self) -> Vec<WinId> {
        self.windows.keys().copied().collect()
    }

    pub fn stacking_list(&self) -> &[WinId] {
        &self.stacking_cache
    }

    pub fn current_subspace(&self) -> usize {
        self.subspaces.current()
    }

    /// Run the full startup sequence: discover existing clients, manage
    /// each of them, size the screens, and call every hook's `startup`.
    pub fn startup(&mut self, backend: &B) -> Result<()> {
        let geometries = backend.screen_details()?;
        self.screens = geometries
            .into_iter()
            .enumerate()
            .map(|(i, g)| Screen::new(i, g))
            .collect();

        for id in backend.existing_clients()? {
            let attrs = backend.get_window_attributes(id)?;
            if attrs.override_redirect {
                continue;
            }
            self.manage(backend, id)?;
        }
        self.recompute_stacking();

        let after = self.snapshot();
        self.diff.update(after);

        let mut hooks = std::mem::take(&mut self.hooks);
        for h in hooks.iter_mut() {
            h.startup(self)?;
        }
        self.hooks = hooks;
        Ok(())
    }

    /// The single entry point the event loop calls for every decoded
    /// event. Dispatches to the appropriate component, then derives and
    /// emits every observable notification from the resulting diff
    /// (SPEC_FULL.md §10.2): mutation and notification never interleave.
    pub fn event(&mut self, backend: &B, event: BackendEvent) -> Result<()> {
        trace!(%event, "dispatching event");
        self.dispatch(backend, event)?;

        let after = self.snapshot();
        self.diff.update(after);
        self.emit_notifications(backend)?;

        let mut hooks = std::mem::take(&mut self.hooks);
        for h in hooks.iter_mut() {
            h.event_handled(self)?;
        }
        self.hooks = hooks;
        Ok(())
    }

    fn dispatch(&mut self, backend: &B, event: BackendEvent) -> Result<()> {
        use BackendEvent::*;

        match event {
            MapRequest(id) => {
                let attrs = backend.get_window_attributes(id)?;
                if attrs.override_redirect {
                    trace!(?id, "skipping override-redirect window");
                    return Ok(());
                }
                self.manage(backend, id)?;
                self.recompute_stacking();
            }

            Destroy(id) => {
                self.unmanage(id);
                self.recompute_stacking();
            }

            UnmapNotify(id) => {
                match self.pending_unmap.get_mut(&id) {
                    Some(count) if *count > 0 => *count -= 1,
                    _ => {
                        self.unmanage(id);
                        self.recompute_stacking();
                    }
                }
            }

            ConfigureRequest(cfg) if !cfg.is_root => {
                self.set_frame_geometry(backend, cfg.id, cfg.r)?;
            }
            ConfigureRequest(_) => {}

            ConfigureNotify(cfg) if cfg.is_root => {
                self.refresh_screens(backend)?;
            }
            ConfigureNotify(_) => {}

            FocusIn(id) => {
                self.activate_window(backend, id, false)?;
            }

            KeyPress(code) => {
                self.filters.key(self, backend, code)?;
            }
            KeyRelease(_) => {}

            MouseEvent(e) => match e.kind {
                MouseEventKind::Press => {
                    self.filters.pointer_button(self, backend, &e)?;
                }
                MouseEventKind::Release => {
                    self.filters.pointer_button(self, backend, &e)?;
                }
                MouseEventKind::Motion => {
                    self.check_screen_edges(backend, e.rpt)?;
                    self.filters.pointer_motion(self, backend, &e)?;
                }
            },

            PointerAxis { horizontal, vertical } => {
                self.filters.pointer_axis(self, backend, horizontal, vertical)?;
            }

            TouchDown(t) => {
                self.filters.touch_down(self, backend, t.slot)?;
            }
            TouchMotion(t) => {
                self.filters.touch_motion(self, backend, t.slot)?;
            }
            TouchUp { slot } => {
                self.filters.touch_up(self, backend, slot)?;
            }

            SwipeBegin { fingers } => {
                self.filters.swipe_begin(self, backend, fingers)?;
            }
            SwipeUpdate(u) => {
                self.filters.swipe_update(self, backend, u.delta_x, u.delta_y)?;
            }
            SwipeEnd => {
                self.filters.swipe_end(self, backend)?;
            }
            SwipeCancel => {
                self.subspaces.swipe_cancel();
                self.filters.swipe_cancel(self, backend)?;
            }

            PinchBegin { fingers } => {
                self.filters.pinch_begin(self, backend, fingers)?;
            }
            PinchUpdate(u) => {
                self.filters.pinch_update(self, backend, u.scale, u.rotation)?;
            }
            PinchEnd => {
                self.filters.pinch_end(self, backend)?;
            }
            PinchCancel => {
                self.filters.pinch_cancel(self, backend)?;
            }

            ScreenChange | RandrNotify => {
                self.refresh_screens(backend)?;
            }

            Pong(id, serial) => {
                trace!(?id, serial, "client answered liveness ping");
            }

            Enter(_) | Leave(_) | Expose(_) | PropertyNotify(_) | MappingNotify | ClientMessage(_) => {
                trace!(%event, "event has no space-level handling beyond hooks");
            }
        }

        Ok(())
    }

    fn snapshot(&self) -> crate::pure::Snapshot {
        crate::pure::Snapshot {
            active: self.active,
            stacking_order: self.stacking_cache.clone(),
            current_subspace: self.subspaces.current(),
            subspace_count: self.subspaces.count(),
            showing_desktop: self.showing_desktop,
            windows: self
                .windows
                .iter()
                .map(|(&id, w)| (id, crate::pure::WindowState::from(w)))
                .collect(),
        }
    }

    fn emit_notifications(&mut self, backend: &B) -> Result<()> {
        let before = self.diff.before.clone();
        let after = self.diff.after.clone();

        let mut hooks = std::mem::take(&mut self.hooks);

        for id in after.windows.keys() {
            if !before.has_window(*id) {
                for h in hooks.iter_mut() {
                    h.client_added(self, *id)?;
                }
            }
        }
        for id in before.windows.keys() {
            if !after.has_window(*id) {
                for h in hooks.iter_mut() {
                    h.client_removed(self, *id)?;
                }
            }
        }

        if self.diff.active_changed() {
            let active = self.active;
            for h in hooks.iter_mut() {
                h.active_changed(self, active)?;
            }
        }

        for id in after.windows.keys().copied().collect::<Vec<_>>() {
            if !before.has_window(id) {
                continue;
            }
            if self.diff.desktops_changed(id) {
                for h in hooks.iter_mut() {
                    h.desktops_changed(self, id)?;
                }
            }
            if self.diff.maximized_state_changed(id) {
                for h in hooks.iter_mut() {
                    h.maximized_state_changed(self, id)?;
                }
            }
            if self.diff.fullscreen_changed(id) {
                let fullscreen = after.windows.get(&id).map(|w| w.fullscreen).unwrap_or(false);
                for h in hooks.iter_mut() {
                    h.fullscreen_changed(self, id, fullscreen)?;
                }
            }
            if self.diff.skip_taskbar_changed(id) {
                let skip = after.windows.get(&id).map(|w| w.skip_taskbar).unwrap_or(false);
                for h in hooks.iter_mut() {
                    h.skip_taskbar_changed(self, id, skip)?;
                }
            }
            if self.diff.demands_attention_changed(id) {
                let demands = after.windows.get(&id).map(|w| w.demands_attention).unwrap_or(false);
                for h in hooks.iter_mut() {
                    h.demands_attention_changed(self, id, demands)?;
                }
            }
            if self.diff.minimized_changed(id) {
                let minimized = after.windows.get(&id).map(|w| w.minimized).unwrap_or(false);
                for h in hooks.iter_mut() {
                    h.minimized_changed(self, id, minimized)?;
                }
            }
        }

        if self.diff.current_subspace_changed() {
            let (prev, cur) = (before.current_subspace, after.current_subspace);
            for h in hooks.iter_mut() {
                h.current_subspace_changed(self, prev, cur)?;
            }
        }
        if self.diff.subspace_created() {
            let index = after.subspace_count.saturating_sub(1);
            for h in hooks.iter_mut() {
                h.subspace_created(self, index)?;
            }
        }
        if self.diff.subspace_removed() {
            let index = before.subspace_count.saturating_sub(1);
            for h in hooks.iter_mut() {
                h.subspace_removed(self, index)?;
            }
        }
        if self.diff.showing_desktop_changed() {
            let showing = after.showing_desktop;
            for h in hooks.iter_mut() {
                h.showing_desktop_changed(self, showing)?;
            }
        }

        self.hooks = hooks;
        backend.flush();
        Ok(())
    }

    /// Recompute the layered stacking order and push it down to the
    /// backend as a single bottom-to-top restack.
    pub(crate) fn recompute_stacking(&mut self) {
        self.stacking_cache = self.stacking.restack(&self.windows);
    }

    fn refresh_screens(&mut self, backend: &B) -> Result<()> {
        let geometries = backend.screen_details()?;
        self.screens = geometries
            .iter()
            .enumerate()
            .map(|(i, &g)| Screen::new(i, g))
            .collect();

        let mut hooks = std::mem::take(&mut self.hooks);
        for h in hooks.iter_mut() {
            h.screens_updated(self, &geometries)?;
        }
        self.hooks = hooks;
        Ok(())
    }

    /// Recompute each screen's usable work area from currently reserved
    /// panel struts. Simplified to "whatever a caller already set on
    /// `Screen::work_area`" plus edge reservations; struts themselves are
    /// a backend-side property the manage step does not yet consume.
    pub fn update_client_area(&mut self) {
        for screen in &mut self.screens {
            screen.work_area = screen.geometry;
        }
        self.layout_dirty = true;
    }

    /// Whether the rule book has changed since the last write-back and
    /// should now be persisted; clears the flag.
    pub fn take_dirty_rules(&mut self) -> bool {
        std::mem::take(&mut self.rules_dirty)
    }

    pub fn take_dirty_layout(&mut self) -> bool {
        std::mem::take(&mut self.layout_dirty)
    }

    /// Request focus for `id`, applying the two-sided focus-stealing
    /// prevention comparison (SPEC_FULL.md §10.1) against whichever window
    /// is currently active. `force` bypasses FSP entirely (used for
    /// WM-internal activation, e.g. a window the user just clicked on via
    /// the decoration).
    pub fn activate_window(&mut self, backend: &B, id: WinId, force: bool) -> Result<()> {
        let Some(window) = self.windows.get(&id) else {
            return Err(Error::UnknownClient(id));
        };
        if !window.is_shown() {
            self.focus.push_should_get_focus(id);
            return Ok(());
        }

        if !force {
            let requesting_level = window.fsp_level;
            let requesting_group = window.group;
            let requesting_user_time = window.user_time.or_else(|| window.group_user_time(self.windows.values()));
            let active_window = self.active.and_then(|a| self.windows.get(&a));
            let active_protection = active_window.map(|w| w.fsp_level).unwrap_or(FspLevel::None);
            let active_user_time = active_window
                .and_then(|w| w.user_time.or_else(|| w.group_user_time(self.windows.values())));
            let same_group = requesting_group.is_some() && requesting_group == active_window.and_then(|w| w.group);

            if !crate::pure::focus::fsp_allows(
                requesting_level,
                active_protection,
                same_group,
                requesting_user_time,
                active_user_time,
            ) {
                self.focus.push_should_get_focus(id);
                if let Some(w) = self.windows.get_mut(&id) {
                    w.flags.demands_attention = true;
                }
                debug!(?id, "activation denied by focus-stealing prevention");
                return Ok(());
            }
        }

        self.active = Some(id);
        self.focus.drop_should_get_focus(id);

        let subspaces: Vec<usize> = match self.windows.get(&id) {
            Some(w) if w.desktops.is_on_all() => (0..self.subspaces.count()).collect(),
            Some(w) => w.desktops.ids().copied().collect(),
            None => vec![],
        };
        self.focus.update(id, &subspaces, ChainChange::MakeFirst);

        self.stacking.raise(id);
        self.recompute_stacking();
        backend.focus(id)?;
        Ok(())
    }

    /// Deactivate `id` if it is currently active, offering focus to the
    /// next window in the focus chain per the next-focus selection order
    /// (§4.E): same-subspace MRU first, then the global MRU.
    pub fn deactivate(&mut self, backend: &B, id: WinId) -> Result<()> {
        if self.active != Some(id) {
            return Ok(());
        }
        self.active = None;

        let current = self.subspaces.current();
        let next = self
            .focus
            .next_for_subspace(current, Some(id))
            .or_else(|| self.focus.next_global(Some(id)));

        if let Some(next) = next {
            self.activate_window(backend, next, true)?;
        }
        Ok(())
    }

    /// Move a window onto a different desktop set and, if it is the
    /// active window and the target does not include the current
    /// subspace, hand focus to whatever the chain offers next.
    pub fn send_to_desktop(&mut self, backend: &B, id: WinId, desktops: crate::pure::window::Desktops) -> Result<()> {
        let still_visible = desktops.contains(self.subspaces.current());
        self.set_desktops(id, desktops)?;
        if !still_visible && self.active == Some(id) {
            self.deactivate(backend, id)?;
        }
        Ok(())
    }

    /// Switch the current subspace, discrete jump (not a swipe).
    pub fn set_current_subspace(&mut self, id: usize) -> bool {
        self.subspaces.set_current(id)
    }

    /// Insert a new subspace at `position` (`None` appends at the end),
    /// clamping out-of-range positions to `[0, len]` per spec.md §8's
    /// boundary property, and shifting every existing window's desktop ids
    /// at or after the insertion point up by one so they keep tracking the
    /// same logical subspace. Returns the new subspace's id.
    pub fn create_subspace(&mut self, position: Option<usize>, name: Option<String>) -> usize {
        let position = position.unwrap_or_else(|| self.subspaces.count());
        let id = self.subspaces.create(position, name);

        for w in self.windows.values_mut() {
            if w.desktops.is_on_all() {
                continue;
            }
            let shifted: HashSet<usize> = w
                .desktops
                .ids()
                .map(|&d| if d >= id { d + 1 } else { d })
                .collect();
            w.desktops = Desktops::from_set(shifted);
        }

        id
    }

    /// Remove a subspace. Any window exclusively on it is reassigned first
    /// (to the current subspace, or its western neighbour if the removed
    /// one *is* current), then every other window's desktop ids are
    /// reindexed down by one to track the renumbering
    /// `SubspaceManager::remove` performs on every subsequent subspace.
    pub fn remove_subspace(&mut self, id: usize) -> Result<()> {
        let current = self.subspaces.current();
        let fallback = if id == current {
            self.subspaces.west_of(id).unwrap_or(0)
        } else {
            current
        };

        for w in self.windows.values_mut() {
            if !w.desktops.is_on_all() && w.desktops.contains(id) && w.desktops.ids().count() == 1 {
                w.desktops = Desktops::one(fallback);
            }
        }

        self.subspaces.remove(id)?;

        for w in self.windows.values_mut() {
            if w.desktops.is_on_all() {
                continue;
            }
            let shifted: HashSet<usize> = w
                .desktops
                .ids()
                .map(|&d| if d > id { d - 1 } else { d })
                .collect();
            w.desktops = Desktops::from_set(shifted);
        }

        Ok(())
    }

    /// Grow or shrink to exactly `count` subspaces, reassigning orphaned
    /// windows the same way `remove_subspace` does when shrinking.
    pub fn set_subspace_count(&mut self, count: usize) -> Result<()> {
        if count >= self.subspaces.count() {
            return self.subspaces.set_count(count);
        }
        while self.subspaces.count() > count {
            self.remove_subspace(self.subspaces.count() - 1)?;
        }
        Ok(())
    }

    pub fn set_subspace_rows(&mut self, rows: usize) {
        self.subspaces.set_rows(rows);
    }

    /// Discrete directional navigation (a keybinding, not a swipe): moves
    /// to the neighbouring subspace in the grid, wrapping at the edges.
    /// Returns `false` if the move was a no-op (already at that neighbour).
    pub fn navigate_subspace(&mut self, direction: crate::pure::RelativePosition) -> bool {
        use crate::pure::RelativePosition::*;

        let current = self.subspaces.current();
        let target = match direction {
            Left => self.subspaces.west_of(current),
            Right => self.subspaces.east_of(current),
            Above => self.subspaces.north_of(current),
            Below => self.subspaces.south_of(current),
        };
        target.is_some_and(|t| self.subspaces.set_current(t))
    }

    /// Toggle "show desktop": minimize every shown window (without
    /// clearing their own `minimized` flag) until toggled back off.
    pub fn set_showing_desktop(&mut self, backend: &B, showing: bool) -> Result<()> {
        if showing == self.showing_desktop {
            return Ok(());
        }
        self.showing_desktop = showing;

        let ids: Vec<WinId> = self.windows.keys().copied().collect();
        for id in ids {
            let should_hide = showing && self.windows.get(&id).is_some_and(|w| w.is_shown());
            if should_hide {
                backend.hide(id, &mut self.mapped, &mut self.pending_unmap)?;
            } else if !showing && self.windows.get(&id).is_some_and(|w| !w.minimized) {
                backend.reveal(id, &mut self.mapped)?;
            }
        }
        Ok(())
    }

    /// Start an interactive move/resize grab on `id`. Refuses if another
    /// window is already mid-drag, if the window is fullscreen and the
    /// contact requests a resize, or if rules forbid it outright.
    pub fn start_move_resize(
        &mut self,
        id: WinId,
        contact: Contact,
        grab_point: Point,
        unrestricted: bool,
    ) -> std::result::Result<(), crate::pure::move_resize::StartRefusal> {
        use crate::pure::move_resize::StartRefusal;

        if self.move_resize.is_some() {
            return Err(StartRefusal::AlreadyInProgress);
        }
        let Some(window) = self.windows.get(&id) else {
            return Err(StartRefusal::ForbiddenByRule);
        };
        if window.flags.fullscreen && contact.is_resize() {
            return Err(StartRefusal::FullscreenResize);
        }

        let start_screen = self.screen_for_window(id).map(|s| s.index).unwrap_or(0);
        self.move_resize = Some(MoveResize::start(
            id,
            contact,
            grab_point,
            window.geometry.frame,
            start_screen,
            unrestricted,
        ));
        Ok(())
    }

    pub fn step_move_resize(&mut self, backend: &B, pointer: Point) -> Result<()> {
        let Some(mr) = &mut self.move_resize else {
            return Ok(());
        };
        let candidate = mr.candidate_geometry(pointer);
        let id = mr.window;

        let screen = self
            .screens
            .iter()
            .find(|s| s.index == mr.start_screen)
            .cloned()
            .unwrap_or(Screen::new(0, candidate));
        let others: Vec<crate::pure::geometry::Rect> = self
            .windows
            .values()
            .filter(|w| w.id != id && w.is_shown())
            .map(|w| w.geometry.frame)
            .collect();

        let snapped = crate::pure::move_resize::snap_to_edges(candidate, &others, &screen, 10);
        let clamped = crate::pure::move_resize::clamp_to_screen(snapped, &screen, mr.unrestricted);

        mr.geometry = clamped;
        mr.button_down = false;

        if let Some(w) = self.windows.get_mut(&id) {
            w.geometry.frame = clamped;
            w.geometry.client = clamped;
        }
        backend.position_client(id, clamped)?;
        Ok(())
    }

    pub fn finish_move_resize(&mut self, backend: &B) -> Result<()> {
        let Some(mr) = self.move_resize.take() else {
            return Ok(());
        };
        backend.position_client(mr.window, mr.geometry)?;
        if let Some(w) = self.windows.get_mut(&mr.window) {
            w.quick_tile = crate::pure::window::QuickTile::None;
        }
        Ok(())
    }

    /// Abort an in-progress move/resize, restoring the window to its
    /// geometry at grab start.
    pub fn cancel_move_resize(&mut self) {
        if let Some(mr) = self.move_resize.take() {
            if let Some(w) = self.windows.get_mut(&mr.window) {
                w.geometry.frame = mr.initial_geometry;
                w.geometry.client = mr.initial_geometry;
            }
        }
    }

    /// Register a reserved screen edge (electric border or touch edge).
    pub fn reserve_edge(&mut self, border: Border, edge: ScreenEdge) {
        self.edges.retain(|e| e.border != border);
        self.edges.push(edge);
    }

    fn check_screen_edges(&mut self, backend: &B, pointer: Point) -> Result<()> {
        if backend.effects_active_fullscreen() && !self.edge_config.remain_active_on_fullscreen {
            return Ok(());
        }

        let now = std::time::Instant::now();
        let cfg = self.edge_config;
        for i in 0..self.edges.len() {
            if !self.edges[i].geometry.contains_point(pointer) {
                continue;
            }
            match self.edges[i].on_pointer_enter(now, &cfg) {
                Trigger::Fire => {
                    let action = self.edges[i].pointer_action;
                    let reveals = self.edges[i].reveals;
                    self.run_edge_action(backend, action, reveals)?;
                }
                Trigger::PushedBack(px) => {
                    let target = push_back_point(pointer, self.edges[i].border, px);
                    backend.warp_pointer(target)?;
                }
                Trigger::Suppressed => {}
            }
        }
        Ok(())
    }

    fn run_edge_action(
        &mut self,
        backend: &B,
        action: crate::pure::screen_edge::EdgeAction,
        reveals: Option<WinId>,
    ) -> Result<()> {
        use crate::pure::screen_edge::EdgeAction;

        if let Some(id) = reveals {
            return self.activate_window(backend, id, true);
        }
        match action {
            EdgeAction::ShowDesktop => self.set_showing_desktop(backend, !self.showing_desktop),
            EdgeAction::None | EdgeAction::LockScreen | EdgeAction::KRunner | EdgeAction::ApplicationLauncher => {
                warn!(?action, "edge action has no in-core effect; left to the backend to run");
                Ok(())
            }
        }
    }
}

fn push_back_point(p: Point, border: Border, by: u32) -> Point {
    match border {
        Border::Left => Point::new(p.x + by, p.y),
        Border::Right => Point::new(p.x.saturating_sub(by), p.y),
        Border::Top => Point::new(p.x, p.y + by),
        Border::Bottom => Point::new(p.x, p.y.saturating_sub(by)),
        Border::TopLeft => Point::new(p.x + by, p.y + by),
        Border::TopRight => Point::new(p.x.saturating_sub(by), p.y + by),
        Border::BottomLeft => Point::new(p.x + by, p.y.saturating_sub(by)),
        Border::BottomRight => Point::new(p.x.saturating_sub(by), p.y.saturating_sub(by)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;

    struct TestBackend;
    impl MockBackend for TestBackend {}

    #[test]
    fn new_space_has_one_subspace_and_no_active_window() {
        let space: Space<TestBackend> = Space::new();
        assert_eq!(space.current_subspace(), 0);
        assert_eq!(space.active(), None);
        assert!(space.client_list().is_empty());
    }

    #[test]
    fn set_current_subspace_reports_change() {
        let mut space: Space<TestBackend> = Space::new();
        space.subspaces.set_count(3).unwrap();
        assert!(space.set_current_subspace(1));
        assert_eq!(space.current_subspace(), 1);
        assert!(!space.set_current_subspace(1));
    }
}
