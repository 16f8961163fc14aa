//! The manage step (§4.A): turning a raw `MapRequest`/adopted existing
//! client into a tracked [`Window`], plus the idempotent per-property
//! setters every later mutation (rule re-application, user shortcuts,
//! client requests) funnels through so rule-forced properties are
//! consistently rejected.
use crate::{
    backend::{
        atom::Atom,
        property::{Prop, WmState},
        Backend, BackendExt,
    },
    core::space::Space,
    pure::{
        rules::WindowAttrs,
        stacking::Layer,
        window::{Control, Desktops, MaximizeState, QuickTile, Window, WindowIdentity},
    },
    Result, WinId,
};
use tracing::{debug, trace};

impl<B: Backend> Space<B> {
    /// Run the full manage sequence against a window the backend has just
    /// reported (a `MapRequest` or one adopted at startup from
    /// `existing_clients`). Override-redirect windows are never managed:
    /// the caller is expected to have already filtered those out.
    pub(crate) fn manage(&mut self, backend: &B, id: WinId) -> Result<()> {
        if self.windows.contains_key(&id) {
            return Ok(());
        }

        trace!(?id, "beginning manage sequence");

        // 1. Embed: record the client under its stable id before touching
        // anything else, so a failure partway through still leaves a
        // recoverable entry rather than a half-constructed one nobody owns.
        let attrs = backend.get_window_attributes(id)?;
        let identity = self.read_initial_identity(backend, id, &attrs);
        let mut window = Window::new(id, identity);

        if let Some((class, name)) = &attrs.class {
            window.identity.resource_class = Some(class.clone());
            window.identity.resource_name = Some(name.clone());
        }

        // 2. Read initial properties already folded into `read_initial_identity`
        // above (title, class, role, pid), plus the _NET_WM_USER_TIME
        // timestamp focus-stealing prevention compares (§4.E, §10.4); left
        // `None` if the client never set one so the FSP decision falls
        // back to its group's most recent time.
        window.user_time = match backend.get_prop(id, Atom::NetWmUserTime.as_ref()) {
            Ok(Some(Prop::Cardinal(vals))) => vals.first().copied(),
            _ => None,
        };

        // 3. Consult the rule book. `ignore_temporary = true`: ForceTemporarily
        // rules that only apply after a window already exists never match
        // here, since nothing has been remembered about this client yet.
        let window_attrs = WindowAttrs {
            title: window.identity.title.clone(),
            resource_class: window.identity.resource_class.clone().unwrap_or_default(),
            resource_name: window.identity.resource_name.clone().unwrap_or_default(),
            role: window.identity.role.clone().unwrap_or_default(),
            machine: window.identity.machine.clone().unwrap_or_default(),
        };
        let resolution = self.rules.resolve(&window_attrs);
        window.rules = resolution.snapshot.clone();

        // 4. Compute the initial desktop set: a rule wins outright, else
        // the currently active subspace.
        window.desktops = match &resolution.desktops {
            Some(ids) => Desktops::from_set(ids.iter().copied().collect()),
            None => Desktops::one(self.subspaces.current()),
        };

        // 5. Decoration: ask the backend's decoration factory for the
        // frame margins this window will carry. A missing factory is not
        // fatal (§7): fall back to a borderless frame.
        let margins = match backend.create_decoration(id) {
            Ok(m) => m,
            Err(_) => Default::default(),
        };

        // 6. Geometry placement: honour the client's already-reported
        // buffer geometry, grown by the decoration margins, then let size
        // hints clip it.
        let client_rect = backend.client_geometry(id).unwrap_or_default();
        let frame = crate::pure::geometry::Rect {
            x: client_rect.x.saturating_sub(margins.left),
            y: client_rect.y.saturating_sub(margins.top),
            w: client_rect.w + margins.left + margins.right,
            h: client_rect.h + margins.top + margins.bottom,
        };
        window.geometry.client = client_rect;
        window.geometry.frame = frame;

        // 7. Resolve initial minimized state: never minimized at manage
        // time; a rule that wants a window to start minimized does so via
        // a later setter call, once the window is tracked.
        window.minimized = false;

        // 8. Resolve maximize from the rule book.
        window.maximize = MaximizeState {
            horizontal: resolution.maximize_horizontal.unwrap_or(false),
            vertical: resolution.maximize_vertical.unwrap_or(false),
        };
        window.requested_maximize = window.maximize;

        // 9. Fullscreen.
        window.flags.fullscreen = resolution.fullscreen.unwrap_or(false);

        // 10. Other flag bits the rule book can force.
        window.flags.skip_taskbar = resolution.skip_taskbar.unwrap_or(false);
        window.flags.no_border = resolution.no_border.unwrap_or(false);
        window.flags.keep_above = resolution.keep_above.unwrap_or(false);
        window.flags.keep_below = resolution.keep_below.unwrap_or(false);

        // 11. Compute the window's layer from the flags just resolved.
        window.layer = Some(initial_layer(&window));
        window.layer_dirty = false;

        // 12. Decide initial activation: a normal top-level window with no
        // explicit "don't activate" signal takes focus; transients never
        // steal it away from their parent outright (the focus chain's FSP
        // gate still applies on top of this).
        let should_activate = !window.flags.skip_taskbar && window.control == Control::Controlled;

        window.mapped = true;
        window.ready_for_painting = true;

        // 13. Insert into stacking order, focus chain, and publish.
        self.windows.insert(id, window);
        self.stacking.insert(id);
        self.focus.update(id, &self.window_desktop_ids(id), crate::pure::focus::ChainChange::Update);

        backend.set_wm_state(id, WmState::Normal)?;
        backend.position_client(id, frame)?;
        backend.map(id)?;

        if should_activate {
            self.activate_window(backend, id, false)?;
        }

        // 14. Discard any ApplyNow rules this resolution consumed.
        self.rules.apply_now_cleanup(resolution.apply_now_to_delete);

        debug!(?id, "window managed");
        Ok(())
    }

    fn read_initial_identity(&self, backend: &B, id: WinId, attrs: &crate::backend::property::WindowAttributes) -> WindowIdentity {
        WindowIdentity {
            client_id: u32::from(id) as u64,
            desktop_file: None,
            resource_class: attrs.class.as_ref().map(|(c, _)| c.clone()),
            resource_name: attrs.class.as_ref().map(|(_, n)| n.clone()),
            title: backend.window_title(id).unwrap_or_default(),
            role: None,
            machine: None,
            pid: backend.window_pid(id),
        }
    }

    fn window_desktop_ids(&self, id: WinId) -> Vec<usize> {
        match self.windows.get(&id) {
            Some(w) if w.desktops.is_on_all() => (0..self.subspaces.count()).collect(),
            Some(w) => w.desktops.ids().copied().collect(),
            None => vec![],
        }
    }

    /// Unmanage a window: the inverse of `manage`, run on `Destroy` or a
    /// client-initiated `UnmapNotify` that was not caused by our own
    /// `BackendExt::hide`.
    pub(crate) fn unmanage(&mut self, id: WinId) {
        self.windows.remove(&id);
        self.stacking.remove(id);
        self.focus.remove(id);
        if self.active == Some(id) {
            self.active = None;
        }
        if let Some(mr) = &self.move_resize {
            if mr.window == id {
                self.move_resize = None;
            }
        }
    }

    /// Move `id` to a new desktop set, rejecting the change outright if a
    /// rule currently forces desktop membership.
    pub fn set_desktops(&mut self, id: WinId, desktops: Desktops) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        if w.rules.forces_desktops {
            return Ok(());
        }
        w.desktops = desktops;
        Ok(())
    }

    pub fn set_minimized(&mut self, id: WinId, minimized: bool) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        w.minimized = minimized;
        if minimized {
            self.focus.update(id, &[], crate::pure::focus::ChainChange::MakeLast);
        }
        Ok(())
    }

    pub fn set_fullscreen(&mut self, backend: &B, id: WinId, fullscreen: bool) -> Result<()> {
        let screen_geometry = self.screen_for_window(id).map(|s| s.geometry);
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        if w.rules.forces_fullscreen {
            return Ok(());
        }
        if fullscreen == w.flags.fullscreen {
            return Ok(());
        }

        if fullscreen {
            w.geometry.fullscreen_restore = Some(w.geometry.frame);
            if let Some(g) = screen_geometry {
                w.geometry.frame = g;
                w.geometry.client = g;
            }
        } else if let Some(restore) = w.geometry.fullscreen_restore.take() {
            w.geometry.frame = restore;
            w.geometry.client = restore;
        }

        w.flags.fullscreen = fullscreen;
        w.layer_dirty = true;
        let frame = w.geometry.frame;
        backend.position_client(id, frame)?;
        Ok(())
    }

    /// Apply an orthogonal maximize request. `horizontal`/`vertical` are
    /// independent: a caller wanting only one axis passes the other
    /// unchanged from `Window::maximize`.
    pub fn set_maximize(&mut self, backend: &B, id: WinId, horizontal: bool, vertical: bool) -> Result<()> {
        let work_area = self.screen_for_window(id).map(|s| s.work_area);
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;

        let wants_horizontal = !w.rules.forces_maximize_horizontal && horizontal != w.maximize.horizontal;
        let wants_vertical = !w.rules.forces_maximize_vertical && vertical != w.maximize.vertical;
        if !wants_horizontal && !wants_vertical {
            return Ok(());
        }

        let was_maximized = w.maximize.is_full() || !w.maximize.is_none();
        if !was_maximized {
            w.geometry.restore = Some(w.geometry.frame);
        }

        if wants_horizontal {
            w.maximize.horizontal = horizontal;
        }
        if wants_vertical {
            w.maximize.vertical = vertical;
        }

        let target = if w.maximize.is_none() {
            w.geometry.restore.take().unwrap_or(w.geometry.frame)
        } else if let Some(work_area) = work_area {
            crate::pure::move_resize::maximize_target(
                w.maximize.horizontal,
                w.maximize.vertical,
                w.geometry.restore.unwrap_or(w.geometry.frame),
                work_area,
            )
        } else {
            w.geometry.frame
        };

        // Borderless-when-maximized: a fully maximized window loses its
        // decoration border unless the user explicitly asked to keep one.
        w.flags.no_border = w.maximize.is_full() && !w.flags.user_no_border;
        w.geometry.frame = target;
        w.geometry.client = target;
        backend.position_client(id, target)?;
        Ok(())
    }

    pub fn set_keep_above(&mut self, id: WinId, above: bool) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        if w.rules.forces_keep_above {
            return Ok(());
        }
        w.flags.keep_above = above;
        w.layer_dirty = true;
        Ok(())
    }

    pub fn set_keep_below(&mut self, id: WinId, below: bool) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        if w.rules.forces_keep_below {
            return Ok(());
        }
        w.flags.keep_below = below;
        w.layer_dirty = true;
        Ok(())
    }

    pub fn set_skip_taskbar(&mut self, id: WinId, skip: bool) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        if w.rules.forces_skip_taskbar {
            return Ok(());
        }
        w.flags.skip_taskbar = skip;
        Ok(())
    }

    pub fn set_skip_pager(&mut self, id: WinId, skip: bool) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        w.flags.skip_pager = skip;
        Ok(())
    }

    pub fn set_skip_switcher(&mut self, id: WinId, skip: bool) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        w.flags.skip_switcher = skip;
        Ok(())
    }

    pub fn set_demands_attention(&mut self, id: WinId, demands: bool) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        w.flags.demands_attention = demands;
        Ok(())
    }

    pub fn set_shortcut(&mut self, id: WinId, shortcut: Option<String>) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        w.shortcut = shortcut;
        Ok(())
    }

    /// Toggle the user's own "no border" override, independent of the
    /// borderless-when-maximized policy applied in `set_maximize`.
    pub fn set_no_border(&mut self, id: WinId, no_border: bool) -> Result<()> {
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        if w.rules.forces_no_border {
            return Ok(());
        }
        w.flags.user_no_border = no_border;
        w.flags.no_border = no_border || (w.maximize.is_full());
        Ok(())
    }

    /// Apply a client-requested frame geometry, honouring whatever size
    /// hints the backend currently reports. Blocked outright while the
    /// window is mid interactive move/resize so the two never race.
    pub fn set_frame_geometry(&mut self, backend: &B, id: WinId, r: crate::pure::geometry::Rect) -> Result<()> {
        if self.move_resize.as_ref().is_some_and(|mr| mr.window == id) {
            return Ok(());
        }
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;
        w.geometry.frame = r;
        w.geometry.client = r;
        backend.position_client(id, r)
    }

    /// Find which screen currently hosts a window's frame, by midpoint
    /// containment; falls back to screen 0 if the window sits on no known
    /// screen (e.g. a stale geometry right after an output is removed).
    pub(crate) fn screen_for_window(&self, id: WinId) -> Option<&crate::pure::screen::Screen> {
        let w = self.windows.get(&id)?;
        let p = w.geometry.frame.midpoint();
        self.screens
            .iter()
            .find(|s| s.contains(p))
            .or_else(|| self.screens.first())
    }
}

fn initial_layer(w: &Window) -> Layer {
    if w.flags.fullscreen {
        Layer::Active
    } else if w.flags.keep_above {
        Layer::Above
    } else if w.flags.keep_below {
        Layer::Below
    } else {
        Layer::Normal
    }
}

/// Retarget a quick-tile request to its geometry, or clear back to the
/// window's pre-tile geometry for `QuickTile::None`.
impl<B: Backend> Space<B> {
    pub fn set_quick_tile(&mut self, backend: &B, id: WinId, mode: QuickTile) -> Result<()> {
        let work_area = self.screen_for_window(id).map(|s| s.work_area);
        let w = self.windows.get_mut(&id).ok_or(crate::Error::UnknownClient(id))?;

        if mode == QuickTile::None {
            if let Some(restore) = w.geometry.quick_tile_restore.take() {
                w.geometry.frame = restore;
                w.geometry.client = restore;
            }
            if let Some(maximize) = w.geometry.quick_tile_maximize_restore.take() {
                w.maximize = maximize;
            }
            w.quick_tile = QuickTile::None;
            let frame = w.geometry.frame;
            return backend.position_client(id, frame);
        }

        let Some(work_area) = work_area else {
            return Ok(());
        };
        let Some(target) = crate::pure::move_resize::quick_tile_target(mode, work_area) else {
            return Ok(());
        };

        if w.quick_tile == QuickTile::None {
            w.geometry.quick_tile_restore = Some(w.geometry.frame);
            w.geometry.quick_tile_maximize_restore = Some(w.maximize);
        }
        w.quick_tile = mode;
        w.geometry.frame = target;
        w.geometry.client = target;
        if mode == QuickTile::Maximize {
            w.maximize = MaximizeState::FULL;
        }
        backend.position_client(id, target)
    }
}
