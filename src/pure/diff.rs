//! A diff of changes to pure state, the sole path by which observable
//! notifications are derived (SPEC_FULL.md §10.2): every mutating operation
//! runs against a snapshot taken before and after, and emission walks the
//! diff rather than being interleaved with the mutation itself.
use crate::{
    pure::window::{MaximizeState, Window},
    WinId,
};
use std::collections::HashMap;

/// A cheap, comparable summary of one window's observable fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct WindowState {
    pub mapped: bool,
    pub desktops: Vec<usize>,
    pub maximize: MaximizeState,
    pub fullscreen: bool,
    pub skip_taskbar: bool,
    pub demands_attention: bool,
    pub minimized: bool,
}

impl From<&Window> for WindowState {
    fn from(w: &Window) -> Self {
        let mut desktops: Vec<usize> = w.desktops.ids().copied().collect();
        desktops.sort_unstable();

        Self {
            mapped: w.mapped,
            desktops,
            maximize: w.maximize,
            fullscreen: w.flags.fullscreen,
            skip_taskbar: w.flags.skip_taskbar,
            demands_attention: w.flags.demands_attention,
            minimized: w.minimized,
        }
    }
}

/// A full before/after-comparable view of the `Space`, built cheaply from
/// the live window table plus the handful of global fields that also carry
/// their own change notifications.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub active: Option<WinId>,
    pub stacking_order: Vec<WinId>,
    pub current_subspace: usize,
    pub subspace_count: usize,
    pub showing_desktop: bool,
    pub windows: HashMap<WinId, WindowState>,
}

impl Snapshot {
    pub(crate) fn has_window(&self, id: WinId) -> bool {
        self.windows.contains_key(&id)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Diff {
    pub before: Snapshot,
    pub after: Snapshot,
}

impl Diff {
    pub fn new(before: Snapshot, after: Snapshot) -> Self {
        Self { before, after }
    }

    pub fn update(&mut self, after: Snapshot) {
        self.before = std::mem::take(&mut self.after);
        self.after = after;
    }

    pub fn active_changed(&self) -> bool {
        self.before.active != self.after.active
    }

    pub fn new_windows(&self) -> impl Iterator<Item = WinId> + '_ {
        self.after
            .windows
            .keys()
            .copied()
            .filter(move |id| !self.before.has_window(*id))
    }

    pub fn closed_windows(&self) -> impl Iterator<Item = WinId> + '_ {
        self.before
            .windows
            .keys()
            .copied()
            .filter(move |id| !self.after.has_window(*id))
    }

    fn field_changed(&self, id: WinId, f: impl Fn(&WindowState) -> bool) -> bool {
        let before = self.before.windows.get(&id).map(&f).unwrap_or(false);
        let after = self.after.windows.get(&id).map(&f).unwrap_or(false);
        before != after
    }

    pub fn desktops_changed(&self, id: WinId) -> bool {
        let before = self.before.windows.get(&id).map(|w| &w.desktops);
        let after = self.after.windows.get(&id).map(|w| &w.desktops);
        before != after
    }

    pub fn maximized_state_changed(&self, id: WinId) -> bool {
        let before = self.before.windows.get(&id).map(|w| w.maximize);
        let after = self.after.windows.get(&id).map(|w| w.maximize);
        before != after
    }

    pub fn fullscreen_changed(&self, id: WinId) -> bool {
        self.field_changed(id, |w| w.fullscreen)
    }

    pub fn skip_taskbar_changed(&self, id: WinId) -> bool {
        self.field_changed(id, |w| w.skip_taskbar)
    }

    pub fn demands_attention_changed(&self, id: WinId) -> bool {
        self.field_changed(id, |w| w.demands_attention)
    }

    pub fn minimized_changed(&self, id: WinId) -> bool {
        self.field_changed(id, |w| w.minimized)
    }

    pub fn stacking_order_changed(&self) -> bool {
        self.before.stacking_order != self.after.stacking_order
    }

    pub fn current_subspace_changed(&self) -> bool {
        self.before.current_subspace != self.after.current_subspace
    }

    pub fn subspace_created(&self) -> bool {
        self.after.subspace_count > self.before.subspace_count
    }

    pub fn subspace_removed(&self) -> bool {
        self.after.subspace_count < self.before.subspace_count
    }

    pub fn showing_desktop_changed(&self) -> bool {
        self.before.showing_desktop != self.after.showing_desktop
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.before == self.after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn win(id: u32) -> Window {
        Window::new(WinId::from(id), Default::default())
    }

    fn snapshot(windows: &[&Window]) -> Snapshot {
        Snapshot {
            active: windows.first().map(|w| w.id),
            stacking_order: windows.iter().map(|w| w.id).collect(),
            current_subspace: 0,
            subspace_count: 1,
            showing_desktop: false,
            windows: windows.iter().map(|w| (w.id, WindowState::from(*w))).collect(),
        }
    }

    #[test]
    fn diff_of_identical_snapshots_is_empty() {
        let w = win(1);
        let s = snapshot(&[&w]);
        let diff = Diff::new(s.clone(), s);
        assert!(diff.is_empty());
    }

    #[test]
    fn new_window_is_reported() {
        let w1 = win(1);
        let w2 = win(2);
        let before = snapshot(&[&w1]);
        let after = snapshot(&[&w1, &w2]);
        let diff = Diff::new(before, after);
        assert!(diff.new_windows().any(|id| id == w2.id));
    }

    #[test]
    fn closed_window_is_reported() {
        let w1 = win(1);
        let w2 = win(2);
        let before = snapshot(&[&w1, &w2]);
        let after = snapshot(&[&w1]);
        let diff = Diff::new(before, after);
        assert!(diff.closed_windows().any(|id| id == w2.id));
    }

    #[test]
    fn maximize_change_is_detected_per_window() {
        let mut w1 = win(1);
        let before = snapshot(&[&w1]);
        w1.maximize = MaximizeState::FULL;
        let after = snapshot(&[&w1]);
        let diff = Diff::new(before, after);
        assert!(diff.maximized_state_changed(w1.id));
        assert!(!diff.fullscreen_changed(w1.id));
    }
}
