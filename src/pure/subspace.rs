//! The subspace (virtual desktop) manager: a single global list with one
//! shared "current" index across every screen, arranged in a rows x
//! columns grid for directional navigation and swipe-gesture switching.
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One virtual desktop. Carries only its own identity; window membership
/// lives on `Window::desktops` (§4.A), not here.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subspace {
    pub id: usize,
    pub name: String,
}

impl Subspace {
    fn named(id: usize) -> Self {
        Self {
            id,
            name: format!("Desktop {}", id + 1),
        }
    }
}

/// Progress of an in-flight continuous swipe gesture, expressed as a
/// fraction of one subspace width/height. Committed once `|offset| >=
/// COMMIT_THRESHOLD`; reset to zero (and `current_changing_cancelled`
/// emitted) if the gesture ends before crossing it.
pub const SWIPE_COMMIT_THRESHOLD: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeProgress {
    pub target: usize,
    pub offset: f64,
}

/// The subspace manager.
#[derive(Debug, Clone)]
pub struct SubspaceManager {
    subspaces: Vec<Subspace>,
    current: usize,
    rows: usize,
    swipe: Option<SwipeProgress>,
}

impl Default for SubspaceManager {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl SubspaceManager {
    /// `count` is clamped to at least 1; `rows` is clamped to `[1, count]`.
    pub fn new(count: usize, rows: usize) -> Self {
        let count = count.max(1);
        let subspaces = (0..count).map(Subspace::named).collect();
        Self {
            subspaces,
            current: 0,
            rows: rows.clamp(1, count),
            swipe: None,
        }
    }

    pub fn subspaces(&self) -> &[Subspace] {
        &self.subspaces
    }

    pub fn count(&self) -> usize {
        self.subspaces.len()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.count().div_ceil(self.rows)
    }

    /// Insert a new subspace at `position`, clamped to `[0, len]` (so both
    /// position `0` and position `len` always succeed, per spec.md §8's
    /// boundary property), shifting every subspace at or after it up by
    /// one id. `name` overrides the default "Desktop N" label. Returns the
    /// new subspace's id (== the clamped position).
    pub fn create(&mut self, position: usize, name: Option<String>) -> usize {
        let position = position.min(self.subspaces.len());
        let mut s = Subspace::named(position);
        if let Some(name) = name {
            s.name = name;
        }
        self.subspaces.insert(position, s);
        for (i, s) in self.subspaces.iter_mut().enumerate() {
            s.id = i;
        }
        if self.current >= position {
            self.current += 1;
        }
        self.rows = self.rows.clamp(1, self.subspaces.len());
        position
    }

    /// Remove a subspace and renumber every subsequent one down by one.
    /// Windows that were exclusively on `id` are the caller's
    /// responsibility to reassign before calling this (mirrors spec.md
    /// §4.B's ordering: windows are moved off the doomed subspace first,
    /// then it is removed, then notifications fire from the diff).
    ///
    /// If `current` pointed at or past the removed subspace it is clamped
    /// back into range; if it pointed strictly after it, it is decremented
    /// to keep tracking the same logical subspace rather than silently
    /// re-pointing at whatever shifted down into its old slot. Never
    /// allowed to leave the manager with zero subspaces.
    pub fn remove(&mut self, id: usize) -> Result<()> {
        if self.subspaces.len() <= 1 {
            return Err(Error::InsufficientWorkspaces);
        }
        if id >= self.subspaces.len() {
            return Ok(());
        }
        self.subspaces.remove(id);
        for (i, s) in self.subspaces.iter_mut().enumerate() {
            s.id = i;
        }
        if id < self.current {
            self.current -= 1;
        } else if self.current >= self.subspaces.len() {
            self.current = self.subspaces.len() - 1;
        }
        self.rows = self.rows.clamp(1, self.subspaces.len());
        Ok(())
    }

    /// Grow or shrink to exactly `count` subspaces, appending/removing
    /// from the tail.
    pub fn set_count(&mut self, count: usize) -> Result<()> {
        let count = count.max(1);
        while self.subspaces.len() < count {
            self.create(self.subspaces.len(), None);
        }
        while self.subspaces.len() > count {
            self.remove(self.subspaces.len() - 1)?;
        }
        Ok(())
    }

    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows.clamp(1, self.subspaces.len());
    }

    pub fn set_current(&mut self, id: usize) -> bool {
        if id < self.subspaces.len() && id != self.current {
            self.current = id;
            true
        } else {
            false
        }
    }

    fn grid_index(&self, id: usize) -> (usize, usize) {
        let cols = self.columns();
        (id / cols, id % cols)
    }

    fn id_at(&self, row: usize, col: usize) -> Option<usize> {
        let cols = self.columns();
        if row >= self.rows || col >= cols {
            return None;
        }
        let id = row * cols + col;
        if id < self.subspaces.len() {
            Some(id)
        } else {
            None
        }
    }

    pub fn west_of(&self, id: usize) -> Option<usize> {
        let (r, c) = self.grid_index(id);
        if c == 0 {
            self.id_at(r, self.columns() - 1)
        } else {
            self.id_at(r, c - 1)
        }
    }

    pub fn east_of(&self, id: usize) -> Option<usize> {
        let (r, c) = self.grid_index(id);
        self.id_at(r, c + 1).or_else(|| self.id_at(r, 0))
    }

    pub fn north_of(&self, id: usize) -> Option<usize> {
        let (r, c) = self.grid_index(id);
        if r == 0 {
            self.id_at(self.rows - 1, c)
        } else {
            self.id_at(r - 1, c)
        }
    }

    pub fn south_of(&self, id: usize) -> Option<usize> {
        let (r, c) = self.grid_index(id);
        self.id_at(r + 1, c).or_else(|| self.id_at(0, c))
    }

    /// Feed a continuous swipe-gesture delta (positive = towards `target`).
    /// Returns `true` once the gesture has crossed `SWIPE_COMMIT_THRESHOLD`
    /// and `set_current(target)` has been applied; the caller is then
    /// responsible for emitting `current_subspace_changed` from its diff.
    pub fn swipe_update(&mut self, target: usize, delta: f64) -> bool {
        let progress = self.swipe.get_or_insert(SwipeProgress { target, offset: 0.0 });
        if progress.target != target {
            *progress = SwipeProgress { target, offset: 0.0 };
        }
        progress.offset += delta;

        if progress.offset.abs() >= SWIPE_COMMIT_THRESHOLD {
            self.swipe = None;
            self.set_current(target);
            true
        } else {
            false
        }
    }

    /// End the gesture without committing. Returns `true` if a gesture was
    /// actually in flight (so the caller knows to emit
    /// `current_changing_cancelled`).
    pub fn swipe_cancel(&mut self) -> bool {
        self.swipe.take().is_some()
    }

    pub fn swipe_progress(&self) -> Option<SwipeProgress> {
        self.swipe
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct PersistedSubspaces {
    pub count: usize,
    pub rows: usize,
    pub names: Vec<String>,
}

#[cfg(feature = "serde")]
impl SubspaceManager {
    pub fn load(data: &PersistedSubspaces) -> Result<Self> {
        if data.count == 0 {
            return Err(Error::InvalidSubspaceLayout);
        }
        let mut mgr = Self::new(data.count, data.rows.max(1));
        for (i, name) in data.names.iter().enumerate() {
            if let Some(s) = mgr.subspaces.get_mut(i) {
                s.name = name.clone();
            }
        }
        Ok(mgr)
    }

    pub fn save(&self) -> PersistedSubspaces {
        PersistedSubspaces {
            count: self.count(),
            rows: self.rows,
            names: self.subspaces.iter().map(|s| s.name.clone()).collect(),
        }
    }
}
