//! Interactive move/resize: the per-window drag state machine plus the
//! pure geometry math for snapping, clipping and quick-tile/maximize/
//! fullscreen target rects (§4.F). At most one window is ever mid-drag
//! (`Space` enforces the "global, at most one" invariant; this module
//! only carries the state for whichever window that is).
use crate::{
    backend::property::WmNormalHints,
    pure::{
        geometry::{Point, Rect},
        screen::Screen,
        window::QuickTile,
    },
    WinId,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which part of the frame the pointer grabbed. `Center` means "move",
/// every other variant means "resize from this edge/corner".
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Center,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Contact {
    pub fn is_resize(&self) -> bool {
        !matches!(self, Contact::Center)
    }

    fn affects_left(&self) -> bool {
        matches!(self, Contact::Left | Contact::TopLeft | Contact::BottomLeft)
    }

    fn affects_right(&self) -> bool {
        matches!(self, Contact::Right | Contact::TopRight | Contact::BottomRight)
    }

    fn affects_top(&self) -> bool {
        matches!(self, Contact::Top | Contact::TopLeft | Contact::TopRight)
    }

    fn affects_bottom(&self) -> bool {
        matches!(self, Contact::Bottom | Contact::BottomLeft | Contact::BottomRight)
    }
}

/// Why the move/resize could not start, so the caller (the move-resize
/// input filter) can decide whether to fall through to the next filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRefusal {
    /// Another window is already mid move/resize (at most one globally).
    AlreadyInProgress,
    /// Rules forbid interactive geometry changes on this window.
    ForbiddenByRule,
    /// Resize was requested on a fullscreen window.
    FullscreenResize,
}

/// Per-window move/resize state. A window is mid-drag iff `Space` holds a
/// `Some(MoveResize)` for it; there is no separate `enabled` bool since
/// the `Option` itself carries that.
#[derive(Debug, Clone, Copy)]
pub struct MoveResize {
    pub window: WinId,
    pub contact: Contact,
    /// Pointer offset inside the frame at grab start.
    pub offset: Point,
    /// `initial_geometry.size - offset`, used when resizing from a
    /// top/left edge so the opposite edge stays pinned.
    pub inverted_offset: Point,
    pub initial_geometry: Rect,
    pub geometry: Rect,
    pub start_screen: usize,
    pub unrestricted: bool,
    /// A titlebar press with no motion yet; promoted to a real drag only
    /// if it is still held past the double-click interval.
    pub button_down: bool,
}

impl MoveResize {
    pub fn start(
        window: WinId,
        contact: Contact,
        grab_point: Point,
        initial_geometry: Rect,
        start_screen: usize,
        unrestricted: bool,
    ) -> Self {
        let offset = Point::new(
            grab_point.x.saturating_sub(initial_geometry.x),
            grab_point.y.saturating_sub(initial_geometry.y),
        );
        let inverted_offset = Point::new(
            initial_geometry.w.saturating_sub(offset.x),
            initial_geometry.h.saturating_sub(offset.y),
        );

        Self {
            window,
            contact,
            offset,
            inverted_offset,
            initial_geometry,
            geometry: initial_geometry,
            start_screen,
            unrestricted,
            button_down: true,
        }
    }

    /// Compute the candidate frame rect for a pointer now at `pointer`,
    /// before any snapping/clipping is applied.
    pub fn candidate_geometry(&self, pointer: Point) -> Rect {
        if !self.contact.is_resize() {
            return Rect {
                x: pointer.x.saturating_sub(self.offset.x),
                y: pointer.y.saturating_sub(self.offset.y),
                ..self.initial_geometry
            };
        }

        let mut r = self.initial_geometry;
        if self.contact.affects_left() {
            let new_x = pointer.x;
            let right = r.x + r.w;
            r.x = new_x.min(right.saturating_sub(1));
            r.w = right.saturating_sub(r.x);
        }
        if self.contact.affects_right() {
            r.w = pointer.x.saturating_sub(r.x).max(1);
        }
        if self.contact.affects_top() {
            let new_y = pointer.y;
            let bottom = r.y + r.h;
            r.y = new_y.min(bottom.saturating_sub(1));
            r.h = bottom.saturating_sub(r.y);
        }
        if self.contact.affects_bottom() {
            r.h = pointer.y.saturating_sub(r.y).max(1);
        }
        r
    }
}

/// Edge/center snapping applied to a candidate drag rect before clipping.
/// `strength` is the maximum pixel distance at which a snap engages.
pub fn snap_to_edges(mut r: Rect, others: &[Rect], screen: &Screen, strength: u32) -> Rect {
    if strength == 0 {
        return r;
    }

    let targets_x: Vec<u32> = std::iter::once(screen.work_area.x)
        .chain(std::iter::once(screen.work_area.x + screen.work_area.w))
        .chain(others.iter().flat_map(|o| [o.x, o.x + o.w]))
        .collect();
    let targets_y: Vec<u32> = std::iter::once(screen.work_area.y)
        .chain(std::iter::once(screen.work_area.y + screen.work_area.h))
        .chain(others.iter().flat_map(|o| [o.y, o.y + o.h]))
        .collect();

    if let Some(&t) = targets_x.iter().min_by_key(|&&t| r.x.abs_diff(t)) {
        if r.x.abs_diff(t) <= strength {
            r.x = t;
        }
    }
    if let Some(&t) = targets_x.iter().min_by_key(|&&t| (r.x + r.w).abs_diff(t)) {
        if (r.x + r.w).abs_diff(t) <= strength {
            r.x = t.saturating_sub(r.w);
        }
    }
    if let Some(&t) = targets_y.iter().min_by_key(|&&t| r.y.abs_diff(t)) {
        if r.y.abs_diff(t) <= strength {
            r.y = t;
        }
    }
    if let Some(&t) = targets_y.iter().min_by_key(|&&t| (r.y + r.h).abs_diff(t)) {
        if (r.y + r.h).abs_diff(t) <= strength {
            r.y = t.saturating_sub(r.h);
        }
    }

    r
}

/// Clip a candidate rect against size hints (min/max, resize increments).
/// Aspect ratio is intentionally left to `WmNormalHints` callers that need
/// it; the core only ever receives min/max/increment from the backend.
pub fn clip_to_hints(r: Rect, hints: &WmNormalHints) -> Rect {
    hints.apply_to(r)
}

/// Clamp a candidate rect so it stays within `screen`'s geometry, unless
/// the drag is `unrestricted` (in which case the window may leave the
/// screen bounds entirely, per spec.md §4.F).
pub fn clamp_to_screen(mut r: Rect, screen: &Screen, unrestricted: bool) -> Rect {
    if unrestricted {
        return r;
    }
    let s = screen.geometry;
    if r.x + r.w > s.x + s.w {
        r.x = (s.x + s.w).saturating_sub(r.w);
    }
    if r.y + r.h > s.y + s.h {
        r.y = (s.y + s.h).saturating_sub(r.h);
    }
    if r.x < s.x {
        r.x = s.x;
    }
    if r.y < s.y {
        r.y = s.y;
    }
    r
}

/// The target frame rect for a quick-tile mode against `work_area`.
pub fn quick_tile_target(mode: QuickTile, work_area: Rect) -> Option<Rect> {
    let Rect { x, y, w, h } = work_area;
    let half_w = w / 2;
    let half_h = h / 2;

    Some(match mode {
        QuickTile::None => return None,
        QuickTile::Maximize => work_area,
        QuickTile::Left => Rect::new(x, y, half_w, h),
        QuickTile::Right => Rect::new(x + half_w, y, w - half_w, h),
        QuickTile::Top => Rect::new(x, y, w, half_h),
        QuickTile::Bottom => Rect::new(x, y + half_h, w, h - half_h),
        QuickTile::TopLeft => Rect::new(x, y, half_w, half_h),
        QuickTile::TopRight => Rect::new(x + half_w, y, w - half_w, half_h),
        QuickTile::BottomLeft => Rect::new(x, y + half_h, half_w, h - half_h),
        QuickTile::BottomRight => Rect::new(x + half_w, y + half_h, w - half_w, h - half_h),
    })
}

/// The target frame rect for orthogonal maximize axes against `work_area`,
/// keeping the un-maximized axis from `current`.
pub fn maximize_target(horizontal: bool, vertical: bool, current: Rect, work_area: Rect) -> Rect {
    let mut r = current;
    if horizontal {
        r.x = work_area.x;
        r.w = work_area.w;
    }
    if vertical {
        r.y = work_area.y;
        r.h = work_area.h;
    }
    r
}
