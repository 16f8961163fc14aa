//! The input filter chain (§4.H): a linear sequence of filters walked in
//! order for every raw input event. A filter either consumes the event
//! (the chain stops) or passes it on to the next filter. Filters are
//! installed once, at `Space` construction, and their relative order is
//! load-bearing: lock-screen precedes every application-visible filter,
//! global-shortcuts precede move-resize (a shortcut must still fire while
//! a drag is modifier-held), move-resize precedes focus changes, subspace
//! switching owns the swipe-gesture events independently of the pointer
//! chain, and decoration handling precedes the final forward-to-client
//! filter.
use crate::{
    backend::Backend,
    core::{
        bindings::{KeyBindings, KeyCode, MouseBindings, MouseEvent, MouseEventKind},
        space::Space,
    },
    pure::move_resize::Contact,
    Result,
};
use tracing::trace;

/// Whether a filter consumed an event (stopping the chain) or passed it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Consumed,
    Pass,
}

impl FilterResult {
    fn is_consumed(self) -> bool {
        matches!(self, FilterResult::Consumed)
    }
}

/// One stage of the input filter chain. All methods default to passing the
/// event on untouched, so a filter only needs to override what it cares
/// about.
#[allow(unused_variables)]
pub trait InputFilter<B: Backend> {
    /// Name used in `trace!` diagnostics when walking the chain.
    fn name(&self) -> &'static str;

    fn key(&mut self, space: &mut Space<B>, backend: &B, code: KeyCode) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn pointer_button(&mut self, space: &mut Space<B>, backend: &B, e: &MouseEvent) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn pointer_motion(&mut self, space: &mut Space<B>, backend: &B, e: &MouseEvent) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn pointer_axis(&mut self, space: &mut Space<B>, backend: &B, horizontal: f64, vertical: f64) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn touch_down(&mut self, space: &mut Space<B>, backend: &B, slot: u32) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn touch_motion(&mut self, space: &mut Space<B>, backend: &B, slot: u32) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn touch_up(&mut self, space: &mut Space<B>, backend: &B, slot: u32) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn pinch_begin(&mut self, space: &mut Space<B>, backend: &B, fingers: u32) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn pinch_update(&mut self, space: &mut Space<B>, backend: &B, scale: f64, rotation: f64) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn pinch_end(&mut self, space: &mut Space<B>, backend: &B) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn pinch_cancel(&mut self, space: &mut Space<B>, backend: &B) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn swipe_begin(&mut self, space: &mut Space<B>, backend: &B, fingers: u32) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn swipe_update(&mut self, space: &mut Space<B>, backend: &B, delta_x: f64, delta_y: f64) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn swipe_end(&mut self, space: &mut Space<B>, backend: &B) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }

    fn swipe_cancel(&mut self, space: &mut Space<B>, backend: &B) -> Result<FilterResult> {
        Ok(FilterResult::Pass)
    }
}

/// The ordered chain of filters a `Space` walks for every input event.
/// Installation order is the chain order; see the module doc for the
/// ordering constraints callers must respect.
#[derive(Default)]
pub struct FilterChain<B: Backend> {
    filters: Vec<Box<dyn InputFilter<B>>>,
}

macro_rules! walk {
    ($self:ident, $space:ident, $backend:ident, $method:ident $(, $arg:expr)*) => {{
        for f in $self.filters.iter_mut() {
            trace!(filter = f.name(), "walking input filter chain");
            if f.$method($space, $backend $(, $arg)*)?.is_consumed() {
                trace!(filter = f.name(), "event consumed");
                return Ok(FilterResult::Consumed);
            }
        }
        Ok(FilterResult::Pass)
    }};
}

impl<B: Backend> FilterChain<B> {
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    pub fn push(&mut self, filter: Box<dyn InputFilter<B>>) {
        self.filters.push(filter);
    }

    pub fn key(&mut self, space: &mut Space<B>, backend: &B, code: KeyCode) -> Result<FilterResult> {
        walk!(self, space, backend, key, code)
    }

    pub fn pointer_button(&mut self, space: &mut Space<B>, backend: &B, e: &MouseEvent) -> Result<FilterResult> {
        walk!(self, space, backend, pointer_button, e)
    }

    pub fn pointer_motion(&mut self, space: &mut Space<B>, backend: &B, e: &MouseEvent) -> Result<FilterResult> {
        walk!(self, space, backend, pointer_motion, e)
    }

    pub fn pointer_axis(&mut self, space: &mut Space<B>, backend: &B, h: f64, v: f64) -> Result<FilterResult> {
        walk!(self, space, backend, pointer_axis, h, v)
    }

    pub fn touch_down(&mut self, space: &mut Space<B>, backend: &B, slot: u32) -> Result<FilterResult> {
        walk!(self, space, backend, touch_down, slot)
    }

    pub fn touch_motion(&mut self, space: &mut Space<B>, backend: &B, slot: u32) -> Result<FilterResult> {
        walk!(self, space, backend, touch_motion, slot)
    }

    pub fn touch_up(&mut self, space: &mut Space<B>, backend: &B, slot: u32) -> Result<FilterResult> {
        walk!(self, space, backend, touch_up, slot)
    }

    pub fn pinch_begin(&mut self, space: &mut Space<B>, backend: &B, fingers: u32) -> Result<FilterResult> {
        walk!(self, space, backend, pinch_begin, fingers)
    }

    pub fn pinch_update(&mut self, space: &mut Space<B>, backend: &B, scale: f64, rotation: f64) -> Result<FilterResult> {
        walk!(self, space, backend, pinch_update, scale, rotation)
    }

    pub fn pinch_end(&mut self, space: &mut Space<B>, backend: &B) -> Result<FilterResult> {
        walk!(self, space, backend, pinch_end)
    }

    pub fn pinch_cancel(&mut self, space: &mut Space<B>, backend: &B) -> Result<FilterResult> {
        walk!(self, space, backend, pinch_cancel)
    }

    pub fn swipe_begin(&mut self, space: &mut Space<B>, backend: &B, fingers: u32) -> Result<FilterResult> {
        walk!(self, space, backend, swipe_begin, fingers)
    }

    pub fn swipe_update(&mut self, space: &mut Space<B>, backend: &B, dx: f64, dy: f64) -> Result<FilterResult> {
        walk!(self, space, backend, swipe_update, dx, dy)
    }

    pub fn swipe_end(&mut self, space: &mut Space<B>, backend: &B) -> Result<FilterResult> {
        walk!(self, space, backend, swipe_end)
    }

    pub fn swipe_cancel(&mut self, space: &mut Space<B>, backend: &B) -> Result<FilterResult> {
        walk!(self, space, backend, swipe_cancel)
    }
}

/// Blocks every event while `locked` is set, ahead of all other filters.
#[derive(Default)]
pub struct LockScreenFilter {
    pub locked: bool,
}

impl<B: Backend> InputFilter<B> for LockScreenFilter {
    fn name(&self) -> &'static str {
        "lock-screen"
    }

    fn key(&mut self, _: &mut Space<B>, _: &B, _: KeyCode) -> Result<FilterResult> {
        Ok(self.consume_if_locked())
    }

    fn pointer_button(&mut self, _: &mut Space<B>, _: &B, _: &MouseEvent) -> Result<FilterResult> {
        Ok(self.consume_if_locked())
    }

    fn pointer_motion(&mut self, _: &mut Space<B>, _: &B, _: &MouseEvent) -> Result<FilterResult> {
        Ok(self.consume_if_locked())
    }

    fn touch_down(&mut self, _: &mut Space<B>, _: &B, _: u32) -> Result<FilterResult> {
        Ok(self.consume_if_locked())
    }
}

impl LockScreenFilter {
    fn consume_if_locked(&self) -> FilterResult {
        if self.locked {
            FilterResult::Consumed
        } else {
            FilterResult::Pass
        }
    }
}

/// Runs user-defined key and mouse bindings (global shortcuts). Must
/// precede move-resize: a shortcut held down during a drag still fires.
pub struct GlobalShortcutFilter<B: Backend> {
    pub key_bindings: KeyBindings<B>,
    pub mouse_bindings: MouseBindings<B>,
    /// Modifier bits to strip before matching (NumLock/CapsLock etc).
    pub ignored_mask: crate::core::bindings::KeyCodeMask,
}

impl<B: Backend> GlobalShortcutFilter<B> {
    pub fn new(key_bindings: KeyBindings<B>, mouse_bindings: MouseBindings<B>) -> Self {
        Self {
            key_bindings,
            mouse_bindings,
            ignored_mask: 0,
        }
    }
}

impl<B: Backend> InputFilter<B> for GlobalShortcutFilter<B> {
    fn name(&self) -> &'static str {
        "global-shortcuts"
    }

    fn key(&mut self, space: &mut Space<B>, backend: &B, code: KeyCode) -> Result<FilterResult> {
        let normalised = code.ignoring_modifier(self.ignored_mask);
        let Some(action) = self.key_bindings.get_mut(&normalised) else {
            return Ok(FilterResult::Pass);
        };
        trace!(?code, "running global key binding");
        action(space, backend)?;
        Ok(FilterResult::Consumed)
    }

    fn pointer_button(&mut self, space: &mut Space<B>, backend: &B, e: &MouseEvent) -> Result<FilterResult> {
        if e.kind != MouseEventKind::Press {
            return Ok(FilterResult::Pass);
        }
        let Some(action) = self.mouse_bindings.get_mut(&(e.kind, e.state.clone())) else {
            return Ok(FilterResult::Pass);
        };
        trace!(?e, "running global mouse binding");
        action(space, backend, e)?;
        Ok(FilterResult::Consumed)
    }
}

/// Grabs pointer motion/button events for an in-progress interactive
/// move/resize and routes titlebar-press-and-hold into starting one (§4.F).
/// Must precede focus-change filters: the grabbed window does not
/// necessarily gain focus purely from being dragged.
#[derive(Default)]
pub struct MoveResizeFilter;

impl<B: Backend> InputFilter<B> for MoveResizeFilter {
    fn name(&self) -> &'static str {
        "move-resize"
    }

    fn key(&mut self, space: &mut Space<B>, _: &B, code: KeyCode) -> Result<FilterResult> {
        // Key code is backend-mapped upstream; 9 is the common X11 keycode
        // for Escape, used here to cancel an in-progress grab.
        if space.move_resize.is_some() && code.code == 9 {
            space.cancel_move_resize();
            return Ok(FilterResult::Consumed);
        }
        Ok(FilterResult::Pass)
    }

    fn pointer_motion(&mut self, space: &mut Space<B>, backend: &B, e: &MouseEvent) -> Result<FilterResult> {
        if space.move_resize.is_none() {
            return Ok(FilterResult::Pass);
        }
        space.step_move_resize(backend, e.rpt)?;
        Ok(FilterResult::Consumed)
    }

    fn pointer_button(&mut self, space: &mut Space<B>, backend: &B, e: &MouseEvent) -> Result<FilterResult> {
        if space.move_resize.is_none() {
            return Ok(FilterResult::Pass);
        }
        if e.kind == MouseEventKind::Release {
            space.finish_move_resize(backend)?;
            return Ok(FilterResult::Consumed);
        }
        Ok(FilterResult::Consumed)
    }
}

/// Which axis a subspace swipe is travelling along, decided from the first
/// tick with a non-negligible delta and held for the rest of the gesture so
/// a wobble mid-swipe can't flip the target subspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwipeAxis {
    Horizontal,
    Vertical,
}

/// Drives continuous subspace-switch gestures (§4.B) from raw swipe deltas:
/// picks a target neighbour in the grid on the first tick, then feeds signed
/// progress into [`crate::pure::SubspaceManager::swipe_update`] until it
/// commits or the gesture ends.
#[derive(Default)]
pub struct SubspaceSwitchFilter {
    axis: Option<SwipeAxis>,
}

impl<B: Backend> InputFilter<B> for SubspaceSwitchFilter {
    fn name(&self) -> &'static str {
        "subspace-switch"
    }

    fn swipe_begin(&mut self, _: &mut Space<B>, _: &B, _: u32) -> Result<FilterResult> {
        self.axis = None;
        Ok(FilterResult::Pass)
    }

    fn swipe_update(&mut self, space: &mut Space<B>, _: &B, dx: f64, dy: f64) -> Result<FilterResult> {
        let axis = *self.axis.get_or_insert_with(|| {
            if dx.abs() >= dy.abs() {
                SwipeAxis::Horizontal
            } else {
                SwipeAxis::Vertical
            }
        });

        let current = space.subspaces.current();
        let (target, delta) = match axis {
            SwipeAxis::Horizontal if dx < 0.0 => (space.subspaces.west_of(current), -dx),
            SwipeAxis::Horizontal => (space.subspaces.east_of(current), dx),
            SwipeAxis::Vertical if dy < 0.0 => (space.subspaces.north_of(current), -dy),
            SwipeAxis::Vertical => (space.subspaces.south_of(current), dy),
        };

        let Some(target) = target else {
            return Ok(FilterResult::Consumed);
        };
        space.subspaces.swipe_update(target, delta);
        Ok(FilterResult::Consumed)
    }

    fn swipe_end(&mut self, space: &mut Space<B>, _: &B) -> Result<FilterResult> {
        self.axis = None;
        space.subspaces.swipe_cancel();
        Ok(FilterResult::Consumed)
    }

    fn swipe_cancel(&mut self, space: &mut Space<B>, _: &B) -> Result<FilterResult> {
        self.axis = None;
        space.subspaces.swipe_cancel();
        Ok(FilterResult::Consumed)
    }
}

/// A window whose frame the decoration factory draws (title bar, borders).
/// Hit-testing the actual decoration surface is the backend's job; this
/// filter just recognises presses that land on the decoration and
/// dispatches the canonical actions (raise + focus, or start a drag via
/// `MoveResizeFilter` further down the chain by leaving the event
/// unconsumed once the window has been raised).
#[derive(Default)]
pub struct DecorationFilter;

impl<B: Backend> InputFilter<B> for DecorationFilter {
    fn name(&self) -> &'static str {
        "decoration"
    }

    fn pointer_button(&mut self, space: &mut Space<B>, backend: &B, e: &MouseEvent) -> Result<FilterResult> {
        if e.kind != MouseEventKind::Press {
            return Ok(FilterResult::Pass);
        }
        if space.window(e.id).is_some() {
            space.activate_window(backend, e.id, false)?;
        }
        Ok(FilterResult::Pass)
    }
}

/// Swallows events addressed to compositor-internal overlay surfaces
/// (shadows, blur helpers) so they never reach application logic further
/// down the chain.
#[derive(Default)]
pub struct InternalWindowFilter;

impl<B: Backend> InputFilter<B> for InternalWindowFilter {
    fn name(&self) -> &'static str {
        "internal-window"
    }

    fn pointer_button(&mut self, _: &mut Space<B>, backend: &B, e: &MouseEvent) -> Result<FilterResult> {
        Ok(if backend.is_overlay_window(e.id) {
            FilterResult::Consumed
        } else {
            FilterResult::Pass
        })
    }
}

/// The terminal filter: always consumes, standing in for delivery of the
/// event to the focused Wayland client (or X11 focused window) once every
/// WM-level filter has had its chance. Always installed last.
#[derive(Default)]
pub struct ForwardToClientFilter;

impl<B: Backend> InputFilter<B> for ForwardToClientFilter {
    fn name(&self) -> &'static str {
        "forward-to-client"
    }

    fn key(&mut self, _: &mut Space<B>, _: &B, _: KeyCode) -> Result<FilterResult> {
        Ok(FilterResult::Consumed)
    }

    fn pointer_button(&mut self, _: &mut Space<B>, _: &B, _: &MouseEvent) -> Result<FilterResult> {
        Ok(FilterResult::Consumed)
    }

    fn pointer_motion(&mut self, _: &mut Space<B>, _: &B, _: &MouseEvent) -> Result<FilterResult> {
        Ok(FilterResult::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::MockBackend, core::bindings::MouseState, pure::geometry::Point, WinId};

    struct NoopBackend;
    impl MockBackend for NoopBackend {}

    fn mouse_event(kind: MouseEventKind) -> MouseEvent {
        MouseEvent::new(
            WinId::from(1),
            Point::new(0, 0),
            Point::new(0, 0),
            MouseState::new(crate::core::bindings::MouseButton::Left, vec![]),
            kind,
        )
    }

    #[test]
    fn locked_filter_consumes_key_events() {
        let mut chain: FilterChain<NoopBackend> = FilterChain::new();
        chain.push(Box::new(LockScreenFilter { locked: true }));
        chain.push(Box::new(ForwardToClientFilter));

        let mut space = Space::new();
        let backend = NoopBackend;
        let code = KeyCode { mask: 0, code: 38 };
        let result = chain.key(&mut space, &backend, code).unwrap();
        assert_eq!(result, FilterResult::Consumed);
    }

    #[test]
    fn unlocked_chain_falls_through_to_forward_filter() {
        let mut chain: FilterChain<NoopBackend> = FilterChain::new();
        chain.push(Box::new(LockScreenFilter { locked: false }));
        chain.push(Box::new(ForwardToClientFilter));

        let mut space = Space::new();
        let backend = NoopBackend;
        let e = mouse_event(MouseEventKind::Press);
        let result = chain.pointer_button(&mut space, &backend, &e).unwrap();
        assert_eq!(result, FilterResult::Consumed);
    }
}
