//! Hooks for injecting custom functionality around [`Space`] actions. Each
//! hook point corresponds to one of the signals or hook points named in
//! the top-level design (§6): a [Hook] impl can listen to any number of
//! them and will be called, in registration order, every time that signal
//! fires. All methods default to a no-op so a hook only needs to override
//! the triggers it cares about.
use crate::{backend::Backend, core::space::Space, pure::geometry::Rect, Result, WinId};

/// Names of the individual hook points, used for tracing diagnostics when
/// a hook is dispatched.
#[non_exhaustive]
#[allow(missing_docs)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum HookName {
    Startup,
    ClientAdded(WinId),
    ClientRemoved(WinId),
    ActiveChanged,
    GeometryChanged(WinId),
    DesktopsChanged(WinId),
    MinimizedChanged(WinId),
    MaximizedStateChanged(WinId),
    FullscreenChanged(WinId),
    SkipTaskbarChanged(WinId),
    DemandsAttentionChanged(WinId),
    CurrentSubspaceChanged,
    SubspaceCreated(usize),
    SubspaceRemoved(usize),
    ShowingDesktopChanged,
    ScreenChange,
    ScreensUpdated,
    EventHandled,
}

/// A list of hooks to run for a given [Space], in registration order.
pub type Hooks<B> = Vec<Box<dyn Hook<B>>>;

/// User defined functionality triggered by [Space] state changes.
///
/// Implementors may subscribe to any subset of the trigger points below;
/// unimplemented methods are no-ops. All hooks registered for a given
/// trigger run in the order they were added.
pub trait Hook<B: Backend> {
    /// Called once after the event loop's bindings are grabbed, before
    /// the first event is read.
    #[allow(unused_variables)]
    fn startup(&mut self, space: &mut Space<B>) -> Result<()> {
        Ok(())
    }

    /// A window has completed the manage sequence (§4.A) and is now
    /// tracked.
    #[allow(unused_variables)]
    fn client_added(&mut self, space: &mut Space<B>, id: WinId) -> Result<()> {
        Ok(())
    }

    /// A window has been unmanaged, either withdrawn or destroyed. The
    /// window is no longer present in `space`; `id` is retained only for
    /// identification.
    #[allow(unused_variables)]
    fn client_removed(&mut self, space: &mut Space<B>, id: WinId) -> Result<()> {
        Ok(())
    }

    /// The active (input-focused) window has changed.
    #[allow(unused_variables)]
    fn active_changed(&mut self, space: &mut Space<B>, active: Option<WinId>) -> Result<()> {
        Ok(())
    }

    /// A window's frame geometry has changed.
    #[allow(unused_variables)]
    fn geometry_changed(&mut self, space: &mut Space<B>, id: WinId) -> Result<()> {
        Ok(())
    }

    /// A window's desktop/subspace membership has changed.
    #[allow(unused_variables)]
    fn desktops_changed(&mut self, space: &mut Space<B>, id: WinId) -> Result<()> {
        Ok(())
    }

    /// A window's minimized state has changed.
    #[allow(unused_variables)]
    fn minimized_changed(&mut self, space: &mut Space<B>, id: WinId, minimized: bool) -> Result<()> {
        Ok(())
    }

    /// A window's horizontal or vertical maximize state has changed.
    #[allow(unused_variables)]
    fn maximized_state_changed(&mut self, space: &mut Space<B>, id: WinId) -> Result<()> {
        Ok(())
    }

    /// A window has entered or exited fullscreen.
    #[allow(unused_variables)]
    fn fullscreen_changed(&mut self, space: &mut Space<B>, id: WinId, fullscreen: bool) -> Result<()> {
        Ok(())
    }

    /// A window's skip-taskbar flag has changed.
    #[allow(unused_variables)]
    fn skip_taskbar_changed(&mut self, space: &mut Space<B>, id: WinId, skip: bool) -> Result<()> {
        Ok(())
    }

    /// A window's demands-attention flag has changed.
    #[allow(unused_variables)]
    fn demands_attention_changed(&mut self, space: &mut Space<B>, id: WinId, demands: bool) -> Result<()> {
        Ok(())
    }

    /// The current subspace has changed.
    #[allow(unused_variables)]
    fn current_subspace_changed(&mut self, space: &mut Space<B>, previous: usize, current: usize) -> Result<()> {
        Ok(())
    }

    /// A new subspace was created.
    #[allow(unused_variables)]
    fn subspace_created(&mut self, space: &mut Space<B>, index: usize) -> Result<()> {
        Ok(())
    }

    /// A subspace was removed.
    #[allow(unused_variables)]
    fn subspace_removed(&mut self, space: &mut Space<B>, index: usize) -> Result<()> {
        Ok(())
    }

    /// The "show desktop" toggle changed.
    #[allow(unused_variables)]
    fn showing_desktop_changed(&mut self, space: &mut Space<B>, showing: bool) -> Result<()> {
        Ok(())
    }

    /// Input focus moved to a different screen.
    #[allow(unused_variables)]
    fn screen_change(&mut self, space: &mut Space<B>, screen_index: usize) -> Result<()> {
        Ok(())
    }

    /// The set of connected outputs changed.
    #[allow(unused_variables)]
    fn screens_updated(&mut self, space: &mut Space<B>, geometries: &[Rect]) -> Result<()> {
        Ok(())
    }

    /// Called at the bottom of the event loop, after every event is
    /// fully handled.
    #[allow(unused_variables)]
    fn event_handled(&mut self, space: &mut Space<B>) -> Result<()> {
        Ok(())
    }
}
