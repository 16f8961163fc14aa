// Check that each Hook variant fires at the expected points.
use compositing_wm_core::{
    backend::event::BackendEvent,
    core::{hooks::Hook, space::Space},
    pure::window::Desktops,
    WinId,
};
use std::{cell::RefCell, rc::Rc};

mod common;
use common::{simple_screen, TestBackend};

/// Records the name of every hook call it receives, in order, onto a shared
/// log so a test can assert on the exact sequence observed.
struct RecordingHook {
    log: Rc<RefCell<Vec<String>>>,
}

impl RecordingHook {
    fn new(log: Rc<RefCell<Vec<String>>>) -> Self {
        Self { log }
    }

    fn record(&self, call: impl Into<String>) {
        self.log.borrow_mut().push(call.into());
    }
}

impl Hook<TestBackend> for RecordingHook {
    fn startup(&mut self, _: &mut Space<TestBackend>) -> compositing_wm_core::Result<()> {
        self.record("startup");
        Ok(())
    }

    fn client_added(&mut self, _: &mut Space<TestBackend>, id: WinId) -> compositing_wm_core::Result<()> {
        self.record(format!("client_added({id})"));
        Ok(())
    }

    fn client_removed(&mut self, _: &mut Space<TestBackend>, id: WinId) -> compositing_wm_core::Result<()> {
        self.record(format!("client_removed({id})"));
        Ok(())
    }

    fn active_changed(&mut self, _: &mut Space<TestBackend>, active: Option<WinId>) -> compositing_wm_core::Result<()> {
        self.record(format!("active_changed({active:?})"));
        Ok(())
    }

    fn geometry_changed(&mut self, _: &mut Space<TestBackend>, id: WinId) -> compositing_wm_core::Result<()> {
        self.record(format!("geometry_changed({id})"));
        Ok(())
    }

    fn desktops_changed(&mut self, _: &mut Space<TestBackend>, id: WinId) -> compositing_wm_core::Result<()> {
        self.record(format!("desktops_changed({id})"));
        Ok(())
    }

    fn minimized_changed(&mut self, _: &mut Space<TestBackend>, id: WinId, minimized: bool) -> compositing_wm_core::Result<()> {
        self.record(format!("minimized_changed({id}, {minimized})"));
        Ok(())
    }

    fn maximized_state_changed(&mut self, _: &mut Space<TestBackend>, id: WinId) -> compositing_wm_core::Result<()> {
        self.record(format!("maximized_state_changed({id})"));
        Ok(())
    }

    fn fullscreen_changed(&mut self, _: &mut Space<TestBackend>, id: WinId, fullscreen: bool) -> compositing_wm_core::Result<()> {
        self.record(format!("fullscreen_changed({id}, {fullscreen})"));
        Ok(())
    }

    fn skip_taskbar_changed(&mut self, _: &mut Space<TestBackend>, id: WinId, skip: bool) -> compositing_wm_core::Result<()> {
        self.record(format!("skip_taskbar_changed({id}, {skip})"));
        Ok(())
    }

    fn demands_attention_changed(&mut self, _: &mut Space<TestBackend>, id: WinId, demands: bool) -> compositing_wm_core::Result<()> {
        self.record(format!("demands_attention_changed({id}, {demands})"));
        Ok(())
    }

    fn current_subspace_changed(&mut self, _: &mut Space<TestBackend>, previous: usize, current: usize) -> compositing_wm_core::Result<()> {
        self.record(format!("current_subspace_changed({previous}, {current})"));
        Ok(())
    }

    fn subspace_created(&mut self, _: &mut Space<TestBackend>, index: usize) -> compositing_wm_core::Result<()> {
        self.record(format!("subspace_created({index})"));
        Ok(())
    }

    fn subspace_removed(&mut self, _: &mut Space<TestBackend>, index: usize) -> compositing_wm_core::Result<()> {
        self.record(format!("subspace_removed({index})"));
        Ok(())
    }

    fn showing_desktop_changed(&mut self, _: &mut Space<TestBackend>, showing: bool) -> compositing_wm_core::Result<()> {
        self.record(format!("showing_desktop_changed({showing})"));
        Ok(())
    }

    fn screen_change(&mut self, _: &mut Space<TestBackend>, screen_index: usize) -> compositing_wm_core::Result<()> {
        self.record(format!("screen_change({screen_index})"));
        Ok(())
    }

    fn screens_updated(&mut self, _: &mut Space<TestBackend>, geometries: &[compositing_wm_core::pure::geometry::Rect]) -> compositing_wm_core::Result<()> {
        self.record(format!("screens_updated({})", geometries.len()));
        Ok(())
    }

    fn event_handled(&mut self, _: &mut Space<TestBackend>) -> compositing_wm_core::Result<()> {
        self.record("event_handled");
        Ok(())
    }
}

fn space_with_hook() -> (Space<TestBackend>, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut space = Space::new();
    space.push_hook(Box::new(RecordingHook::new(log.clone())));
    (space, log)
}

/// A no-op event used purely to drive `Space::event`'s diff/notification
/// pass after a direct setter call, since setters only mutate pure state
/// and notifications are derived from the snapshot the next time an event
/// runs.
fn nudge(space: &mut Space<TestBackend>, backend: &TestBackend) {
    space.event(backend, BackendEvent::Pong(WinId::from(1), 0)).unwrap();
}

#[test]
fn startup_runs_startup_hook_and_manages_existing_clients() {
    let (mut space, log) = space_with_hook();
    let backend = TestBackend::new(vec![simple_screen(0)]).with_client(WinId::from(1), simple_screen(0));

    space.startup(&backend).unwrap();

    assert!(log.borrow().contains(&"startup".to_string()));
}

#[test]
fn map_request_fires_client_added_then_active_changed() {
    let (mut space, log) = space_with_hook();
    let backend = TestBackend::new(vec![simple_screen(0)]);

    space.startup(&backend).unwrap();
    space.event(&backend, BackendEvent::MapRequest(WinId::from(1))).unwrap();

    let events = log.borrow();
    let added_pos = events.iter().position(|e| e == "client_added(1)").unwrap();
    let active_pos = events.iter().position(|e| e == "active_changed(Some(1))").unwrap();
    assert!(added_pos < active_pos, "client_added must precede active_changed: {events:?}");
    assert_eq!(events.last().unwrap(), "event_handled");
}

#[test]
fn destroy_fires_client_removed() {
    let (mut space, log) = space_with_hook();
    let backend = TestBackend::new(vec![simple_screen(0)]).with_client(WinId::from(1), simple_screen(0));

    space.startup(&backend).unwrap();
    log.borrow_mut().clear();

    space.event(&backend, BackendEvent::Destroy(WinId::from(1))).unwrap();

    assert!(log.borrow().contains(&"client_removed(1)".to_string()));
}

#[test]
fn set_fullscreen_fires_fullscreen_changed_on_next_event() {
    let (mut space, log) = space_with_hook();
    let backend = TestBackend::new(vec![simple_screen(0)]).with_client(WinId::from(1), simple_screen(0));
    space.startup(&backend).unwrap();
    log.borrow_mut().clear();

    space.set_fullscreen(&backend, WinId::from(1), true).unwrap();
    nudge(&mut space, &backend);

    assert!(log.borrow().contains(&"fullscreen_changed(1, true)".to_string()));
}

#[test]
fn subspace_created_and_removed_fire_with_index() {
    let (mut space, log) = space_with_hook();
    let backend = TestBackend::new(vec![simple_screen(0)]);
    space.startup(&backend).unwrap();
    log.borrow_mut().clear();

    let new_id = space.create_subspace(None, None);
    nudge(&mut space, &backend);
    assert!(log.borrow().contains(&format!("subspace_created({new_id})")));

    log.borrow_mut().clear();
    space.remove_subspace(new_id).unwrap();
    nudge(&mut space, &backend);
    assert!(log.borrow().iter().any(|e| e.starts_with("subspace_removed(")));
}

#[test]
fn set_current_subspace_fires_current_subspace_changed() {
    let (mut space, log) = space_with_hook();
    let backend = TestBackend::new(vec![simple_screen(0)]);
    space.startup(&backend).unwrap();
    space.create_subspace(None, None);
    log.borrow_mut().clear();

    assert!(space.set_current_subspace(1));
    nudge(&mut space, &backend);

    assert!(log.borrow().contains(&"current_subspace_changed(0, 1)".to_string()));
}

#[test]
fn set_showing_desktop_fires_showing_desktop_changed() {
    let (mut space, log) = space_with_hook();
    let backend = TestBackend::new(vec![simple_screen(0)]).with_client(WinId::from(1), simple_screen(0));
    space.startup(&backend).unwrap();
    log.borrow_mut().clear();

    space.set_showing_desktop(&backend, true).unwrap();
    nudge(&mut space, &backend);

    assert!(log.borrow().contains(&"showing_desktop_changed(true)".to_string()));
}

#[test]
fn send_to_desktop_fires_desktops_changed() {
    let (mut space, log) = space_with_hook();
    let backend = TestBackend::new(vec![simple_screen(0)]).with_client(WinId::from(1), simple_screen(0));
    space.startup(&backend).unwrap();
    space.create_subspace(None, None);
    log.borrow_mut().clear();

    space.send_to_desktop(&backend, WinId::from(1), Desktops::one(1)).unwrap();
    nudge(&mut space, &backend);

    assert!(log.borrow().contains(&"desktops_changed(1)".to_string()));
}
