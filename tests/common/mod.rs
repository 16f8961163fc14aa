//! Shared scaffolding for integration tests: a scripted [`Backend`] impl
//! with call tracking, so tests can assert on what the core asked the
//! backend to do without a live display connection.
use compositing_wm_core::{
    backend::{
        event::{BackendEvent, ClientMessage},
        property::{Prop, WindowAttributes, WmState},
        Backend, ClientAttr, ClientConfig, DecorationMargins,
    },
    core::bindings::{KeyCode, MouseState},
    pure::geometry::{Point, Rect},
    Error, Result, WinId,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub const SCREEN_WIDTH: u32 = 1000;
pub const SCREEN_HEIGHT: u32 = 600;

pub fn simple_screen(n: u32) -> Rect {
    Rect::new(n * SCREEN_WIDTH, 0, SCREEN_WIDTH, SCREEN_HEIGHT)
}

/// A scripted [`Backend`]: geometry is tracked per client so
/// `client_geometry` reflects whatever `set_client_config` last positioned
/// it at, events are drawn off a pre-loaded queue, and every call that
/// would mutate backend-visible state is recorded in `calls` for
/// assertions.
#[derive(Default)]
pub struct TestBackend {
    pub screens: RefCell<Vec<Rect>>,
    pub events: RefCell<Vec<BackendEvent>>,
    pub geometry: RefCell<HashMap<WinId, Rect>>,
    pub existing: RefCell<Vec<WinId>>,
    pub focused: Cell<Option<WinId>>,
    pub calls: RefCell<Vec<String>>,
}

impl TestBackend {
    pub fn new(screens: Vec<Rect>) -> Self {
        Self {
            screens: RefCell::new(screens),
            ..Default::default()
        }
    }

    pub fn with_client(self, id: WinId, r: Rect) -> Self {
        self.geometry.borrow_mut().insert(id, r);
        self.existing.borrow_mut().push(id);
        self
    }

    pub fn queue(self, events: Vec<BackendEvent>) -> Self {
        *self.events.borrow_mut() = events;
        self
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl Backend for TestBackend {
    fn root(&self) -> WinId {
        WinId::from(0)
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        Ok(self.screens.borrow().clone())
    }

    fn cursor_position(&self) -> Result<Point> {
        Ok(Point::new(0, 0))
    }

    fn grab(&self, _key_codes: &[KeyCode], _mouse_states: &[MouseState]) -> Result<()> {
        Ok(())
    }

    fn next_event(&self) -> Result<BackendEvent> {
        let mut remaining = self.events.borrow_mut();
        if remaining.is_empty() {
            Err(Error::ConnectionClosed)
        } else {
            Ok(remaining.remove(0))
        }
    }

    fn flush(&self) {
        self.record("flush");
    }

    fn intern_atom(&self, _name: &str) -> Result<WinId> {
        Ok(WinId::from(0))
    }

    fn atom_name(&self, _id: WinId) -> Result<String> {
        Ok(String::new())
    }

    fn client_geometry(&self, client: WinId) -> Result<Rect> {
        Ok(self.geometry.borrow().get(&client).copied().unwrap_or_default())
    }

    fn existing_clients(&self) -> Result<Vec<WinId>> {
        Ok(self.existing.borrow().clone())
    }

    fn map(&self, client: WinId) -> Result<()> {
        self.record(format!("map({client})"));
        Ok(())
    }

    fn unmap(&self, client: WinId) -> Result<()> {
        self.record(format!("unmap({client})"));
        Ok(())
    }

    fn kill(&self, client: WinId) -> Result<()> {
        self.record(format!("kill({client})"));
        Ok(())
    }

    fn focus(&self, client: WinId) -> Result<()> {
        self.record(format!("focus({client})"));
        self.focused.set(Some(client));
        Ok(())
    }

    fn get_prop(&self, _client: WinId, _prop_name: &str) -> Result<Option<Prop>> {
        Ok(None)
    }

    fn list_props(&self, _client: WinId) -> Result<Vec<String>> {
        Ok(vec![])
    }

    fn get_wm_state(&self, _client: WinId) -> Result<Option<WmState>> {
        Ok(None)
    }

    fn get_window_attributes(&self, _client: WinId) -> Result<WindowAttributes> {
        Ok(WindowAttributes::default())
    }

    fn set_wm_state(&self, _client: WinId, _wm_state: WmState) -> Result<()> {
        Ok(())
    }

    fn set_prop(&self, _client: WinId, _name: &str, _val: Prop) -> Result<()> {
        Ok(())
    }

    fn delete_prop(&self, _client: WinId, _prop_name: &str) -> Result<()> {
        Ok(())
    }

    fn set_client_attributes(&self, _client: WinId, _attrs: &[ClientAttr]) -> Result<()> {
        Ok(())
    }

    fn set_client_config(&self, client: WinId, data: &[ClientConfig]) -> Result<()> {
        for cfg in data {
            if let ClientConfig::Position(r) = cfg {
                self.geometry.borrow_mut().insert(client, *r);
            }
        }
        Ok(())
    }

    fn send_client_message(&self, _msg: ClientMessage) -> Result<()> {
        Ok(())
    }

    fn warp_pointer(&self, _p: Point) -> Result<()> {
        Ok(())
    }

    fn ping(&self, _client: WinId, _serial: u64) -> Result<()> {
        Ok(())
    }

    fn schedule_repaint(&self, _window: Option<WinId>) {}

    fn add_repaint(&self, _region: Rect) {}

    fn is_overlay_window(&self, _id: WinId) -> bool {
        false
    }

    fn effects_active_fullscreen(&self) -> bool {
        false
    }

    fn create_decoration(&self, _window: WinId) -> Result<DecorationMargins> {
        Ok(DecorationMargins::default())
    }
}
