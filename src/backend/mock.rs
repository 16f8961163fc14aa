//! A mock [Backend] for driving the core's unit and property tests without
//! a live X11 or Wayland connection. Each method defaults to an
//! "unimplemented" error so a test mock only needs to override the small
//! number of calls its scenario actually exercises.
//! This module and its contents are only available when testing.
use crate::{
    backend::{
        event::{BackendEvent, ClientMessage},
        property::{Prop, WindowAttributes, WmState},
        Backend, ClientAttr, ClientConfig, DecorationMargins,
    },
    core::bindings::{KeyCode, MouseState},
    pure::geometry::{Point, Rect},
    Error, Result, WinId,
};

/// All methods on this trait that return a Result will return an
/// unimplemented-mock error by default unless an implementation is
/// provided. `mock_root` always returns id 0 and `mock_flush` is a no-op.
///
/// Any implementation of `MockBackend` automatically implements [Backend]
/// by forwarding calls to `$method` onto `mock_$method`.
#[allow(unused_variables)]
pub trait MockBackend {
    fn mock_root(&self) -> WinId {
        WinId::from(0)
    }

    fn mock_screen_details(&self) -> Result<Vec<Rect>> {
        unimplemented()
    }

    fn mock_cursor_position(&self) -> Result<Point> {
        unimplemented()
    }

    fn mock_grab(&self, key_codes: &[KeyCode], mouse_states: &[MouseState]) -> Result<()> {
        Ok(())
    }

    fn mock_next_event(&self) -> Result<BackendEvent> {
        unimplemented()
    }

    fn mock_flush(&self) {}

    fn mock_intern_atom(&self, name: &str) -> Result<WinId> {
        unimplemented()
    }

    fn mock_atom_name(&self, id: WinId) -> Result<String> {
        unimplemented()
    }

    fn mock_client_geometry(&self, client: WinId) -> Result<Rect> {
        unimplemented()
    }

    fn mock_existing_clients(&self) -> Result<Vec<WinId>> {
        Ok(vec![])
    }

    fn mock_map(&self, client: WinId) -> Result<()> {
        Ok(())
    }

    fn mock_unmap(&self, client: WinId) -> Result<()> {
        Ok(())
    }

    fn mock_kill(&self, client: WinId) -> Result<()> {
        Ok(())
    }

    fn mock_focus(&self, client: WinId) -> Result<()> {
        Ok(())
    }

    fn mock_get_prop(&self, client: WinId, prop_name: &str) -> Result<Option<Prop>> {
        Ok(None)
    }

    fn mock_list_props(&self, client: WinId) -> Result<Vec<String>> {
        Ok(vec![])
    }

    fn mock_get_wm_state(&self, client: WinId) -> Result<Option<WmState>> {
        Ok(None)
    }

    fn mock_get_window_attributes(&self, client: WinId) -> Result<WindowAttributes> {
        unimplemented()
    }

    fn mock_set_wm_state(&self, client: WinId, wm_state: WmState) -> Result<()> {
        Ok(())
    }

    fn mock_set_prop(&self, client: WinId, name: &str, val: Prop) -> Result<()> {
        Ok(())
    }

    fn mock_delete_prop(&self, client: WinId, prop_name: &str) -> Result<()> {
        Ok(())
    }

    fn mock_set_client_attributes(&self, client: WinId, attrs: &[ClientAttr]) -> Result<()> {
        Ok(())
    }

    fn mock_set_client_config(&self, client: WinId, data: &[ClientConfig]) -> Result<()> {
        Ok(())
    }

    fn mock_send_client_message(&self, msg: ClientMessage) -> Result<()> {
        Ok(())
    }

    fn mock_warp_pointer(&self, p: Point) -> Result<()> {
        Ok(())
    }

    fn mock_ping(&self, client: WinId, serial: u64) -> Result<()> {
        Ok(())
    }

    fn mock_schedule_repaint(&self, window: Option<WinId>) {}

    fn mock_add_repaint(&self, region: Rect) {}

    fn mock_is_overlay_window(&self, id: WinId) -> bool {
        false
    }

    fn mock_effects_active_fullscreen(&self) -> bool {
        false
    }

    fn mock_create_decoration(&self, window: WinId) -> Result<DecorationMargins> {
        Ok(DecorationMargins::default())
    }
}

fn unimplemented<T>() -> Result<T> {
    Err(Error::Raw("unimplemented mock method".to_string()))
}

impl<T> Backend for T
where
    T: MockBackend,
{
    fn root(&self) -> WinId {
        self.mock_root()
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        self.mock_screen_details()
    }

    fn cursor_position(&self) -> Result<Point> {
        self.mock_cursor_position()
    }

    fn grab(&self, key_codes: &[KeyCode], mouse_states: &[MouseState]) -> Result<()> {
        self.mock_grab(key_codes, mouse_states)
    }

    fn next_event(&self) -> Result<BackendEvent> {
        self.mock_next_event()
    }

    fn flush(&self) {
        self.mock_flush()
    }

    fn intern_atom(&self, name: &str) -> Result<WinId> {
        self.mock_intern_atom(name)
    }

    fn atom_name(&self, id: WinId) -> Result<String> {
        self.mock_atom_name(id)
    }

    fn client_geometry(&self, client: WinId) -> Result<Rect> {
        self.mock_client_geometry(client)
    }

    fn existing_clients(&self) -> Result<Vec<WinId>> {
        self.mock_existing_clients()
    }

    fn map(&self, client: WinId) -> Result<()> {
        self.mock_map(client)
    }

    fn unmap(&self, client: WinId) -> Result<()> {
        self.mock_unmap(client)
    }

    fn kill(&self, client: WinId) -> Result<()> {
        self.mock_kill(client)
    }

    fn focus(&self, client: WinId) -> Result<()> {
        self.mock_focus(client)
    }

    fn get_prop(&self, client: WinId, prop_name: &str) -> Result<Option<Prop>> {
        self.mock_get_prop(client, prop_name)
    }

    fn list_props(&self, client: WinId) -> Result<Vec<String>> {
        self.mock_list_props(client)
    }

    fn get_wm_state(&self, client: WinId) -> Result<Option<WmState>> {
        self.mock_get_wm_state(client)
    }

    fn get_window_attributes(&self, client: WinId) -> Result<WindowAttributes> {
        self.mock_get_window_attributes(client)
    }

    fn set_wm_state(&self, client: WinId, wm_state: WmState) -> Result<()> {
        self.mock_set_wm_state(client, wm_state)
    }

    fn set_prop(&self, client: WinId, name: &str, val: Prop) -> Result<()> {
        self.mock_set_prop(client, name, val)
    }

    fn delete_prop(&self, client: WinId, prop_name: &str) -> Result<()> {
        self.mock_delete_prop(client, prop_name)
    }

    fn set_client_attributes(&self, client: WinId, attrs: &[ClientAttr]) -> Result<()> {
        self.mock_set_client_attributes(client, attrs)
    }

    fn set_client_config(&self, client: WinId, data: &[ClientConfig]) -> Result<()> {
        self.mock_set_client_config(client, data)
    }

    fn send_client_message(&self, msg: ClientMessage) -> Result<()> {
        self.mock_send_client_message(msg)
    }

    fn warp_pointer(&self, p: Point) -> Result<()> {
        self.mock_warp_pointer(p)
    }

    fn ping(&self, client: WinId, serial: u64) -> Result<()> {
        self.mock_ping(client, serial)
    }

    fn schedule_repaint(&self, window: Option<WinId>) {
        self.mock_schedule_repaint(window)
    }

    fn add_repaint(&self, region: Rect) {
        self.mock_add_repaint(region)
    }

    fn is_overlay_window(&self, id: WinId) -> bool {
        self.mock_is_overlay_window(id)
    }

    fn effects_active_fullscreen(&self) -> bool {
        self.mock_effects_active_fullscreen()
    }

    fn create_decoration(&self, window: WinId) -> Result<DecorationMargins> {
        self.mock_create_decoration(window)
    }
}
