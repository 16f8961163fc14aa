//! Queries against client windows, used by rule predicates and by the
//! input filter chain for ad-hoc matching against live backend state.
use crate::{
    backend::{atom::Atom, property::Prop, Backend},
    Result, WinId,
};

/// A query to be run against client windows for identifying specific
/// windows or programs.
pub trait Query<B: Backend> {
    fn run(&self, id: WinId, b: &B) -> Result<bool>;
}

pub(crate) fn str_prop<B>(prop: impl AsRef<str>, id: WinId, b: &B) -> Result<Option<Vec<String>>>
where
    B: Backend,
{
    match b.get_prop(id, prop.as_ref())? {
        Some(Prop::UTF8String(strs)) if !strs.is_empty() => Ok(Some(strs)),
        _ => Ok(None),
    }
}

/// Fetch a window's title following ICCCM / EWMH standards.
pub struct Title(pub String);

impl<B: Backend> Query<B> for Title {
    fn run(&self, id: WinId, b: &B) -> Result<bool> {
        let strs = str_prop(Atom::WmName, id, b)
            .ok()
            .or_else(|| str_prop(Atom::NetWmName, id, b).ok())
            .flatten();

        match strs {
            Some(strs) if !strs.is_empty() => Ok(strs[0] == self.0),
            _ => Ok(false),
        }
    }
}

/// The first string returned under the WM_CLASS property (the instance
/// name, a.k.a. resource name).
pub struct AppName(pub String);

impl<B: Backend> Query<B> for AppName {
    fn run(&self, id: WinId, b: &B) -> Result<bool> {
        match str_prop(Atom::WmClass, id, b)? {
            Some(strs) if !strs.is_empty() => Ok(strs[0] == self.0),
            _ => Ok(false),
        }
    }
}

/// The second string returned under the WM_CLASS property (the resource
/// class).
pub struct ClassName(pub String);

impl<B: Backend> Query<B> for ClassName {
    fn run(&self, id: WinId, b: &B) -> Result<bool> {
        match str_prop(Atom::WmClass, id, b)? {
            Some(strs) if strs.len() > 1 => Ok(strs[1] == self.0),
            _ => Ok(false),
        }
    }
}

/// A string property fetched and compared by name.
pub struct StringProperty(pub String, pub String);

impl<B: Backend> Query<B> for StringProperty {
    fn run(&self, id: WinId, b: &B) -> Result<bool> {
        match str_prop(&self.0, id, b)? {
            Some(strs) if !strs.is_empty() => Ok(strs[0] == self.1),
            _ => Ok(false),
        }
    }
}
