//! Property value types exchanged with the backend.
use crate::{pure::geometry::Rect, WinId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The ICCCM WM_STATE value for a client window.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmState {
    Withdrawn,
    Normal,
    Iconic,
}

/// Size constraints carried on WM_NORMAL_HINTS. Only the fields the core
/// actually consults (min/max size, resize increments) are modeled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WmNormalHints {
    pub min_size: Option<(u32, u32)>,
    pub max_size: Option<(u32, u32)>,
    pub resize_inc: Option<(u32, u32)>,
}

impl WmNormalHints {
    /// Clamp `r` to the hinted bounds, snapping to the nearest lower
    /// multiple of the resize increment above the minimum size.
    pub fn apply_to(&self, mut r: Rect) -> Rect {
        if let Some((min_w, min_h)) = self.min_size {
            r.w = r.w.max(min_w);
            r.h = r.h.max(min_h);
        }
        if let Some((max_w, max_h)) = self.max_size {
            if max_w > 0 {
                r.w = r.w.min(max_w);
            }
            if max_h > 0 {
                r.h = r.h.min(max_h);
            }
        }
        if let Some((inc_w, inc_h)) = self.resize_inc {
            let (min_w, min_h) = self.min_size.unwrap_or((0, 0));
            if inc_w > 1 {
                r.w = min_w + ((r.w.saturating_sub(min_w)) / inc_w) * inc_w;
            }
            if inc_h > 1 {
                r.h = min_h + ((r.h.saturating_sub(min_h)) / inc_h) * inc_h;
            }
        }
        r
    }
}

/// WM_HINTS: urgency, input model and group membership.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WmHints {
    pub input: bool,
    pub urgent: bool,
    pub group_leader: Option<WinId>,
}

/// Static attributes of a window fetched once at manage time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct WindowAttributes {
    pub override_redirect: bool,
    pub window_type: Option<String>,
    pub class: Option<(String, String)>,
}

/// A dynamically typed X/Wayland property value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    UTF8String(Vec<String>),
    Atom(Vec<String>),
    Window(Vec<WinId>),
    Cardinal(Vec<u32>),
    WmNormalHints(WmNormalHints),
    WmHints(WmHints),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_hints_clamp_to_min() {
        let hints = WmNormalHints {
            min_size: Some((100, 50)),
            ..Default::default()
        };
        let r = hints.apply_to(Rect::new(0, 0, 10, 10));
        assert_eq!((r.w, r.h), (100, 50));
    }

    #[test]
    fn normal_hints_clamp_to_max() {
        let hints = WmNormalHints {
            max_size: Some((200, 200)),
            ..Default::default()
        };
        let r = hints.apply_to(Rect::new(0, 0, 500, 500));
        assert_eq!((r.w, r.h), (200, 200));
    }
}
