//! Global stacking order: a single ordered list of windows independent of
//! subspace membership, plus the restack algorithm that keeps transient/
//! modal subtrees glued to their lead window.
use crate::{pure::window::Window, WinId};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The ten fixed z-order bands. Windows are totally ordered first by
/// layer, then by position within `pre_stack`/`stack`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Desktop,
    Below,
    Normal,
    Dock,
    Above,
    Notification,
    Active,
    CriticalNotification,
    Osd,
    Unmanaged,
}

/// How a client-requested restack is resolved against the current order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestackMode {
    /// Enforce adjacency immediately above `sibling`, falling back to a
    /// plain raise if `sibling` is not present.
    Above(WinId),
    /// Enforce adjacency immediately below `sibling`, falling back to a
    /// plain lower if `sibling` is not present.
    Below(WinId),
    TopIf(WinId),
    BottomIf(WinId),
    Opposite(WinId),
}

/// The global stacking order: an unlayered `pre_stack` (the order windows
/// were raised/lowered in, user and application driven) and the derived,
/// layer-bucketed `stack` actually used for painting and input routing.
#[derive(Debug, Clone, Default)]
pub struct StackingOrder {
    pre_stack: Vec<WinId>,
}

impl StackingOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: WinId) -> bool {
        self.pre_stack.contains(&id)
    }

    pub fn insert(&mut self, id: WinId) {
        if !self.contains(id) {
            self.pre_stack.push(id);
        }
    }

    pub fn remove(&mut self, id: WinId) {
        self.pre_stack.retain(|&w| w != id);
    }

    pub fn raise(&mut self, id: WinId) {
        self.remove(id);
        self.pre_stack.push(id);
    }

    pub fn lower(&mut self, id: WinId) {
        self.remove(id);
        self.pre_stack.insert(0, id);
    }

    pub fn raise_or_lower(&mut self, id: WinId) {
        let top = self.pre_stack.last().copied();
        if top == Some(id) {
            self.lower(id);
        } else {
            self.raise(id);
        }
    }

    /// Position `id` immediately above or below `relative_to` in pre_stack
    /// order, preserving the relative order of everything else.
    fn place_relative(&mut self, id: WinId, relative_to: WinId, above: bool) {
        self.remove(id);
        let Some(idx) = self.pre_stack.iter().position(|&w| w == relative_to) else {
            self.pre_stack.push(id);
            return;
        };
        let insert_at = if above { idx + 1 } else { idx };
        self.pre_stack.insert(insert_at, id);
    }

    /// Apply a client-requested restack. Application-originated "above"
    /// requests are expected to already have been downgraded to `None`
    /// by FSP gating (§4.E) before reaching here; this function only
    /// performs the mechanical reordering.
    pub fn restack_request(&mut self, id: WinId, mode: Option<RestackMode>) {
        match mode {
            None => {}
            Some(RestackMode::Above(sibling)) => {
                if self.contains(sibling) {
                    self.place_relative(id, sibling, true);
                } else {
                    self.raise(id);
                }
            }
            Some(RestackMode::Below(sibling)) => {
                if self.contains(sibling) {
                    self.place_relative(id, sibling, false);
                } else {
                    self.lower(id);
                }
            }
            Some(RestackMode::TopIf(sibling)) => {
                if self.pre_stack.last().copied() == Some(sibling) {
                    self.raise(id);
                }
            }
            Some(RestackMode::BottomIf(sibling)) => {
                if self.pre_stack.first().copied() == Some(sibling) {
                    self.lower(id);
                }
            }
            Some(RestackMode::Opposite(sibling)) => {
                let id_idx = self.pre_stack.iter().position(|&w| w == id);
                let sib_idx = self.pre_stack.iter().position(|&w| w == sibling);
                match (id_idx, sib_idx) {
                    (Some(i), Some(s)) if i < s => self.raise(id),
                    (Some(_), Some(_)) => self.lower(id),
                    _ => {}
                }
            }
        }
    }

    /// Rebuild the fully layered, transient-consistent render order:
    ///
    /// 1. bucket every window into its layer (keep_above/keep_below push a
    ///    normal-layer window into Above/Below respectively; fullscreen
    ///    windows with an active lead sit in the Active layer).
    /// 2. within a bucket, preserve `pre_stack` relative order.
    /// 3. walk the result and, for every transient whose lead is present,
    ///    move the transient to immediately above its lead — recursively,
    ///    so a modal dialog's own transients ride along with it.
    /// 4. flatten buckets in ascending `Layer` order.
    pub fn restack(&mut self, windows: &HashMap<WinId, Window>) -> Vec<WinId> {
        self.pre_stack.retain(|id| windows.contains_key(id));

        let mut by_layer: Vec<(Layer, Vec<WinId>)> = ALL_LAYERS.iter().map(|&l| (l, vec![])).collect();
        for &id in &self.pre_stack {
            let layer = effective_layer(windows.get(&id));
            if let Some((_, bucket)) = by_layer.iter_mut().find(|(l, _)| *l == layer) {
                bucket.push(id);
            }
        }

        let mut flat: Vec<WinId> = by_layer.into_iter().flat_map(|(_, b)| b).collect();
        promote_transient_subtrees(&mut flat, windows);
        flat
    }
}

const ALL_LAYERS: [Layer; 10] = [
    Layer::Desktop,
    Layer::Below,
    Layer::Normal,
    Layer::Dock,
    Layer::Above,
    Layer::Notification,
    Layer::Active,
    Layer::CriticalNotification,
    Layer::Osd,
    Layer::Unmanaged,
];

fn effective_layer(w: Option<&Window>) -> Layer {
    let Some(w) = w else { return Layer::Normal };
    if let Some(l) = w.layer {
        return l;
    }
    if w.flags.keep_above {
        Layer::Above
    } else if w.flags.keep_below {
        Layer::Below
    } else {
        Layer::Normal
    }
}

/// Move every transient immediately above its lead, depth-first, so that a
/// chain of nested modal dialogs stays contiguous and directly above the
/// window it blocks.
fn promote_transient_subtrees(order: &mut Vec<WinId>, windows: &HashMap<WinId, Window>) {
    let mut changed = true;
    while changed {
        changed = false;
        for i in 0..order.len() {
            let id = order[i];
            let Some(parent) = windows.get(&id).and_then(|w| w.parent) else {
                continue;
            };
            let Some(parent_idx) = order.iter().position(|&w| w == parent) else {
                continue;
            };
            if i < parent_idx {
                let item = order.remove(i);
                let new_parent_idx = order.iter().position(|&w| w == parent).unwrap();
                order.insert(new_parent_idx + 1, item);
                changed = true;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pure::window::WindowIdentity;

    fn win_map(ids: &[u32]) -> HashMap<WinId, Window> {
        ids.iter()
            .map(|&id| (WinId::from(id), Window::new(WinId::from(id), WindowIdentity::default())))
            .collect()
    }

    #[test]
    fn raise_moves_to_top() {
        let mut s = StackingOrder::new();
        s.insert(WinId::from(1));
        s.insert(WinId::from(2));
        s.raise(WinId::from(1));
        assert_eq!(s.pre_stack, vec![WinId::from(2), WinId::from(1)]);
    }

    #[test]
    fn raise_or_lower_toggles() {
        let mut s = StackingOrder::new();
        s.insert(WinId::from(1));
        s.insert(WinId::from(2));
        s.raise_or_lower(WinId::from(2));
        assert_eq!(s.pre_stack.last().copied(), Some(WinId::from(1)));
    }

    #[test]
    fn transient_is_promoted_above_its_lead() {
        let mut windows = win_map(&[1, 2, 3]);
        windows.get_mut(&WinId::from(3)).unwrap().parent = Some(WinId::from(1));

        let mut s = StackingOrder::new();
        s.insert(WinId::from(3));
        s.insert(WinId::from(1));
        s.insert(WinId::from(2));

        let order = s.restack(&windows);
        let p1 = order.iter().position(|&w| w == WinId::from(1)).unwrap();
        let p3 = order.iter().position(|&w| w == WinId::from(3)).unwrap();
        assert_eq!(p3, p1 + 1);
    }

    #[test]
    fn keep_above_window_lands_in_above_layer() {
        let mut windows = win_map(&[1, 2]);
        windows.get_mut(&WinId::from(1)).unwrap().flags.keep_above = true;

        let mut s = StackingOrder::new();
        s.insert(WinId::from(2));
        s.insert(WinId::from(1));

        let order = s.restack(&windows);
        assert_eq!(order, vec![WinId::from(2), WinId::from(1)]);
    }
}
