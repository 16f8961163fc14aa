//! Focus chain and focus-stealing-prevention (FSP) policy: a per-subspace
//! MRU deque, a global MRU across all subspaces, and the `should_get_focus`
//! FIFO used to replay queued activation requests once a blocker lifts.
use crate::WinId;
use std::collections::{HashMap, VecDeque};

/// The five FSP levels shared by both a window's own activation request
/// (`level`) and the currently active window's protection (`protection`).
/// Ordering matters: comparisons below rely on `PartialOrd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FspLevel {
    None,
    Low,
    Medium,
    High,
    Extreme,
}

impl Default for FspLevel {
    fn default() -> Self {
        FspLevel::Medium
    }
}

/// How a focus-chain entry was touched, mirroring the three update kinds
/// the KWin focus chain exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainChange {
    /// Move to the very front (about to become active).
    MakeFirst,
    /// Move to the very back (explicitly deprioritized, e.g. minimized).
    MakeLast,
    /// Insert/reposition without forcing either end: just before the
    /// current active window if one exists, else appended.
    Update,
}

/// `front() == oldest`, `back() == most recently used`.
type Mru = VecDeque<WinId>;

/// Per-subspace MRU chains, a global MRU, and the FIFO of windows that
/// asked for focus while focus-stealing prevention denied them outright
/// (so they can be offered focus again once the blocking window goes
/// away, per spec.md §4.E).
#[derive(Debug, Clone, Default)]
pub struct FocusChain {
    per_subspace: HashMap<usize, Mru>,
    global: Mru,
    should_get_focus: VecDeque<WinId>,
    /// If set, `next_for_activation` only considers windows whose screen
    /// matches the requesting screen (§10.3, originally `false`).
    pub separate_screen_focus: bool,
}

impl FocusChain {
    pub fn new() -> Self {
        Self::default()
    }

    fn chain_for(&mut self, subspace: usize) -> &mut Mru {
        self.per_subspace.entry(subspace).or_default()
    }

    /// Update every subspace chain `id` is a member of, plus the global
    /// chain, matching `focuschain.cpp::update`'s semantics.
    pub fn update(&mut self, id: WinId, subspaces: &[usize], change: ChainChange) {
        for &sub in subspaces {
            apply_change(self.chain_for(sub), id, change);
        }
        apply_change(&mut self.global, id, change);
    }

    pub fn remove(&mut self, id: WinId) {
        for chain in self.per_subspace.values_mut() {
            chain.retain(|&w| w != id);
        }
        self.global.retain(|&w| w != id);
        self.should_get_focus.retain(|&w| w != id);
    }

    /// Most-recently-used window on `subspace`, excluding `id` itself,
    /// `None` if the chain is empty.
    pub fn next_for_subspace(&self, subspace: usize, exclude: Option<WinId>) -> Option<WinId> {
        self.per_subspace
            .get(&subspace)
            .into_iter()
            .flat_map(|c| c.iter().rev())
            .copied()
            .find(|&id| Some(id) != exclude)
    }

    pub fn next_global(&self, exclude: Option<WinId>) -> Option<WinId> {
        self.global.iter().rev().copied().find(|&id| Some(id) != exclude)
    }

    pub fn push_should_get_focus(&mut self, id: WinId) {
        if !self.should_get_focus.contains(&id) {
            self.should_get_focus.push_back(id);
        }
    }

    pub fn pop_should_get_focus(&mut self) -> Option<WinId> {
        self.should_get_focus.pop_front()
    }

    pub fn drop_should_get_focus(&mut self, id: WinId) {
        self.should_get_focus.retain(|&w| w != id);
    }
}

fn apply_change(chain: &mut Mru, id: WinId, change: ChainChange) {
    chain.retain(|&w| w != id);
    match change {
        ChainChange::MakeFirst => chain.push_back(id),
        ChainChange::MakeLast => chain.push_front(id),
        ChainChange::Update => chain.push_back(id),
    }
}

/// The two-sided focus-stealing-prevention decision (SPEC_FULL.md §10.1,
/// grounded on `win/x11/focus_stealing.h::allow_window_activation`):
/// `level` is the *requesting* window's own FSP level, `protection` is the
/// *currently active* window's protection level (default `Medium` if
/// nothing is active). `requesting_user_time`/`active_user_time` are the
/// effective user-times of each side (a window's own, falling back to its
/// group's most recent via `Window::group_user_time`, per §10.4).
///
/// - `None` on either side always allows.
/// - `Extreme` on either side always denies.
/// - if the requester belongs to the same client group as the active
///   window, it is allowed through whenever `protection < High`.
/// - a high-interest request against a protected active window (`level >
///   Medium && protection > Low`) is denied outright, before timestamps
///   are even considered.
/// - otherwise, with no requesting timestamp known, allow only for a low
///   request against a less-than-High protection; with one known, allow
///   iff it is at least as recent as the active window's (falling back to
///   0 if the active window's own time is unknown).
pub fn fsp_allows(
    level: FspLevel,
    protection: FspLevel,
    same_group_as_active: bool,
    requesting_user_time: Option<u32>,
    active_user_time: Option<u32>,
) -> bool {
    if level == FspLevel::None || protection == FspLevel::None {
        return true;
    }
    if level == FspLevel::Extreme || protection == FspLevel::Extreme {
        return false;
    }
    if same_group_as_active && protection < FspLevel::High {
        return true;
    }
    if level > FspLevel::Medium && protection > FspLevel::Low {
        return false;
    }
    match requesting_user_time {
        None => level < FspLevel::Medium && protection < FspLevel::High,
        Some(requesting) => requesting >= active_user_time.unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_always_allows() {
        assert!(fsp_allows(FspLevel::None, FspLevel::Extreme, false, None, None));
        assert!(fsp_allows(FspLevel::Low, FspLevel::None, false, None, None));
    }

    #[test]
    fn extreme_always_denies() {
        assert!(!fsp_allows(FspLevel::Extreme, FspLevel::Low, false, None, None));
        assert!(!fsp_allows(FspLevel::High, FspLevel::Extreme, false, None, None));
    }

    #[test]
    fn same_group_relaxes_below_high() {
        assert!(fsp_allows(FspLevel::Low, FspLevel::Medium, true, None, None));
        assert!(!fsp_allows(FspLevel::Low, FspLevel::High, true, None, None));
    }

    #[test]
    fn high_interest_request_denied_outright_regardless_of_timestamp() {
        assert!(!fsp_allows(
            FspLevel::High,
            FspLevel::Medium,
            false,
            Some(9_999),
            Some(0)
        ));
    }

    #[test]
    fn unknown_timestamp_allows_only_low_level_against_weak_protection() {
        assert!(fsp_allows(FspLevel::Low, FspLevel::Medium, false, None, None));
        assert!(!fsp_allows(FspLevel::Medium, FspLevel::Medium, false, None, None));
    }

    #[test]
    fn known_timestamps_deny_stale_activation_request() {
        // active P at user-time 1000, requesting Q at user-time 500: §8
        // scenario 2 requires this denied even though both are Medium.
        assert!(!fsp_allows(
            FspLevel::Medium,
            FspLevel::Medium,
            false,
            Some(500),
            Some(1000)
        ));
    }

    #[test]
    fn known_timestamps_allow_fresher_activation_request() {
        assert!(fsp_allows(
            FspLevel::Medium,
            FspLevel::Medium,
            false,
            Some(1500),
            Some(1000)
        ));
    }

    #[test]
    fn make_first_moves_to_back_most_recent() {
        let mut fc = FocusChain::new();
        fc.update(WinId::from(1), &[0], ChainChange::Update);
        fc.update(WinId::from(2), &[0], ChainChange::Update);
        fc.update(WinId::from(1), &[0], ChainChange::MakeFirst);
        assert_eq!(fc.next_for_subspace(0, None), Some(WinId::from(1)));
    }

    #[test]
    fn make_last_moves_to_front_oldest() {
        let mut fc = FocusChain::new();
        fc.update(WinId::from(1), &[0], ChainChange::Update);
        fc.update(WinId::from(2), &[0], ChainChange::Update);
        fc.update(WinId::from(2), &[0], ChainChange::MakeLast);
        assert_eq!(fc.next_for_subspace(0, None), Some(WinId::from(1)));
    }

    #[test]
    fn should_get_focus_is_fifo() {
        let mut fc = FocusChain::new();
        fc.push_should_get_focus(WinId::from(1));
        fc.push_should_get_focus(WinId::from(2));
        assert_eq!(fc.pop_should_get_focus(), Some(WinId::from(1)));
        assert_eq!(fc.pop_should_get_focus(), Some(WinId::from(2)));
        assert_eq!(fc.pop_should_get_focus(), None);
    }
}
