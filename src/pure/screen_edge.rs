//! Screen-edge (electric border) reservations and the pure trigger logic
//! for pointer push-back/cooldown, approach fade, and touch-swipe
//! progress (§4.G). Timestamps are passed in explicitly rather than read
//! from the clock so the trigger logic stays a pure function the caller
//! (`Space`) can unit test and replay deterministically.
use crate::pure::geometry::{Point, Rect};
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The eight borders a screen edge can be reserved along.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Border {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// The action an edge triggers. Config-file action names that don't
/// resolve to one of these map to `None` (spec.md §6), never an error.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeAction {
    #[default]
    None,
    ShowDesktop,
    LockScreen,
    KRunner,
    ApplicationLauncher,
}

impl EdgeAction {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ShowDesktop" => EdgeAction::ShowDesktop,
            "LockScreen" => EdgeAction::LockScreen,
            "KRunner" => EdgeAction::KRunner,
            "ApplicationLauncher" => EdgeAction::ApplicationLauncher,
            _ => EdgeAction::None,
        }
    }
}

/// When continuous subspace-switching edges are active.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubspaceSwitchMode {
    #[default]
    Disabled,
    Always,
    OnMovingClient,
}

/// Configuration knobs shared by every edge, persisted under
/// `[Windows]` in spec.md §6 (`ElectricBorderDelay`, `…Cooldown`,
/// `…PushbackPixels`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeConfig {
    pub push_back_pixels: u32,
    pub time_threshold: Duration,
    pub reactivate_threshold: Duration,
    pub remain_active_on_fullscreen: bool,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            push_back_pixels: 1,
            time_threshold: Duration::from_millis(150),
            reactivate_threshold: Duration::from_millis(350),
            remain_active_on_fullscreen: false,
        }
    }
}

/// Progress of a single-finger swipe gesture inward from the edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchProgress {
    pub fraction: f64,
}

/// One reserved hot rectangle along a screen edge.
#[derive(Debug, Clone)]
pub struct ScreenEdge {
    pub border: Border,
    pub geometry: Rect,
    pub approach_geometry: Rect,
    pub pointer_action: EdgeAction,
    pub touch_action: EdgeAction,
    /// Window whose show-on-edge reservation created this edge; on
    /// trigger it is revealed instead of running `pointer_action`.
    pub reveals: Option<crate::WinId>,
    reservations: u32,
    is_blocked: bool,
    /// Time the pointer was last pushed back, used to gate the
    /// reactivate-threshold window (spec.md §4.G, scenario 4).
    pushed_back_at: Option<Instant>,
    last_triggered_at: Option<Instant>,
}

impl ScreenEdge {
    pub fn new(border: Border, geometry: Rect, approach_geometry: Rect) -> Self {
        Self {
            border,
            geometry,
            approach_geometry,
            pointer_action: EdgeAction::None,
            touch_action: EdgeAction::None,
            reveals: None,
            reservations: 0,
            is_blocked: false,
            pushed_back_at: None,
            last_triggered_at: None,
        }
    }

    pub fn reserve(&mut self) {
        self.reservations += 1;
    }

    pub fn unreserve(&mut self) {
        self.reservations = self.reservations.saturating_sub(1);
    }

    pub fn is_reserved(&self) -> bool {
        self.reservations > 0
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.is_blocked = blocked;
    }

    pub fn is_blocked(&self) -> bool {
        self.is_blocked
    }

    fn in_cooldown(&self, now: Instant, cfg: &EdgeConfig) -> bool {
        self.last_triggered_at
            .is_some_and(|t| now.duration_since(t) < cfg.reactivate_threshold)
    }

    /// Pointer entered `geometry` at `now`. Returns `Trigger::Fire` if the
    /// edge's action should run right now, `Trigger::PushedBack(by)` if
    /// the pointer should be teleported away and a re-entry timer
    /// started, or `Trigger::Suppressed` if reserved-but-blocked/in
    /// cooldown/not reserved at all.
    pub fn on_pointer_enter(&mut self, now: Instant, cfg: &EdgeConfig) -> Trigger {
        if !self.is_reserved() || self.is_blocked {
            return Trigger::Suppressed;
        }
        if self.in_cooldown(now, cfg) {
            return Trigger::Suppressed;
        }

        if cfg.push_back_pixels == 0 {
            self.last_triggered_at = Some(now);
            return Trigger::Fire;
        }

        match self.pushed_back_at {
            // First arrival at the edge this cooldown window: push back
            // and start the re-entry timer.
            None => {
                self.pushed_back_at = Some(now);
                Trigger::PushedBack(cfg.push_back_pixels)
            }
            // Pointer returned to the edge: fire only if it came back
            // within the configured re-entry window.
            Some(pushed_at) => {
                let elapsed = now.duration_since(pushed_at);
                if elapsed < cfg.time_threshold {
                    // Returned too fast to have been a deliberate re-push;
                    // treat as still approaching and keep waiting.
                    return Trigger::Suppressed;
                }
                self.pushed_back_at = None;
                if elapsed <= cfg.reactivate_threshold {
                    self.last_triggered_at = Some(now);
                    Trigger::Fire
                } else {
                    Trigger::Suppressed
                }
            }
        }
    }

    /// Fraction in `[0, 1]` of how far a point inside `approach_geometry`
    /// has travelled from the trigger line, `0` once outside entirely.
    pub fn approach_factor(&self, p: Point) -> f64 {
        if !self.approach_geometry.contains_point(p) {
            return 0.0;
        }
        let dist = match self.border {
            Border::Left => p.x.saturating_sub(self.geometry.x),
            Border::Right => (self.geometry.x + self.geometry.w).saturating_sub(p.x),
            Border::Top => p.y.saturating_sub(self.geometry.y),
            Border::Bottom => (self.geometry.y + self.geometry.h).saturating_sub(p.y),
            _ => 0,
        };
        let span = self.approach_geometry.w.max(self.approach_geometry.h).max(1);
        1.0 - (dist as f64 / span as f64).clamp(0.0, 1.0)
    }
}

/// The result of a pointer entering a reserved edge's hot rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Fire,
    PushedBack(u32),
    Suppressed,
}

/// Touch-swipe progress, advanced as the finger travels inward from the
/// edge. `progress` clamps to `[0, 1]`; release triggers at `>= 1` or
/// after `threshold` is otherwise met, matching spec.md §4.G.
pub fn touch_progress(distance_travelled: f64, edge_span: f64) -> TouchProgress {
    TouchProgress {
        fraction: (distance_travelled / edge_span.max(1.0)).clamp(0.0, 1.0),
    }
}

pub fn touch_should_trigger(progress: TouchProgress) -> bool {
    progress.fraction >= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge() -> ScreenEdge {
        let mut e = ScreenEdge::new(
            Border::Top,
            Rect::new(0, 0, 1000, 1),
            Rect::new(0, 0, 1000, 50),
        );
        e.reserve();
        e
    }

    #[test]
    fn unreserved_edge_never_fires() {
        let mut e = ScreenEdge::new(Border::Top, Rect::new(0, 0, 1000, 1), Rect::new(0, 0, 1000, 50));
        let cfg = EdgeConfig::default();
        assert_eq!(e.on_pointer_enter(Instant::now(), &cfg), Trigger::Suppressed);
    }

    #[test]
    fn blocked_edge_never_fires() {
        let mut e = edge();
        e.set_blocked(true);
        let cfg = EdgeConfig::default();
        assert_eq!(e.on_pointer_enter(Instant::now(), &cfg), Trigger::Suppressed);
    }

    #[test]
    fn push_back_then_reentry_within_window_fires() {
        let mut e = edge();
        let cfg = EdgeConfig {
            push_back_pixels: 1,
            time_threshold: Duration::from_millis(150),
            reactivate_threshold: Duration::from_millis(350),
            remain_active_on_fullscreen: false,
        };
        let t0 = Instant::now();
        assert_eq!(e.on_pointer_enter(t0, &cfg), Trigger::PushedBack(1));
        // Returns too fast (< time_threshold): still just approaching.
        assert_eq!(e.on_pointer_enter(t0 + Duration::from_millis(50), &cfg), Trigger::Suppressed);
        // Returns within [time_threshold, reactivate-time_threshold): fires.
        assert_eq!(e.on_pointer_enter(t0 + Duration::from_millis(200), &cfg), Trigger::Fire);
    }

    #[test]
    fn cooldown_suppresses_second_trigger() {
        let mut e = edge();
        let cfg = EdgeConfig {
            push_back_pixels: 0,
            ..EdgeConfig::default()
        };
        let t0 = Instant::now();
        assert_eq!(e.on_pointer_enter(t0, &cfg), Trigger::Fire);
        assert_eq!(
            e.on_pointer_enter(t0 + Duration::from_millis(250), &cfg),
            Trigger::Suppressed
        );
        assert_eq!(e.on_pointer_enter(t0 + Duration::from_millis(600), &cfg), Trigger::Fire);
    }

    #[test]
    fn touch_triggers_at_full_progress() {
        assert!(!touch_should_trigger(touch_progress(20.0, 100.0)));
        assert!(touch_should_trigger(touch_progress(100.0, 100.0)));
    }

    #[test]
    fn edge_action_name_unknown_maps_to_none() {
        assert_eq!(EdgeAction::from_name("Bogus"), EdgeAction::None);
        assert_eq!(EdgeAction::from_name("KRunner"), EdgeAction::KRunner);
    }
}
