// Check that the pieces of state this crate persists to disk (spec.md
// §6) round-trip through serde correctly, and that malformed persisted
// data degrades the way §7 requires rather than panicking.
#![cfg(feature = "serde")]

use compositing_wm_core::{
    pure::{
        geometry::Rect,
        rules::{MatchMode, Rule, RuleBook, RuleMode, RuleOutcome, RulePredicate, WindowAttrs},
        screen_edge::{EdgeAction, EdgeConfig},
        subspace::{PersistedSubspaces, SubspaceManager},
        window::{Desktops, MaximizeState, Window, WindowIdentity},
    },
    Error, WinId,
};

fn sample_rule(name: &str) -> Rule {
    Rule {
        name: name.to_string(),
        predicate: RulePredicate {
            title: MatchMode::Unimportant,
            class: MatchMode::Exact("Konsole".to_string()),
            wmclass_complete: false,
            role: MatchMode::Unimportant,
            machine: MatchMode::Unimportant,
        },
        maximize_horizontal: RuleOutcome::default(),
        maximize_vertical: RuleOutcome::default(),
        fullscreen: RuleOutcome::default(),
        skip_taskbar: RuleOutcome::default(),
        no_border: RuleOutcome::default(),
        keep_above: RuleOutcome::default(),
        keep_below: RuleOutcome::default(),
        desktops: RuleOutcome {
            value: Some(vec![1]),
            mode: Some(RuleMode::ForceTemporarily),
        },
    }
}

#[test]
fn window_round_trips_through_json() {
    let mut w = Window::new(WinId::from(7), WindowIdentity::default());
    w.identity.title = "a terminal".into();
    w.desktops = Desktops::one(2);
    w.maximize = MaximizeState::FULL;
    w.geometry.frame = Rect::new(10, 20, 300, 400);

    let json = serde_json::to_string(&w).expect("window must serialize");
    let back: Window = serde_json::from_str(&json).expect("window must deserialize");

    assert_eq!(back.id, w.id);
    assert_eq!(back.identity.title, w.identity.title);
    assert_eq!(back.desktops, w.desktops);
    assert_eq!(back.maximize, w.maximize);
    assert_eq!(back.geometry.frame, w.geometry.frame);
}

#[test]
fn rule_book_round_trips_through_save_and_load() {
    let book = RuleBook::new(vec![sample_rule("konsole-to-desktop-2")]);
    let bytes = book.save().expect("rule book must serialize");

    let loaded = RuleBook::load(&bytes).expect("rule book must deserialize");
    let attrs = WindowAttrs {
        resource_class: "Konsole".into(),
        ..Default::default()
    };
    let resolution = loaded.resolve(&attrs);
    assert_eq!(resolution.desktops, Some(vec![1]));
}

#[test]
fn invalid_rule_json_is_reported_and_does_not_panic() {
    let err = RuleBook::load(b"not json").unwrap_err();
    assert!(matches!(err, Error::InvalidRule { .. }));
}

#[test]
fn subspace_layout_round_trips_through_save_and_load() {
    let mut mgr = SubspaceManager::new(3, 1);
    mgr.set_current(1);

    let persisted = mgr.save();
    let json = serde_json::to_string(&persisted).unwrap();
    let restored: PersistedSubspaces = serde_json::from_str(&json).unwrap();

    let loaded = SubspaceManager::load(&restored).unwrap();
    assert_eq!(loaded.count(), 3);
    assert_eq!(loaded.subspaces()[0].name, mgr.subspaces()[0].name);
}

#[test]
fn subspace_layout_with_zero_count_falls_back_with_error() {
    let broken = PersistedSubspaces {
        count: 0,
        rows: 1,
        names: vec![],
    };
    let err = SubspaceManager::load(&broken).unwrap_err();
    assert!(matches!(err, Error::InvalidSubspaceLayout));
}

#[test]
fn edge_config_round_trips_through_json() {
    let cfg = EdgeConfig {
        push_back_pixels: 3,
        ..EdgeConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let back: EdgeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn unknown_edge_action_name_persists_and_loads_as_none() {
    let action = EdgeAction::from_name("SomeFutureAction");
    let json = serde_json::to_string(&action).unwrap();
    let back: EdgeAction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, EdgeAction::None);
}
