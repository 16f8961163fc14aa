//! The rule book: predicates matched against a static window-attribute
//! snapshot taken at manage time, and the outcomes they force or suggest.
use crate::{Error, Result};
use regex::Regex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a predicate's pattern is compared against a live attribute.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchMode {
    /// The predicate never constrains matching; always satisfied.
    Unimportant,
    Exact(String),
    Substring(String),
    Regex(String),
}

impl MatchMode {
    fn matches(&self, value: &str) -> bool {
        match self {
            MatchMode::Unimportant => true,
            MatchMode::Exact(pat) => value == pat,
            MatchMode::Substring(pat) => value.contains(pat.as_str()),
            MatchMode::Regex(pat) => Regex::new(pat).map(|re| re.is_match(value)).unwrap_or(false),
        }
    }
}

/// A static snapshot of the attributes a rule predicate is matched
/// against, taken once at manage time (rule evaluation is synchronous and
/// pure, never a live backend query).
#[derive(Debug, Clone, Default)]
pub struct WindowAttrs {
    pub title: String,
    pub resource_class: String,
    pub resource_name: String,
    pub role: String,
    pub machine: String,
}

/// The predicate half of a rule.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct RulePredicate {
    pub title: MatchMode,
    pub class: MatchMode,
    /// When set, `class` must also match `resource_name`, not just
    /// `resource_class` (the "whole WM_CLASS" predicate).
    pub wmclass_complete: bool,
    pub role: MatchMode,
    pub machine: MatchMode,
}

impl RulePredicate {
    pub fn matches(&self, attrs: &WindowAttrs) -> bool {
        let class_ok = if self.wmclass_complete {
            self.class.matches(&attrs.resource_class) && self.class.matches(&attrs.resource_name)
        } else {
            self.class.matches(&attrs.resource_class)
        };

        class_ok
            && self.title.matches(&attrs.title)
            && self.role.matches(&attrs.role)
            && self.machine.matches(&attrs.machine)
    }
}

/// How strongly an outcome is applied. Ordering is significant only in
/// that `Unused` never wins resolution; the others are otherwise
/// independent policies rather than a ranked scale.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    /// This rule does not set this property at all.
    Unused,
    /// Leave the property exactly as the client/WM would otherwise set it.
    DontAffect,
    /// Always override, and the client cannot change it afterwards.
    Force,
    /// Set the initial value only; the client/user may change it later.
    Apply,
    /// Like `Apply`, but edits to the property are written back into the
    /// rule itself (debounced) so future matches start from the new value.
    Remember,
    /// Set the initial value only, then the rule deletes itself.
    ApplyNow,
    /// Like `Force`, but the rule deletes itself once the matching window
    /// is withdrawn.
    ForceTemporarily,
}

/// One outcome this rule can set, paired with the mode governing how
/// strongly it applies.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct RuleOutcome<T> {
    pub value: Option<T>,
    pub mode: Option<RuleMode>,
}

impl<T> RuleOutcome<T> {
    fn is_unused(&self) -> bool {
        matches!(self.mode, None | Some(RuleMode::Unused))
    }
}

/// A single named rule: a predicate plus the set of properties it can
/// constrain. Only the properties spec.md calls out explicitly are
/// modeled (maximize/fullscreen/skip-taskbar/desktops/no-border/above/
/// below); others fall back to `DontAffect` implicitly via `Unused`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub predicate: RulePredicate,
    pub maximize_horizontal: RuleOutcome<bool>,
    pub maximize_vertical: RuleOutcome<bool>,
    pub fullscreen: RuleOutcome<bool>,
    pub skip_taskbar: RuleOutcome<bool>,
    pub no_border: RuleOutcome<bool>,
    pub keep_above: RuleOutcome<bool>,
    pub keep_below: RuleOutcome<bool>,
    pub desktops: RuleOutcome<Vec<usize>>,
}

/// A pure snapshot of the outcomes a rule applied to one window, carried
/// on `Window::rules` so later setters can tell whether a property is
/// presently force-governed by a rule (and therefore rejects user edits).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSnapshot {
    pub applied_rule: Option<String>,
    pub forces_maximize_horizontal: bool,
    pub forces_maximize_vertical: bool,
    pub forces_fullscreen: bool,
    pub forces_skip_taskbar: bool,
    pub forces_no_border: bool,
    pub forces_keep_above: bool,
    pub forces_keep_below: bool,
    pub forces_desktops: bool,
}

/// Outcome of matching the rule book against one window: the first
/// applicable value for each property (first non-`Unused` rule wins,
/// independently per property) plus which rules, if any, must now
/// self-delete.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub maximize_horizontal: Option<bool>,
    pub maximize_vertical: Option<bool>,
    pub fullscreen: Option<bool>,
    pub skip_taskbar: Option<bool>,
    pub no_border: Option<bool>,
    pub keep_above: Option<bool>,
    pub keep_below: Option<bool>,
    pub desktops: Option<Vec<usize>>,
    pub snapshot: RuleSnapshot,
    /// Indices into the rule book's vector that applied `ApplyNow` and
    /// must be removed after this resolution is consumed.
    pub apply_now_to_delete: Vec<usize>,
    /// Indices that applied `ForceTemporarily`; tracked per-window by the
    /// caller and removed when the window withdraws.
    pub force_temporarily_applied: Vec<usize>,
}

/// An ordered collection of rules, evaluated first-match-wins per
/// property against every newly managed or re-matched window.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    rules: Vec<Rule>,
}

macro_rules! resolve_property {
    ($self:expr, $attrs:expr, $resolution:expr, $field:ident, $out_field:ident, $force_flag:ident) => {
        for (i, rule) in $self.rules.iter().enumerate() {
            if !rule.predicate.matches($attrs) {
                continue;
            }
            let outcome = &rule.$field;
            if outcome.is_unused() {
                continue;
            }
            if $resolution.$out_field.is_some() {
                break;
            }
            $resolution.$out_field = outcome.value.clone();
            $resolution.snapshot.applied_rule.get_or_insert_with(|| rule.name.clone());
            match outcome.mode {
                Some(RuleMode::Force) => $resolution.snapshot.$force_flag = true,
                Some(RuleMode::ForceTemporarily) => {
                    $resolution.snapshot.$force_flag = true;
                    $resolution.force_temporarily_applied.push(i);
                }
                Some(RuleMode::ApplyNow) => $resolution.apply_now_to_delete.push(i),
                _ => {}
            }
            break;
        }
    };
}

impl RuleBook {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Resolve every property independently: for each, walk the rules in
    /// order and take the first one that does not say `Unused`.
    pub fn resolve(&self, attrs: &WindowAttrs) -> Resolution {
        let mut res = Resolution::default();
        resolve_property!(self, attrs, res, maximize_horizontal, maximize_horizontal, forces_maximize_horizontal);
        resolve_property!(self, attrs, res, maximize_vertical, maximize_vertical, forces_maximize_vertical);
        resolve_property!(self, attrs, res, fullscreen, fullscreen, forces_fullscreen);
        resolve_property!(self, attrs, res, skip_taskbar, skip_taskbar, forces_skip_taskbar);
        resolve_property!(self, attrs, res, no_border, no_border, forces_no_border);
        resolve_property!(self, attrs, res, keep_above, keep_above, forces_keep_above);
        resolve_property!(self, attrs, res, keep_below, keep_below, forces_keep_below);
        resolve_property!(self, attrs, res, desktops, desktops, forces_desktops);
        res
    }

    /// Remove the rules a resolution marked for `ApplyNow` self-deletion.
    /// Indices are taken from the same `self.rules` the resolution was
    /// computed against; callers must not mutate the book in between.
    pub fn apply_now_cleanup(&mut self, mut indices: Vec<usize>) {
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        for i in indices {
            if i < self.rules.len() {
                self.rules.remove(i);
            }
        }
    }

    /// Drop a `ForceTemporarily` rule once its matching window withdraws.
    pub fn force_temporarily_cleanup(&mut self, index: usize) {
        if index < self.rules.len() {
            self.rules.remove(index);
        }
    }

    /// Edit a `Remember`-mode rule's stored value in place. Returns
    /// whether the rule book changed and therefore needs a debounced
    /// write-back.
    pub fn remember(&mut self, rule_name: &str, apply: impl FnOnce(&mut Rule)) -> bool {
        if let Some(rule) = self.rules.iter_mut().find(|r| r.name == rule_name) {
            apply(rule);
            true
        } else {
            false
        }
    }
}

#[cfg(feature = "serde")]
impl RuleBook {
    pub fn load(data: &[u8]) -> Result<Self> {
        let rules: Vec<Rule> =
            serde_json::from_slice(data).map_err(|e| Error::InvalidRule { reason: e.to_string() })?;
        Ok(Self::new(rules))
    }

    pub fn save(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.rules).map_err(|e| Error::InvalidRule { reason: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, class: &str, maximize: Option<(bool, RuleMode)>) -> Rule {
        Rule {
            name: name.to_string(),
            predicate: RulePredicate {
                title: MatchMode::Unimportant,
                class: MatchMode::Exact(class.to_string()),
                wmclass_complete: false,
                role: MatchMode::Unimportant,
                machine: MatchMode::Unimportant,
            },
            maximize_horizontal: RuleOutcome {
                value: maximize.map(|(v, _)| v),
                mode: maximize.map(|(_, m)| m),
            },
            maximize_vertical: RuleOutcome::default(),
            fullscreen: RuleOutcome::default(),
            skip_taskbar: RuleOutcome::default(),
            no_border: RuleOutcome::default(),
            keep_above: RuleOutcome::default(),
            keep_below: RuleOutcome::default(),
            desktops: RuleOutcome::default(),
        }
    }

    #[test]
    fn first_non_unused_rule_wins() {
        let book = RuleBook::new(vec![
            rule("a", "Foo", None),
            rule("b", "Foo", Some((true, RuleMode::Apply))),
            rule("c", "Foo", Some((false, RuleMode::Apply))),
        ]);
        let attrs = WindowAttrs {
            resource_class: "Foo".into(),
            ..Default::default()
        };
        let res = book.resolve(&attrs);
        assert_eq!(res.maximize_horizontal, Some(true));
        assert_eq!(res.snapshot.applied_rule.as_deref(), Some("b"));
    }

    #[test]
    fn apply_now_is_marked_for_cleanup() {
        let book = RuleBook::new(vec![rule("a", "Foo", Some((true, RuleMode::ApplyNow)))]);
        let attrs = WindowAttrs {
            resource_class: "Foo".into(),
            ..Default::default()
        };
        let res = book.resolve(&attrs);
        assert_eq!(res.apply_now_to_delete, vec![0]);
    }

    #[test]
    fn force_sets_snapshot_flag() {
        let book = RuleBook::new(vec![rule("a", "Foo", Some((true, RuleMode::Force)))]);
        let attrs = WindowAttrs {
            resource_class: "Foo".into(),
            ..Default::default()
        };
        let res = book.resolve(&attrs);
        assert!(res.snapshot.forces_maximize_horizontal);
    }

    #[test]
    fn non_matching_class_does_not_apply() {
        let book = RuleBook::new(vec![rule("a", "Foo", Some((true, RuleMode::Apply)))]);
        let attrs = WindowAttrs {
            resource_class: "Bar".into(),
            ..Default::default()
        };
        let res = book.resolve(&attrs);
        assert_eq!(res.maximize_horizontal, None);
    }
}
