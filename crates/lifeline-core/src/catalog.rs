//! The lifecycle event catalog and its matcher.
//!
//! The catalog maps heterogeneous webhook shapes onto a small closed set of
//! canonical lifecycle events. Each entry is a named conjunction of
//! path/value equality conditions over the [`Context`]; recognition is
//! data-driven rather than hand-written conditionals, so the catalog grows
//! by appending entries, never by branching logic.

use crate::context::Context;

/// One path/value equality check against the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub path: &'static [&'static str],
    pub value: &'static str,
}

/// A canonical lifecycle event recognised by ANDed conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDefinition {
    /// Lifecycle stage, e.g. `Change`.
    pub stage: &'static str,
    /// Stage status, e.g. `Initiated`.
    pub status: &'static str,
    /// All conditions must hold for the definition to match.
    pub conditions: &'static [Condition],
    /// Context path that yields the change identifier for a matched event.
    pub change_id_path: &'static [&'static str],
}

impl EventDefinition {
    /// Display name, e.g. `Change Initiated`.
    pub fn name(&self) -> String {
        format!("{} {}", self.stage, self.status)
    }

    /// Whether every condition holds against `context`.
    pub fn matches(&self, context: &Context) -> bool {
        self.conditions
            .iter()
            .all(|c| context.is_match(c.path, c.value))
    }
}

/// Head ref of a pull request, the change identifier for both catalog
/// entries and the highest-priority fallback candidate.
pub const PR_HEAD_REF: &[&str] = &["context", "payload", "pull_request", "head", "ref"];

/// The fixed lifecycle catalog, in match-priority order.
pub const CATALOG: &[EventDefinition] = &[
    // Pull request opened against master.
    EventDefinition {
        stage: "Change",
        status: "Initiated",
        conditions: &[
            Condition {
                path: &["context", "eventName"],
                value: "pull_request",
            },
            Condition {
                path: &["context", "payload", "pull_request", "base", "ref"],
                value: "master",
            },
            Condition {
                path: &["context", "payload", "action"],
                value: "opened",
            },
        ],
        change_id_path: PR_HEAD_REF,
    },
    // Pull request closed against master.
    EventDefinition {
        stage: "Change",
        status: "Succeeded",
        conditions: &[
            Condition {
                path: &["context", "eventName"],
                value: "pull_request",
            },
            Condition {
                path: &["context", "payload", "pull_request", "base", "ref"],
                value: "master",
            },
            Condition {
                path: &["context", "payload", "action"],
                value: "closed",
            },
        ],
        change_id_path: PR_HEAD_REF,
    },
];

/// Find the first catalog definition fully satisfied by `context`.
///
/// First-match-wins by catalog order, even if a later definition would be a
/// larger superset match. This is a deliberate simple policy: entries are
/// ordered by priority when they are appended. No match is a normal outcome
/// signaling fallback, not an error.
pub fn find_event<'a>(
    context: &Context,
    definitions: &'a [EventDefinition],
) -> Option<&'a EventDefinition> {
    definitions.iter().find(|d| d.matches(context))
}
