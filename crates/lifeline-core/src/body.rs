//! Canonical event body construction.
//!
//! The body constructor decides between two sources, all-or-nothing: when
//! the caller supplied any identity field (`change_id`, `custom`,
//! `pipeline_id`, `stage`, `status`), every field is taken verbatim from the
//! caller; only when none are supplied does the whole body fall back to
//! context-derived inference. Explicit and inferred values are never mixed
//! per-field.
//!
//! Construction is a pure function of its inputs: it never mutates the
//! context, never performs I/O, and never fails: underivable fields
//! surface as `null` or empty strings, not errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{find_event, CATALOG, PR_HEAD_REF};
use crate::context::Context;
use crate::extract::infer_branch;
use crate::obs;

/// Caller-supplied field overrides. `None` uniformly means "nothing
/// provided": the input layer maps empty strings to `None` before the core
/// ever sees them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub change_id: Option<String>,
    pub custom: Option<Value>,
    pub pipeline_id: Option<String>,
    pub stage: Option<String>,
    pub status: Option<String>,
}

impl Overrides {
    /// Whether any identity field is present. Presence of any one signals
    /// that the caller wants all fields taken verbatim.
    pub fn has_identity(&self) -> bool {
        self.change_id.is_some()
            || self.pipeline_id.is_some()
            || self.stage.is_some()
            || self.status.is_some()
            || custom_present(&self.custom)
    }
}

/// An empty or null `custom` does not count as caller input; the sink API
/// requires `null` there rather than an empty representation.
fn custom_present(custom: &Option<Value>) -> bool {
    match custom {
        None => false,
        Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// The normalized record delivered to the events endpoint.
///
/// Schema note: this is the identity-precedence generation of the events
/// API (`stage`/`status`/`change_id`/`pipeline_id`/`custom`); see DESIGN.md
/// for the generation pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,
    pub team_id: String,
    pub custom: Value,
}

impl Default for EventBody {
    fn default() -> Self {
        Self {
            stage: None,
            status: None,
            change_id: None,
            pipeline_id: None,
            team_id: String::new(),
            custom: Value::Null,
        }
    }
}

/// Construct the canonical event body from caller overrides and context.
pub fn construct_body(overrides: &Overrides, team_id: &str, context: &Context) -> EventBody {
    if overrides.has_identity() {
        let custom = if custom_present(&overrides.custom) {
            overrides.custom.clone().unwrap_or(Value::Null)
        } else {
            Value::Null
        };
        obs::emit_body_constructed("explicit", overrides.stage.as_deref(), overrides.status.as_deref());
        return EventBody {
            stage: overrides.stage.clone(),
            status: overrides.status.clone(),
            change_id: overrides.change_id.clone(),
            pipeline_id: overrides.pipeline_id.clone(),
            team_id: team_id.to_string(),
            custom,
        };
    }

    body_from_context(team_id, context)
}

/// Best-effort body derived entirely from the context, used when the caller
/// supplied nothing. The full context rides along in `custom`.
fn body_from_context(team_id: &str, context: &Context) -> EventBody {
    if let Some(def) = find_event(context, CATALOG) {
        obs::emit_event_matched(&def.name());
        obs::emit_body_constructed("catalog", Some(def.stage), Some(def.status));
        let change_id = context
            .get_str(def.change_id_path)
            .unwrap_or_default()
            .to_string();
        return EventBody {
            stage: Some(def.stage.to_string()),
            status: Some(def.status.to_string()),
            change_id: Some(change_id),
            pipeline_id: None,
            team_id: team_id.to_string(),
            custom: context.as_value().clone(),
        };
    }

    // Generic passthrough for everything the catalog does not recognise.
    // Change-id candidates in rising priority; the last one found wins.
    let mut change_id = String::new();
    if let (Some(name), Some(payload)) = (context.event_name(), context.payload()) {
        if let Some(branch) = infer_branch(name, payload) {
            change_id = branch;
        }
    }
    if let Some(git_ref) = context.git_ref() {
        change_id = git_ref.to_string();
    }
    if let Some(head_ref) = context.get_str(PR_HEAD_REF) {
        change_id = head_ref.to_string();
    }

    let stage = context.event_name().map(str::to_string);
    let status = context.action().map(str::to_string);
    obs::emit_body_constructed("passthrough", stage.as_deref(), status.as_deref());

    EventBody {
        stage,
        status,
        change_id: Some(change_id),
        pipeline_id: None,
        team_id: team_id.to_string(),
        custom: context.as_value().clone(),
    }
}
