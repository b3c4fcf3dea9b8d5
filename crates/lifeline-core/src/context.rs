//! Duck-typed access to the triggering event context.
//!
//! The context is the deeply nested JSON object describing the CI/VCS event
//! that triggered the run: `{ "context": { "eventName": ..., "payload": ...,
//! "ref": ..., "sha": ... } }`. Its shape varies by event type and is never
//! validated against a schema, so all access goes through a single safe
//! deep-get that resolves missing intermediate keys to `None` instead of
//! failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The triggering event context. Read-only to the core; constructed once per
/// invocation by the input layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Value);

impl Context {
    /// Wrap a raw context value as received from the trigger source.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Assemble the canonical wrapper shape from its parts.
    ///
    /// `git_ref` and `sha` are the top-level workflow ref/sha, distinct from
    /// anything inside the event payload.
    pub fn from_parts(
        event_name: &str,
        payload: Value,
        git_ref: Option<&str>,
        sha: Option<&str>,
    ) -> Self {
        let mut inner = serde_json::Map::new();
        inner.insert("eventName".into(), Value::String(event_name.into()));
        inner.insert("payload".into(), payload);
        if let Some(r) = git_ref {
            inner.insert("ref".into(), Value::String(r.into()));
        }
        if let Some(s) = sha {
            inner.insert("sha".into(), Value::String(s.into()));
        }
        let mut outer = serde_json::Map::new();
        outer.insert("context".into(), Value::Object(inner));
        Self(Value::Object(outer))
    }

    /// The raw JSON value, used when the whole context is embedded in an
    /// event body.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the context, yielding the raw JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Resolve `path` by descending one key at a time. Any absent
    /// intermediate key resolves the whole lookup to `None`; this never
    /// fails on malformed or partial contexts.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        deep_get(&self.0, path)
    }

    /// String view of a resolved leaf. `None` when the path is absent or the
    /// leaf is not a JSON string.
    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Whether the value at `path` is a string strictly equal to `expected`.
    /// A missing path is an ordinary non-match, never an error.
    pub fn is_match(&self, path: &[&str], expected: &str) -> bool {
        self.get_str(path) == Some(expected)
    }

    /// Name of the triggering event, e.g. `pull_request`.
    pub fn event_name(&self) -> Option<&str> {
        self.get_str(&["context", "eventName"])
    }

    /// The event payload sub-object.
    pub fn payload(&self) -> Option<&Value> {
        self.get(&["context", "payload"])
    }

    /// The payload action, e.g. `opened`.
    pub fn action(&self) -> Option<&str> {
        self.get_str(&["context", "payload", "action"])
    }

    /// The top-level workflow ref, when the trigger source supplied one.
    pub fn git_ref(&self) -> Option<&str> {
        self.get_str(&["context", "ref"])
    }
}

/// Safe deep-get over an arbitrary JSON value. Shared by the catalog
/// matcher and the field extractor so tolerant access lives in one place
/// instead of scattered null-checks.
pub fn deep_get<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// String view of [`deep_get`].
pub fn deep_get_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    deep_get(value, path)?.as_str()
}
