//! Best-effort branch/commit/repo inference from event payloads.
//!
//! Each webhook event type stores its source ref and commit somewhere
//! different; these dispatch tables encode exactly which nested payload
//! path yields each value. Unrecognised event names yield `None`, never an
//! error: callers treat absence as "nothing to infer".

use serde_json::Value;

use crate::context::{deep_get, deep_get_str};

/// Strip the `refs/heads/` or `refs/tags/` prefix from a git ref.
///
/// A `refs/`-prefixed value with other than the expected 3 slash-separated
/// segments is returned unchanged; so is anything not starting with
/// `refs/`.
pub fn strip_ref(raw: &str) -> &str {
    if raw.starts_with("refs/") {
        let segments: Vec<&str> = raw.split('/').collect();
        if segments.len() == 3 && (segments[1] == "heads" || segments[1] == "tags") {
            return segments[2];
        }
    }
    raw
}

/// Infer the branch for `event_name` from its payload.
pub fn infer_branch(event_name: &str, payload: &Value) -> Option<String> {
    let raw = match event_name {
        "push" => deep_get_str(payload, &["ref"]),
        "pull_request" => deep_get_str(payload, &["pull_request", "base", "ref"]),
        "deployment" | "deployment_status" => deep_get_str(payload, &["deployment", "ref"]),
        "package" => deep_get_str(
            payload,
            &["package", "package_version", "release", "target_commitish"],
        ),
        "release" => deep_get_str(payload, &["release", "target_commitish"]),
        "status" => deep_get(payload, &["branches"])?
            .as_array()?
            .first()?
            .get("name")?
            .as_str(),
        _ => None,
    }?;
    Some(strip_ref(raw).to_string())
}

/// Infer the commit SHA for `event_name` from its payload.
pub fn infer_commit(event_name: &str, payload: &Value) -> Option<String> {
    let sha = match event_name {
        "push" => deep_get_str(payload, &["after"]),
        "pull_request" => deep_get_str(payload, &["pull_request", "head", "sha"]),
        "deployment" | "deployment_status" => deep_get_str(payload, &["deployment", "sha"]),
        "package" => deep_get_str(
            payload,
            &["package", "package_version", "release", "target_commitish"],
        ),
        "release" => deep_get_str(payload, &["release", "target_commitish"]),
        "status" => deep_get_str(payload, &["sha"]),
        _ => None,
    }?;
    Some(sha.to_string())
}

/// The repository full name (`org/repo`), present on every event type.
pub fn infer_repo(payload: &Value) -> Option<String> {
    deep_get_str(payload, &["repository", "full_name"]).map(str::to_string)
}

/// Login of the user who triggered the event, when the payload carries one.
pub fn sender_login(payload: &Value) -> Option<String> {
    deep_get_str(payload, &["sender", "login"]).map(str::to_string)
}
