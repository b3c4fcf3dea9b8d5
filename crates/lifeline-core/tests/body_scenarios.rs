//! End-to-end body construction scenarios over realistic webhook contexts.

use lifeline_core::{construct_body, infer_branch, infer_commit, infer_repo, Context, Overrides};
use serde_json::{json, Value};

fn pr_context(action: &str) -> Value {
    json!({
        "context": {
            "eventName": "pull_request",
            "payload": {
                "action": action,
                "pull_request": {
                    "base": { "ref": "master" },
                    "head": { "ref": "branch1" }
                }
            },
            "ref": "master"
        }
    })
}

#[test]
fn opened_pull_request_becomes_change_initiated() {
    let raw = pr_context("opened");
    let ctx = Context::from_value(raw.clone());
    let body = construct_body(&Overrides::default(), "team-id-123", &ctx);

    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "stage": "Change",
            "status": "Initiated",
            "change_id": "branch1",
            "team_id": "team-id-123",
            "custom": raw
        })
    );
}

#[test]
fn closed_pull_request_becomes_change_succeeded() {
    let raw = pr_context("closed");
    let ctx = Context::from_value(raw.clone());
    let body = construct_body(&Overrides::default(), "team-id-123", &ctx);

    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "stage": "Change",
            "status": "Succeeded",
            "change_id": "branch1",
            "team_id": "team-id-123",
            "custom": raw
        })
    );
}

#[test]
fn unrecognised_event_passes_through() {
    let raw = json!({
        "context": {
            "eventName": "arbitrary_event",
            "payload": { "action": "unknown_action" },
            "ref": "master"
        }
    });
    let ctx = Context::from_value(raw.clone());
    let body = construct_body(&Overrides::default(), "team-id-123", &ctx);

    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "stage": "arbitrary_event",
            "status": "unknown_action",
            "change_id": "master",
            "team_id": "team-id-123",
            "custom": raw
        })
    );
}

#[test]
fn empty_string_overrides_fall_back_to_context() {
    // The input layer maps empty strings to None, so all-empty overrides
    // behave exactly like no overrides at all.
    let raw = pr_context("closed");
    let ctx = Context::from_value(raw.clone());
    let body = construct_body(&Overrides::default(), "team-id-test1", &ctx);

    assert_eq!(body.stage.as_deref(), Some("Change"));
    assert_eq!(body.status.as_deref(), Some("Succeeded"));
    assert_eq!(body.change_id.as_deref(), Some("branch1"));
    assert_eq!(body.team_id, "team-id-test1");
    assert_eq!(body.custom, raw);
}

#[test]
fn identity_precedence_holds_for_each_field_alone() {
    let ctx = Context::from_value(pr_context("opened"));
    let cases = [
        Overrides {
            change_id: Some("c".into()),
            ..Default::default()
        },
        Overrides {
            custom: Some(json!({"x": 1})),
            ..Default::default()
        },
        Overrides {
            pipeline_id: Some("p".into()),
            ..Default::default()
        },
        Overrides {
            stage: Some("s".into()),
            ..Default::default()
        },
        Overrides {
            status: Some("st".into()),
            ..Default::default()
        },
    ];

    for overrides in cases {
        let body = construct_body(&overrides, "team-a", &ctx);
        assert_eq!(body.stage, overrides.stage, "overrides: {overrides:?}");
        assert_eq!(body.status, overrides.status, "overrides: {overrides:?}");
        assert_eq!(body.change_id, overrides.change_id, "overrides: {overrides:?}");
        assert_eq!(
            body.pipeline_id, overrides.pipeline_id,
            "overrides: {overrides:?}"
        );
        // The matched catalog entry must not leak into an explicit body.
        assert_ne!(body.stage.as_deref(), Some("Change"));
    }
}

#[test]
fn push_event_extraction() {
    let payload = json!({
        "ref": "refs/heads/main",
        "after": "12345",
        "repository": { "full_name": "org/test" }
    });
    assert_eq!(infer_branch("push", &payload).as_deref(), Some("main"));
    assert_eq!(infer_commit("push", &payload).as_deref(), Some("12345"));
    assert_eq!(infer_repo(&payload).as_deref(), Some("org/test"));
}
