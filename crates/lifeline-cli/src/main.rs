//! Lifeline - CI/VCS lifecycle event forwarder
//!
//! The `lifeline` command reads the triggering event context (name, payload
//! file, workflow ref/sha) plus optional explicit overrides, normalizes
//! them into a canonical event body, and posts it to the events API.
//!
//! All inputs fall back to the environment variables a CI runner exports
//! (`GITHUB_EVENT_NAME`, `GITHUB_EVENT_PATH`, ...), so inside a workflow the
//! bare command usually suffices:
//!
//! ```text
//! lifeline send --team-id my-team --token $EVENTS_TOKEN
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn, Level};

use lifeline_client::{
    ApiConfig, DeliveryOutcome, EventSink, EventsClient, DEFAULT_EVENTS_URL,
};
use lifeline_core::{
    construct_body, extract, Context, EventBody, Overrides,
};

#[derive(Parser)]
#[command(name = "lifeline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Forward CI/VCS lifecycle events to the Lifeline events API", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the triggering event and deliver it
    Send(SendArgs),
}

#[derive(Args)]
struct SendArgs {
    /// Team identifier issued alongside the API token
    #[arg(long, env = "LIFELINE_TEAM_ID", default_value = "")]
    team_id: String,

    /// Events API token (never logged)
    #[arg(long, env = "LIFELINE_API_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Events API endpoint
    #[arg(long, env = "LIFELINE_EVENTS_URL", default_value = DEFAULT_EVENTS_URL)]
    endpoint: String,

    /// Name of the triggering event (e.g. push, pull_request)
    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "")]
    event_name: String,

    /// Path to the JSON event payload file
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Workflow-level git ref
    #[arg(long, env = "GITHUB_REF")]
    git_ref: Option<String>,

    /// Workflow-level commit SHA
    #[arg(long, env = "GITHUB_SHA")]
    sha: Option<String>,

    /// Explicit change identifier (identity field)
    #[arg(long)]
    change_id: Option<String>,

    /// Explicit free-form metadata, JSON or plain string (identity field)
    #[arg(long)]
    custom: Option<String>,

    /// Explicit pipeline identifier (identity field)
    #[arg(long)]
    pipeline_id: Option<String>,

    /// Explicit lifecycle stage (identity field)
    #[arg(long)]
    stage: Option<String>,

    /// Explicit stage status (identity field)
    #[arg(long)]
    status: Option<String>,

    /// Print the constructed body instead of delivering it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    lifeline_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Send(args) => cmd_send(args).await,
    }
}

async fn cmd_send(args: SendArgs) -> Result<()> {
    let config = ApiConfig::new(&args.endpoint, &args.token)?;

    if args.team_id.is_empty() {
        warn!("team_id is empty; the events API may not attribute this event");
    }

    let context = load_context(&args)?;
    log_trigger_source(&context);

    let overrides = Overrides {
        change_id: non_empty(args.change_id.clone()),
        custom: parse_custom(args.custom.as_deref()),
        pipeline_id: non_empty(args.pipeline_id.clone()),
        stage: non_empty(args.stage.clone()),
        status: non_empty(args.status.clone()),
    };

    let body = construct_body(&overrides, &args.team_id, &context);

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let client = EventsClient::new(config)?;
    deliver(&client, &body).await
}

/// Deliver the body and translate the outcome into process success/failure.
/// This is the single place a failed run is decided.
async fn deliver(sink: &dyn EventSink, body: &EventBody) -> Result<()> {
    let outcome = sink
        .deliver(body)
        .await
        .context("Failed to deliver event to the events API")?;

    match outcome {
        DeliveryOutcome::Accepted(response) => {
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        DeliveryOutcome::Rejected {
            status,
            status_text,
        } => bail!("events API rejected the delivery: {status} {status_text}"),
    }
}

/// Assemble the event context from the CLI inputs. A missing payload file
/// argument yields an empty payload rather than a failure, so the command
/// still works outside a CI runner.
fn load_context(args: &SendArgs) -> Result<Context> {
    let payload = match &args.event_path {
        Some(path) => read_payload(path)?,
        None => Value::Object(serde_json::Map::new()),
    };
    Ok(Context::from_parts(
        &args.event_name,
        payload,
        args.git_ref.as_deref().filter(|r| !r.is_empty()),
        args.sha.as_deref().filter(|s| !s.is_empty()),
    ))
}

fn read_payload(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event payload file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Event payload is not valid JSON: {}", path.display()))
}

/// Log what the extractor can infer about the trigger, for diagnosis of
/// mismatched deliveries.
fn log_trigger_source(context: &Context) {
    let (Some(name), Some(payload)) = (context.event_name(), context.payload()) else {
        return;
    };
    info!(
        event_name = %name,
        branch = extract::infer_branch(name, payload).as_deref().unwrap_or(""),
        commit = extract::infer_commit(name, payload).as_deref().unwrap_or(""),
        repo = extract::infer_repo(payload).as_deref().unwrap_or(""),
        user = extract::sender_login(payload).as_deref().unwrap_or(""),
        "resolved trigger context",
    );
}

/// CI runners pass unset inputs as empty strings; map those to "nothing
/// provided" so the core sees a single absent representation.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// A custom override may be a JSON document or a plain string; an empty
/// value is no value at all.
fn parse_custom(raw: Option<&str>) -> Option<Value> {
    let raw = raw.filter(|v| !v.is_empty())?;
    Some(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeline_client::fakes::{FailingSink, StaticSink};
    use serde_json::json;

    fn send_args() -> SendArgs {
        SendArgs {
            team_id: "team-id-test1".into(),
            token: "tok".into(),
            endpoint: DEFAULT_EVENTS_URL.into(),
            event_name: "pull_request".into(),
            event_path: None,
            git_ref: None,
            sha: None,
            change_id: None,
            custom: None,
            pipeline_id: None,
            stage: None,
            status: None,
            dry_run: false,
        }
    }

    #[test]
    fn non_empty_maps_empty_to_none() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn parse_custom_accepts_json_and_plain_strings() {
        assert_eq!(parse_custom(None), None);
        assert_eq!(parse_custom(Some("")), None);
        assert_eq!(parse_custom(Some(r#"{"k":1}"#)), Some(json!({"k": 1})));
        assert_eq!(
            parse_custom(Some("plain text")),
            Some(Value::String("plain text".into()))
        );
    }

    #[test]
    fn load_context_reads_payload_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(
            &path,
            r#"{"action":"closed","pull_request":{"base":{"ref":"master"},"head":{"ref":"branch1"}}}"#,
        )
        .unwrap();

        let mut args = send_args();
        args.event_path = Some(path);
        args.git_ref = Some("refs/heads/master".into());

        let context = load_context(&args).unwrap();
        assert_eq!(context.event_name(), Some("pull_request"));
        assert_eq!(context.action(), Some("closed"));
        assert_eq!(context.git_ref(), Some("refs/heads/master"));
    }

    #[test]
    fn load_context_rejects_malformed_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut args = send_args();
        args.event_path = Some(path);

        let err = load_context(&args).unwrap_err();
        assert!(format!("{err:#}").contains("not valid JSON"));
    }

    #[test]
    fn load_context_without_payload_file_is_empty_payload() {
        let context = load_context(&send_args()).unwrap();
        assert_eq!(context.payload(), Some(&json!({})));
    }

    fn body() -> EventBody {
        EventBody {
            stage: Some("Change".into()),
            status: Some("Initiated".into()),
            change_id: Some("branch1".into()),
            team_id: "team-a".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn accepted_delivery_succeeds() {
        let sink = StaticSink::accepting(json!({"id": "ev-1"}));
        assert!(deliver(&sink, &body()).await.is_ok());
        assert_eq!(sink.deliveries().len(), 1);
    }

    #[tokio::test]
    async fn rejected_delivery_fails_the_run_with_status() {
        let sink = StaticSink::rejecting(403, "Forbidden");
        let err = deliver(&sink, &body()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("403"), "unexpected error: {msg}");
        assert!(msg.contains("Forbidden"), "unexpected error: {msg}");
    }

    #[tokio::test]
    async fn transport_failure_is_funneled_to_one_handler() {
        let err = deliver(&FailingSink, &body()).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to deliver event"));
    }
}
