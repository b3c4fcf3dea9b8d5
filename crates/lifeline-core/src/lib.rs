//! Lifeline Core Library
//!
//! Normalizes CI/VCS webhook context into canonical lifecycle event bodies.
//! The core is pure and synchronous: it reads a context object plus
//! caller-supplied overrides and produces the record delivered by
//! `lifeline-client`. Absence of derivable data is never an error here.

pub mod body;
pub mod catalog;
pub mod context;
pub mod extract;
pub mod obs;
pub mod telemetry;

pub use body::{construct_body, EventBody, Overrides};
pub use catalog::{find_event, Condition, EventDefinition, CATALOG};
pub use context::{deep_get, deep_get_str, Context};
pub use extract::{infer_branch, infer_commit, infer_repo, sender_login, strip_ref};
pub use telemetry::init_tracing;

/// Lifeline version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
