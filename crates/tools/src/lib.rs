//! Developer Tooling: read-only inspection of a running session.

mod inspector;

pub use inspector::{SessionInspector, SessionSummary};
