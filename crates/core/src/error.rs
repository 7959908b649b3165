use thiserror::Error;

/// Errors surfaced by the navigation engine's construction paths.
///
/// Runtime outcomes (no path found, timeouts, execution failures) are
/// modeled as result states, not errors; this enum covers genuine
/// misuse that must fail fast.
#[derive(Debug, Error)]
pub enum NavError {
    /// A goal produced a non-finite heuristic value at construction.
    #[error("invalid goal: {0}")]
    InvalidGoal(String),
    /// A path executor was constructed from an empty node sequence.
    #[error("cannot execute an empty path")]
    EmptyPath,
}
