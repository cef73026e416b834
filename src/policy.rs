use std::fmt;
use std::str::FromStr;

/// Outcome of a single handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    Success,
    Error,
}

/// Decides whether a message is deleted from the queue after its handler ran.
///
/// | Policy      | on success | on error |
/// |-------------|------------|----------|
/// | `Always`    | delete     | delete   |
/// | `OnSuccess` | delete     | retain   |
/// | `OnError`   | retain     | delete   |
/// | `Never`     | retain     | retain   |
///
/// A retained message becomes visible again once its visibility timeout
/// expires and is redelivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeletionPolicy {
    Always,
    #[default]
    OnSuccess,
    OnError,
    Never,
}

impl DeletionPolicy {
    pub const fn delete_on_success(self) -> bool {
        matches!(self, DeletionPolicy::Always | DeletionPolicy::OnSuccess)
    }

    pub const fn delete_on_error(self) -> bool {
        matches!(self, DeletionPolicy::Always | DeletionPolicy::OnError)
    }

    pub const fn should_delete(self, outcome: HandlerOutcome) -> bool {
        match outcome {
            HandlerOutcome::Success => self.delete_on_success(),
            HandlerOutcome::Error => self.delete_on_error(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DeletionPolicy::Always => "ALWAYS",
            DeletionPolicy::OnSuccess => "ON_SUCCESS",
            DeletionPolicy::OnError => "ON_ERROR",
            DeletionPolicy::Never => "NEVER",
        }
    }
}

impl fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletionPolicy {
    type Err = String;

    /// Accepts `ALWAYS`, `ON_SUCCESS`, `ON_ERROR` and `NEVER`, ignoring case
    /// and treating `-` like `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "ALWAYS" => Ok(DeletionPolicy::Always),
            "ON_SUCCESS" => Ok(DeletionPolicy::OnSuccess),
            "ON_ERROR" => Ok(DeletionPolicy::OnError),
            "NEVER" => Ok(DeletionPolicy::Never),
            other => Err(format!("unknown deletion policy: {other}")),
        }
    }
}
