use serde::{Deserialize, Serialize};
use std::fmt;

/// A user objective that passed intake
///
/// The text is kept exactly as typed; only blank input is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Goal(String);

impl Goal {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Goal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Goal intake
pub struct GoalIntake;

impl GoalIntake {
    /// Returns `None` for empty or whitespace-only input.
    pub fn accept(raw: impl Into<String>) -> Option<Goal> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Goal(raw))
        }
    }
}
