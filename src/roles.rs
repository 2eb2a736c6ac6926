//! Known agent roles and owner labels.
//!
//! Writes are attributed to an explicit owner string.  For callers that
//! only have an ambient label (a task or worker name) [`owner_from_label`]
//! maps it onto one of the known roles on a best-effort basis.

use std::fmt;

/// Owner label used when no role can be determined.
pub const UNKNOWN_OWNER: &str = "unknown";

/// The fixed set of agent roles in a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Analyst,
    Architect,
    Developer,
}

impl AgentRole {
    pub const ALL: [AgentRole; 3] = [AgentRole::Analyst, AgentRole::Architect, AgentRole::Developer];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Analyst => "analyst",
            AgentRole::Architect => "architect",
            AgentRole::Developer => "developer",
        }
    }

    /// First role whose name occurs (case-insensitively) in `label`.
    pub fn from_label(label: &str) -> Option<AgentRole> {
        let lower = label.to_lowercase();
        Self::ALL.into_iter().find(|r| lower.contains(r.as_str()))
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heuristic owner for an ambient label, defaulting to [`UNKNOWN_OWNER`].
pub fn owner_from_label(label: &str) -> &'static str {
    AgentRole::from_label(label)
        .map(|r| r.as_str())
        .unwrap_or(UNKNOWN_OWNER)
}
