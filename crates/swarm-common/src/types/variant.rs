//! AgentVariant - behavioural family of a simulated agent
//!
//! The variant decides two things at creation time:
//! - the ranges reliability and stake-willingness are drawn from
//! - the completion policy the agent follows for its whole life

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique agent identifier, sequential from 0 within a population
pub type AgentId = u32;

/// Behavioural variant of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentVariant {
    /// Completes with a high, fixed probability
    Reliable,
    /// Completes with a low, fixed probability
    Unreliable,
    /// Defects more often the higher the counterparty is rated
    Malicious,
    /// Prefers counterparties inside its own rating band
    Selective,
}

impl AgentVariant {
    /// All variants, in population construction order
    pub const ALL: [AgentVariant; 4] = [
        AgentVariant::Reliable,
        AgentVariant::Unreliable,
        AgentVariant::Malicious,
        AgentVariant::Selective,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentVariant::Reliable => "reliable",
            AgentVariant::Unreliable => "unreliable",
            AgentVariant::Malicious => "malicious",
            AgentVariant::Selective => "selective",
        }
    }
}

impl std::fmt::Display for AgentVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reliable" => Ok(AgentVariant::Reliable),
            "unreliable" => Ok(AgentVariant::Unreliable),
            "malicious" => Ok(AgentVariant::Malicious),
            "selective" => Ok(AgentVariant::Selective),
            other => Err(format!("unknown agent variant: {}", other)),
        }
    }
}
