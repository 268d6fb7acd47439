//! Stage sequencer: the fixed stage priority table, plan sorting and
//! completion detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A named interview phase with its own persona and prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Phone,
    Whiteboard,
    Manager,
    Hr,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Phone, Stage::Whiteboard, Stage::Manager, Stage::Hr];

    /// Priority in the stage table. Lower runs earlier.
    pub fn order(self) -> u8 {
        match self {
            Stage::Phone => 1,
            Stage::Whiteboard => 2,
            Stage::Manager => 3,
            Stage::Hr => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Phone => "phone",
            Stage::Whiteboard => "whiteboard",
            Stage::Manager => "manager",
            Stage::Hr => "hr",
        }
    }

    /// Label used when a stage's handoff note is shown to a later interviewer.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Phone => "Phone Stage",
            Stage::Whiteboard => "Whiteboard Stage",
            Stage::Manager => "Manager Stage",
            Stage::Hr => "HR Stage",
        }
    }

    /// Strict parse of a canonical stage name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "phone" => Some(Stage::Phone),
            "whiteboard" => Some(Stage::Whiteboard),
            "manager" => Some(Stage::Manager),
            "hr" => Some(Stage::Hr),
            _ => None,
        }
    }

    /// Lenient resolution used when picking an interviewer: case-insensitive,
    /// accepts "telephone" and any name containing a stage, and falls back to phone.
    pub fn resolve_loose(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("phone") {
            Stage::Phone
        } else if name.contains("whiteboard") {
            Stage::Whiteboard
        } else if name.contains("manager") {
            Stage::Manager
        } else if name.contains("hr") {
            Stage::Hr
        } else {
            Stage::Phone
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::parse(s).ok_or_else(|| AppError::Validation(format!("Unknown stage '{s}'")))
    }
}

/// Drops unknown names, deduplicates and orders the requested stages by priority.
pub fn sort_stages<S: AsRef<str>>(requested: &[S]) -> Vec<Stage> {
    let mut stages: Vec<Stage> = requested
        .iter()
        .filter_map(|s| Stage::parse(s.as_ref()))
        .collect();
    stages.sort_by_key(|s| s.order());
    stages.dedup();
    stages
}

/// The stage following `current` in the plan, or `None` when `current` is last
/// or not part of the plan.
pub fn next_stage(plan: &[Stage], current: Stage) -> Option<Stage> {
    let idx = plan.iter().position(|s| *s == current)?;
    plan.get(idx + 1).copied()
}

/// Phrases that mark an interviewer wrapping up the stage.
pub const END_KEYWORDS: &[&str] = &[
    "再見",
    "掰掰",
    "bye",
    "結束",
    "感謝您",
    "interview concluded",
];

/// True when the interviewer's reply signals the end of the stage.
pub fn is_stage_finished(reply: &str) -> bool {
    let lowered = reply.to_lowercase();
    END_KEYWORDS.iter().any(|k| lowered.contains(k))
}
