//! Shared types for the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── RenderOptions ───────────────────────────────────────────────────────────

/// Display toggles passed into every orchestration call by the shell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Show the model's driver labels under the score line.
    pub show_drivers: bool,
    /// Include KB citations under the plan.
    pub include_citations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_drivers: true,
            include_citations: true,
        }
    }
}

// ─── Turn outcome ────────────────────────────────────────────────────────────

/// Result of one orchestrated turn: the assembled reply plus the
/// normalized plan list (empty for diagnostic and KB turns).
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reply: String,
    pub plan: Vec<String>,
}

impl TurnOutcome {
    /// A reply-only outcome with no plan attached.
    pub fn reply_only(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            plan: Vec::new(),
        }
    }
}

// ─── Turn ────────────────────────────────────────────────────────────────────

/// One exchange stored in session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// The raw user message.
    pub user: String,
    /// The assembled reply text.
    pub reply: String,
    /// The plan produced in this turn (possibly empty).
    pub plan: Vec<String>,
    /// When the turn completed.
    pub timestamp: DateTime<Utc>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
