//! Orchestration core — turns one user message into backend calls and a reply.
//!
//! Submodules:
//! - `router`: Classifies a message into an intent (health / KB / coaching)
//! - `pipeline`: Sequential extract → predict → coach pipeline with
//!   partial-failure tolerance
//! - `reply`: Markdown reply assembly and formatting constants
//! - `session`: Per-session history, the current plan, and PDF export
//! - `types`: Shared types across the orchestrator

pub mod pipeline;
pub mod reply;
pub mod router;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use pipeline::Orchestrator;
pub use router::Intent;
pub use session::ChatSession;
pub use types::{RenderOptions, Turn, TurnOutcome};
