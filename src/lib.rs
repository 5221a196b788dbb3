//! healthcoach — chat orchestrator for a preventive-health coaching backend.
//!
//! Turns a free-text user message into a sequence of calls against the
//! coaching API (health/status, text-to-profile extraction, risk
//! prediction, coaching-plan generation, KB search, PDF rendering) and
//! assembles the results into one markdown reply plus a machine-usable
//! plan. Every upstream failure degrades the reply instead of aborting
//! the turn.
//!
//! Modules:
//! - `backend`: HTTP boundary — config loading, the never-failing client,
//!   per-endpoint payload views
//! - `orchestrator`: command routing, the sequential coaching pipeline,
//!   reply assembly, session state and export

pub mod backend;
pub mod orchestrator;

pub use backend::{ApiResponse, BackendClient, BackendConfig, BackendError, StructuredInput};
pub use orchestrator::{ChatSession, Intent, Orchestrator, RenderOptions, Turn, TurnOutcome};
