//! Backend Client — HTTP boundary for the coaching API.
//!
//! This module handles all communication with the backend service:
//! - Configuration loading from `coach.yaml`
//! - The never-failing `call` primitive (one attempt, no retry)
//! - Typed per-endpoint payload views with safe-default accessors
//!
//! The client speaks plain JSON over HTTP, making the backend address a
//! config change, not a code change. Request-time failures never surface
//! as `Err`: they are folded into the returned `ApiResponse` so the
//! pipeline can degrade instead of aborting.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-exports for convenience
pub use client::BackendClient;
pub use config::BackendConfig;
pub use errors::BackendError;
pub use types::{ApiResponse, CoachingPlan, KbHit, Prediction, StructuredInput};
