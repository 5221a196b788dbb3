//! Pipeline Orchestrator — the sequential coaching call pipeline.
//!
//! The defining property is partial-failure tolerance: every upstream call
//! may fail or come back incomplete, and the turn still produces a reply.
//! Extraction failure substitutes the documented default profile, a failed
//! prediction leaves the score line as N/D, and a failed coaching call
//! leaves the plan empty. Calls within one run are strictly sequential —
//! extraction output feeds prediction input, and prediction/goal feed
//! coaching input, so no parallel fan-out is safe.

use std::time::Instant;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::backend::types::{CoachingPlan, KbHit, Prediction, StructuredInput};
use crate::backend::{BackendClient, BackendConfig, BackendError};

use super::reply;
use super::router::Intent;
use super::types::{RenderOptions, TurnOutcome};

/// Goal marker: an "objetivo/meta/goal:" phrase in the message; the
/// trailing text after the colon is the goal.
static GOAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:objetivo|meta|goal)\s*:\s*(.+)$").expect("valid goal pattern")
});

/// Derive the coaching goal from the raw message.
///
/// A case-insensitive `objetivo:`/`meta:`/`goal:` marker wins, using the
/// captured trailing text; otherwise the whole message is the goal. This
/// single pattern rule is the entire goal-detection surface — no broader
/// NLP is implied.
pub fn derive_goal(message: &str) -> &str {
    GOAL_PATTERN
        .captures(message)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str().trim())
        .unwrap_or(message)
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// Executes the per-intent call sequences against the backend.
pub struct Orchestrator {
    client: BackendClient,
}

impl Orchestrator {
    /// Build an orchestrator from connection settings.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: BackendClient::new(config)?,
        })
    }

    /// Build an orchestrator around an existing client.
    pub fn from_client(client: BackendClient) -> Self {
        Self { client }
    }

    /// The underlying backend client (used by the export path).
    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    /// Run one user turn.
    ///
    /// Never fails: every upstream failure narrows the reply instead of
    /// aborting it. An empty message yields an empty reply-only outcome
    /// without any call (the session layer skips recording it entirely).
    pub async fn run_turn(&self, message: &str, options: &RenderOptions) -> TurnOutcome {
        match Intent::classify(message) {
            Intent::Empty => TurnOutcome::reply_only(""),
            Intent::Health => self.run_health().await,
            Intent::KnowledgeBase { query } => self.run_kb(&query).await,
            Intent::Coaching { message } => self.run_coaching(&message, options).await,
        }
    }

    /// Diagnostic turn: `/health` and `/endpoints` as labeled JSON blocks.
    async fn run_health(&self) -> TurnOutcome {
        let health = self.client.health().await;
        let endpoints = self.client.endpoints().await;

        tracing::info!(
            health_status = health.status,
            endpoints_status = endpoints.status,
            "diagnostic turn"
        );

        let reply = format!(
            "{}\n\n{}",
            reply::json_block("/health", health.status, &health.payload),
            reply::json_block("/endpoints", endpoints.status, &endpoints.payload),
        );
        TurnOutcome::reply_only(reply)
    }

    /// Knowledge-base turn: capped search, bullets or the no-results marker.
    async fn run_kb(&self, query: &str) -> TurnOutcome {
        if query.is_empty() {
            return TurnOutcome::reply_only(reply::KB_QUERY_GUIDANCE);
        }

        let response = self.client.kb_search(query, reply::KB_RESULT_CAP).await;
        let hits = KbHit::list_from_response(&response);

        tracing::info!(status = response.status, hits = hits.len(), "kb turn");

        if hits.is_empty() {
            return TurnOutcome::reply_only(reply::KB_NO_RESULTS);
        }
        TurnOutcome::reply_only(reply::kb_bullets(&hits))
    }

    /// Coaching turn: extract → predict → derive goal → coach → assemble.
    async fn run_coaching(&self, message: &str, options: &RenderOptions) -> TurnOutcome {
        let started = Instant::now();

        // 1. Extract a structured profile; fall back to the default profile
        //    on failure or an incomplete payload.
        let extraction = self.client.extract(message).await;
        let profile = StructuredInput::from_extraction(&extraction);

        // 2. Predict. Score and drivers are captured from whatever payload
        //    came back; a failed call just yields an empty prediction.
        let prediction_response = self.client.predict(&profile).await;
        let prediction = Prediction::from_response(&prediction_response);

        // 3 + 4. Derive the goal and request a plan conditioned on it.
        let goal = derive_goal(message);
        let coaching_response = self.client.coach(goal, &profile).await;
        let coaching = CoachingPlan::from_response(&coaching_response);

        tracing::info!(
            extract_status = extraction.status,
            predict_status = prediction_response.status,
            coach_status = coaching_response.status,
            plan_steps = coaching.steps.len(),
            "coaching turn completed"
        );

        // 5. Assemble.
        let assembled = reply::assemble_coaching_reply(
            &reply::CoachingReply {
                prediction: &prediction,
                prediction_status: prediction_response.status,
                prediction_payload: &prediction_response.payload,
                coaching: &coaching,
                profile: &profile,
                elapsed_secs: started.elapsed().as_secs_f64(),
            },
            options,
        );

        TurnOutcome {
            reply: assembled,
            plan: coaching.steps,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
