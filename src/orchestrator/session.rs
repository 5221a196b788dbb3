//! Session State — per-session history, the current plan, and PDF export.
//!
//! One `ChatSession` owns one user's interaction lifetime: an append-only
//! list of turns and the most recent plan, replaced wholesale on every
//! coaching turn and cleared on explicit reset. Nothing is shared between
//! sessions and nothing is persisted across them.

use chrono::Utc;

use crate::backend::types::{report_path, DEFAULT_DISCLAIMER};

use super::pipeline::Orchestrator;
use super::router::Intent;
use super::types::{RenderOptions, Turn, TurnOutcome};

/// Header printed on exported PDF reports.
pub const EXPORT_HEADER: &str = "Plan personalizado";

/// Footer printed on exported PDF reports.
pub const EXPORT_FOOTER: &str = DEFAULT_DISCLAIMER;

/// One interactive session: conversation history plus the current plan.
pub struct ChatSession {
    orchestrator: Orchestrator,
    history: Vec<Turn>,
    plan: Vec<String>,
}

impl ChatSession {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            history: Vec::new(),
            plan: Vec::new(),
        }
    }

    /// Conversation history, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// The plan produced by the most recent coaching turn.
    pub fn plan(&self) -> &[String] {
        &self.plan
    }

    /// Run one turn and record it.
    ///
    /// Empty messages are a no-op: no call is made, nothing is recorded,
    /// and `None` is returned. Otherwise the session plan is replaced
    /// wholesale with this turn's plan and the new turn is appended.
    pub async fn send(&mut self, message: &str, options: &RenderOptions) -> Option<&Turn> {
        if matches!(Intent::classify(message), Intent::Empty) {
            return None;
        }

        let TurnOutcome { reply, plan } = self.orchestrator.run_turn(message, options).await;

        self.plan = plan.clone();
        self.history.push(Turn {
            user: message.to_string(),
            reply,
            plan,
            timestamp: Utc::now(),
        });
        self.history.last()
    }

    /// Reset history and plan to empty.
    pub fn clear(&mut self) {
        self.history.clear();
        self.plan.clear();
    }

    /// Export the current plan as a PDF via the report service.
    ///
    /// An empty plan disables export: no call is made. A failed render is
    /// logged and yields `None` — the absence of a file is the only signal
    /// surfaced to the user.
    pub async fn export_pdf(&self) -> Option<String> {
        if self.plan.is_empty() {
            return None;
        }

        let response = self
            .orchestrator
            .client()
            .report_pdf(&self.plan, EXPORT_HEADER, EXPORT_FOOTER)
            .await;

        match report_path(&response) {
            Some(path) => {
                tracing::info!(path = %path, "report exported");
                Some(path)
            }
            None => {
                tracing::warn!(status = response.status, "report export unavailable");
                None
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendConfig;

    /// Session whose backend calls all soft-fail (no listener on the port).
    fn offline_session() -> ChatSession {
        let config = BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            connect_timeout_secs: 1,
        };
        ChatSession::new(Orchestrator::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_empty_message_leaves_session_unchanged() {
        let mut session = offline_session();
        assert!(session.send("", &RenderOptions::default()).await.is_none());
        assert!(session.send("   ", &RenderOptions::default()).await.is_none());
        assert!(session.history().is_empty());
        assert!(session.plan().is_empty());
    }

    #[tokio::test]
    async fn test_send_appends_turn() {
        let mut session = offline_session();
        let options = RenderOptions::default();

        session.send("/health", &options).await.unwrap();
        session.send("quiero dormir mejor", &options).await.unwrap();

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].user, "/health");
        assert!(session.history()[1].reply.contains("Score de riesgo"));
    }

    #[tokio::test]
    async fn test_plan_replaced_wholesale() {
        let mut session = offline_session();
        session.plan = vec!["paso viejo".to_string()];

        // A diagnostic turn produces an empty plan, replacing the old one.
        session.send("/health", &RenderOptions::default()).await;
        assert!(session.plan().is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let mut session = offline_session();
        session.send("/health", &RenderOptions::default()).await;
        assert!(!session.history().is_empty());

        session.clear();
        assert!(session.history().is_empty());
        assert!(session.plan().is_empty());
    }

    #[tokio::test]
    async fn test_export_empty_plan_is_disabled() {
        // No plan → no call, no artifact. Works offline precisely because
        // the export path must not touch the network here.
        let session = offline_session();
        assert_eq!(session.export_pdf().await, None);
    }

    #[tokio::test]
    async fn test_export_unreachable_backend_yields_none() {
        let mut session = offline_session();
        session.plan = vec!["Caminar 30 min".to_string()];
        assert_eq!(session.export_pdf().await, None);
    }
}
