//! Reply Assembler — formats pipeline results into one markdown reply.
//!
//! The coaching reply is an ordered sequence of text blocks: title, score
//! line, optional drivers, optional plan and citations, disclaimer, the
//! profile actually used, the raw prediction payload (only on HTTP 200),
//! and the elapsed time. Diagnostic and KB replies use simpler formats.

use serde_json::Value;

use crate::backend::types::{CoachingPlan, KbHit, Prediction, StructuredInput};

use super::types::RenderOptions;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Maximum driver labels shown on the drivers line.
pub const MAX_DRIVERS: usize = 8;

/// Maximum plan steps rendered as bullets.
pub const MAX_PLAN_STEPS: usize = 10;

/// Fixed knowledge-base result cap.
pub const KB_RESULT_CAP: usize = 5;

/// Marker shown when the risk score is missing or non-numeric.
pub const SCORE_UNAVAILABLE: &str = "N/D";

/// Marker returned when a KB search yields nothing usable.
pub const KB_NO_RESULTS: &str = "KB sin resultados";

/// Guidance returned for a KB command with no query.
pub const KB_QUERY_GUIDANCE: &str = "Ingresa una consulta, por ejemplo: /kb sueño y ejercicio";

// ─── Formatting primitives ───────────────────────────────────────────────────

/// Format the risk score as a one-decimal percentage, or the N/D marker
/// when it is absent.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.1}%", score * 100.0),
        None => SCORE_UNAVAILABLE.to_string(),
    }
}

/// Labeled fenced-JSON block for the diagnostic reply.
pub fn json_block(label: &str, status: u16, payload: &Value) -> String {
    format!("**{label} ({status})**\n```json\n{}\n```", pretty(payload))
}

/// Render KB hits as `- **title** — snippet` bullets, capped.
pub fn kb_bullets(hits: &[KbHit]) -> String {
    hits.iter()
        .take(KB_RESULT_CAP)
        .map(|hit| format!("- **{}** — {}", hit.title, hit.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapsible block with pretty-printed JSON.
fn details_block(summary: &str, payload: &Value) -> String {
    format!(
        "<details><summary>{summary}</summary>\n\n```json\n{}\n```\n</details>",
        pretty(payload)
    )
}

fn pretty(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

// ─── Coaching reply ──────────────────────────────────────────────────────────

/// Everything the assembler needs from one pipeline run.
pub struct CoachingReply<'a> {
    pub prediction: &'a Prediction,
    /// Status of the `/predict` call; the raw payload is shown only on 200.
    pub prediction_status: u16,
    pub prediction_payload: &'a Value,
    pub coaching: &'a CoachingPlan,
    /// The profile actually sent downstream (extracted or default).
    pub profile: &'a StructuredInput,
    pub elapsed_secs: f64,
}

/// Assemble the ordered block sequence for a coaching turn.
pub fn assemble_coaching_reply(input: &CoachingReply<'_>, options: &RenderOptions) -> String {
    let mut blocks: Vec<String> = Vec::new();

    blocks.push("## Predicción y Plan".to_string());
    blocks.push(format!(
        "**Score de riesgo**: {}",
        format_score(input.prediction.score)
    ));

    if options.show_drivers && !input.prediction.drivers.is_empty() {
        let shown: Vec<&str> = input
            .prediction
            .drivers
            .iter()
            .take(MAX_DRIVERS)
            .map(String::as_str)
            .collect();
        blocks.push(format!("**Drivers del modelo**: {}", shown.join(", ")));
    }

    if !input.coaching.steps.is_empty() {
        blocks.push("\n### Plan sugerido (4–12 semanas)".to_string());
        for step in input.coaching.steps.iter().take(MAX_PLAN_STEPS) {
            blocks.push(format!("- {step}"));
        }
    }

    if options.include_citations && !input.coaching.citations.is_empty() {
        blocks.push("\n**Citas KB:**".to_string());
        for citation in &input.coaching.citations {
            blocks.push(format!("- {citation}"));
        }
    }

    blocks.push(format!("\n> _{}_", input.coaching.disclaimer));

    let profile_json = serde_json::to_value(input.profile).unwrap_or(Value::Null);
    blocks.push(format!(
        "\n{}",
        details_block("Entrada interpretada (/extract)", &profile_json)
    ));

    if input.prediction_status == 200 {
        blocks.push(details_block("Respuesta /predict", input.prediction_payload));
    }

    blocks.push(format!("\n⏱️ {:.2}s", input.elapsed_secs));

    blocks.join("\n")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
