//! Wire types and payload views for the coaching API.
//!
//! Backend JSON payloads have uncertain shape. Each endpoint gets an
//! explicit view type built from the raw payload, with accessors that fall
//! back to a safe default when a field is absent or mistyped — no
//! speculative field access anywhere downstream.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── ApiResponse ─────────────────────────────────────────────────────────────

/// Status code and best-effort parsed payload of one backend call.
///
/// Transport failures (connection error, timeout) are encoded as status 0;
/// non-JSON bodies come back wrapped as `{"text": <raw>}`. Constructing
/// this type never fails, which is what lets the pipeline treat every
/// upstream problem as "no usable data from this step" instead of a crash.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code, or 0 when the request never reached the backend.
    pub status: u16,
    /// Parsed JSON payload, or `{"text": <raw>}` when parsing failed.
    pub payload: Value,
}

impl ApiResponse {
    /// Synthesize the response for a request that never reached the backend.
    pub fn transport_failure() -> Self {
        Self {
            status: 0,
            payload: serde_json::json!({ "text": "" }),
        }
    }

    /// Whether the backend answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ─── StructuredInput ─────────────────────────────────────────────────────────

/// Normalized health-profile fields — the common currency between the
/// extraction, prediction, and coaching calls.
///
/// Every field carries its documented default via the container-level
/// serde default, so a partial extraction payload is completed field-wise
/// and the invariant holds: the profile is fully populated and typed
/// before anything downstream runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredInput {
    pub sex: String,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub waist_cm: f64,
    /// Systolic blood pressure (mmHg).
    pub sbp: u32,
    /// Diastolic blood pressure (mmHg).
    pub dbp: u32,
    pub sleep_hours: f64,
    /// Days per week with moderate-to-vigorous physical activity.
    pub days_mvpa_week: u32,
    pub smokes_cig_day: u32,
    pub fruit_veg_portions_day: f64,
    pub income_poverty_ratio: f64,
}

impl Default for StructuredInput {
    /// The documented default profile, substituted whole when extraction
    /// fails and field-wise when it answers partially.
    fn default() -> Self {
        Self {
            sex: "M".to_string(),
            age: 40,
            height_cm: 175.0,
            weight_kg: 82.0,
            waist_cm: 94.0,
            sbp: 128,
            dbp: 82,
            sleep_hours: 6.5,
            days_mvpa_week: 3,
            smokes_cig_day: 0,
            fruit_veg_portions_day: 3.0,
            income_poverty_ratio: 2.0,
        }
    }
}

impl StructuredInput {
    /// Build the profile from an `/extract` response.
    ///
    /// Any status other than exactly 200, a payload without the `input`
    /// field, or a mistyped `input` mapping all yield the default
    /// profile. Extraction failure never aborts the pipeline.
    pub fn from_extraction(response: &ApiResponse) -> Self {
        if response.status != 200 {
            return Self::default();
        }
        response
            .payload
            .get("input")
            .and_then(|input| serde_json::from_value(input.clone()).ok())
            .unwrap_or_default()
    }
}

// ─── Prediction ──────────────────────────────────────────────────────────────

/// Risk prediction view: a score in [0, 1] when the backend produced one,
/// plus an ordered list of driver labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prediction {
    /// Risk score. `None` when the field is absent or non-numeric.
    pub score: Option<f64>,
    /// Driver labels explaining the score, possibly empty.
    pub drivers: Vec<String>,
}

impl Prediction {
    /// Capture score and drivers from whatever payload came back.
    ///
    /// Works on any shape: a failed call's `{"text": …}` payload simply
    /// yields an empty prediction.
    pub fn from_response(response: &ApiResponse) -> Self {
        let payload = &response.payload;
        Self {
            score: payload.get("score").and_then(Value::as_f64),
            drivers: string_list(payload.get("drivers")),
        }
    }
}

// ─── CoachingPlan ────────────────────────────────────────────────────────────

/// Fixed disclaimer used when the coaching service omits one.
pub const DEFAULT_DISCLAIMER: &str = "No es diagnóstico médico.";

/// Coaching result view: plan steps, KB citations, and a disclaimer.
#[derive(Debug, Clone, PartialEq)]
pub struct CoachingPlan {
    /// Ordered plan-step strings, possibly empty.
    pub steps: Vec<String>,
    /// Ordered citation strings, possibly empty.
    pub citations: Vec<String>,
    /// Disclaimer sentence; defaults to [`DEFAULT_DISCLAIMER`].
    pub disclaimer: String,
}

impl Default for CoachingPlan {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            citations: Vec::new(),
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
        }
    }
}

impl CoachingPlan {
    /// Build the view from a `/coach_llm` response.
    ///
    /// The wire field for citations is `citas`. A payload that is not a
    /// mapping yields empty lists and the default disclaimer.
    pub fn from_response(response: &ApiResponse) -> Self {
        let Some(map) = response.payload.as_object() else {
            return Self::default();
        };
        Self {
            steps: string_list(map.get("plan")),
            citations: string_list(map.get("citas")),
            disclaimer: map
                .get("disclaimer")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_DISCLAIMER.to_string()),
        }
    }
}

// ─── Knowledge Base ──────────────────────────────────────────────────────────

/// One knowledge-base search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct KbHit {
    pub title: String,
    pub snippet: String,
}

impl KbHit {
    /// Parse a `/kb/search` payload.
    ///
    /// Non-list payloads yield an empty vec; malformed items degrade to
    /// empty strings rather than being dropped, preserving result order.
    pub fn list_from_response(response: &ApiResponse) -> Vec<KbHit> {
        let Some(items) = response.payload.as_array() else {
            return Vec::new();
        };
        items
            .iter()
            .map(|item| KbHit {
                title: text_field(item, "title"),
                snippet: text_field(item, "snippet"),
            })
            .collect()
    }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Extract the rendered file path from a `/report/pdf` response.
///
/// `Some` only when the call returned exactly HTTP 200 and the payload
/// carries a non-empty `path`; every other outcome means no file is
/// available.
pub fn report_path(response: &ApiResponse) -> Option<String> {
    if response.status != 200 {
        return None;
    }
    response
        .payload
        .get("path")
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Collect a JSON array of strings leniently: a missing or non-array value
/// yields an empty vec, and non-string items are skipped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// A string field of a JSON mapping, or empty when absent or mistyped.
fn text_field(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(payload: Value) -> ApiResponse {
        ApiResponse {
            status: 200,
            payload,
        }
    }

    #[test]
    fn test_transport_failure_shape() {
        let response = ApiResponse::transport_failure();
        assert_eq!(response.status, 0);
        assert_eq!(response.payload, json!({ "text": "" }));
        assert!(!response.is_success());
    }

    #[test]
    fn test_default_profile_literal() {
        let profile = StructuredInput::default();
        assert_eq!(profile.sex, "M");
        assert_eq!(profile.age, 40);
        assert_eq!(profile.height_cm, 175.0);
        assert_eq!(profile.weight_kg, 82.0);
        assert_eq!(profile.waist_cm, 94.0);
        assert_eq!(profile.sbp, 128);
        assert_eq!(profile.dbp, 82);
        assert_eq!(profile.sleep_hours, 6.5);
        assert_eq!(profile.days_mvpa_week, 3);
        assert_eq!(profile.smokes_cig_day, 0);
        assert_eq!(profile.fruit_veg_portions_day, 3.0);
        assert_eq!(profile.income_poverty_ratio, 2.0);
    }

    #[test]
    fn test_from_extraction_full_payload() {
        let response = ok(json!({
            "input": {
                "sex": "F", "age": 35, "height_cm": 162.0, "weight_kg": 70.0,
                "waist_cm": 85.0, "sbp": 118, "dbp": 76, "sleep_hours": 7.0,
                "days_mvpa_week": 2, "smokes_cig_day": 0,
                "fruit_veg_portions_day": 4.0, "income_poverty_ratio": 2.5
            }
        }));
        let profile = StructuredInput::from_extraction(&response);
        assert_eq!(profile.sex, "F");
        assert_eq!(profile.age, 35);
    }

    #[test]
    fn test_from_extraction_partial_payload_completed_fieldwise() {
        let response = ok(json!({ "input": { "age": 55, "sex": "F" } }));
        let profile = StructuredInput::from_extraction(&response);
        assert_eq!(profile.age, 55);
        assert_eq!(profile.sex, "F");
        // Everything the backend omitted carries the documented default
        assert_eq!(profile.sbp, 128);
        assert_eq!(profile.sleep_hours, 6.5);
    }

    #[test]
    fn test_from_extraction_failure_uses_default() {
        let failed = ApiResponse {
            status: 500,
            payload: json!({ "text": "boom" }),
        };
        assert_eq!(StructuredInput::from_extraction(&failed), StructuredInput::default());

        let missing_input = ok(json!({ "something_else": 1 }));
        assert_eq!(
            StructuredInput::from_extraction(&missing_input),
            StructuredInput::default()
        );
    }

    #[test]
    fn test_from_extraction_requires_exact_200() {
        // A 2xx status other than 200 is not trusted: the default profile
        // is substituted even when the payload looks usable.
        let created = ApiResponse {
            status: 201,
            payload: json!({ "input": { "age": 55 } }),
        };
        assert_eq!(StructuredInput::from_extraction(&created), StructuredInput::default());
    }

    #[test]
    fn test_from_extraction_mistyped_input_uses_default() {
        let mistyped = ok(json!({ "input": { "age": "cuarenta" } }));
        assert_eq!(StructuredInput::from_extraction(&mistyped), StructuredInput::default());

        let not_a_mapping = ok(json!({ "input": [1, 2, 3] }));
        assert_eq!(
            StructuredInput::from_extraction(&not_a_mapping),
            StructuredInput::default()
        );
    }

    #[test]
    fn test_default_substitution_is_idempotent() {
        // Two failed extractions for the same message produce identical profiles
        let failed = ApiResponse::transport_failure();
        let first = StructuredInput::from_extraction(&failed);
        let second = StructuredInput::from_extraction(&failed);
        assert_eq!(first, second);
    }

    #[test]
    fn test_prediction_from_payload() {
        let response = ok(json!({ "score": 0.734, "drivers": ["waist_cm", "sbp"] }));
        let prediction = Prediction::from_response(&response);
        assert_eq!(prediction.score, Some(0.734));
        assert_eq!(prediction.drivers, vec!["waist_cm", "sbp"]);
    }

    #[test]
    fn test_prediction_mistyped_fields_degrade() {
        let response = ok(json!({ "score": "high", "drivers": "not-a-list" }));
        let prediction = Prediction::from_response(&response);
        assert_eq!(prediction.score, None);
        assert!(prediction.drivers.is_empty());
    }

    #[test]
    fn test_prediction_from_failed_call_is_empty() {
        let prediction = Prediction::from_response(&ApiResponse::transport_failure());
        assert_eq!(prediction, Prediction::default());
    }

    #[test]
    fn test_coaching_plan_from_payload() {
        let response = ok(json!({
            "plan": ["Caminar 30 min", "Dormir 7h"],
            "citas": ["WHO 2020"],
            "disclaimer": "Consulta a tu médico."
        }));
        let coaching = CoachingPlan::from_response(&response);
        assert_eq!(coaching.steps.len(), 2);
        assert_eq!(coaching.citations, vec!["WHO 2020"]);
        assert_eq!(coaching.disclaimer, "Consulta a tu médico.");
    }

    #[test]
    fn test_coaching_plan_missing_disclaimer_uses_default() {
        let response = ok(json!({ "plan": ["paso"] }));
        let coaching = CoachingPlan::from_response(&response);
        assert_eq!(coaching.disclaimer, DEFAULT_DISCLAIMER);
        assert!(coaching.citations.is_empty());
    }

    #[test]
    fn test_coaching_plan_non_mapping_is_default() {
        let response = ok(json!(["not", "a", "mapping"]));
        assert_eq!(CoachingPlan::from_response(&response), CoachingPlan::default());
    }

    #[test]
    fn test_kb_hits_lenient_parsing() {
        let response = ok(json!([
            { "title": "Sueño", "snippet": "Dormir 7-9h." },
            { "title": 42 },
            "garbage"
        ]));
        let hits = KbHit::list_from_response(&response);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "Sueño");
        assert_eq!(hits[0].snippet, "Dormir 7-9h.");
        assert_eq!(hits[1].title, "");
        assert_eq!(hits[2].snippet, "");
    }

    #[test]
    fn test_kb_hits_non_list_is_empty() {
        let response = ok(json!({ "text": "oops" }));
        assert!(KbHit::list_from_response(&response).is_empty());
    }

    #[test]
    fn test_report_path() {
        let response = ok(json!({ "path": "exports/plan.pdf" }));
        assert_eq!(report_path(&response), Some("exports/plan.pdf".to_string()));
    }

    #[test]
    fn test_report_path_unavailable() {
        // Non-200, including other 2xx statuses
        for status in [0, 201, 503] {
            let response = ApiResponse {
                status,
                payload: json!({ "path": "exports/plan.pdf" }),
            };
            assert_eq!(report_path(&response), None);
        }

        // 200 but no path
        assert_eq!(report_path(&ok(json!({ "ok": true }))), None);

        // 200 but empty path
        assert_eq!(report_path(&ok(json!({ "path": "" }))), None);
    }
}
