//! Command Router — classifies an incoming user message into an intent.
//!
//! Three text commands exist on the user-facing surface: an exact
//! health-check token, a KB prefix followed by a query, and the free-text
//! default that runs the full coaching pipeline. Matching is
//! case-insensitive, checked in order; an empty message maps to a no-op
//! intent before any call is made.

/// Exact health/status command token.
pub const HEALTH_COMMAND: &str = "/health";

/// Knowledge-base command prefix; the query follows after whitespace.
pub const KB_COMMAND: &str = "/kb";

/// What one user message asks the orchestrator to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Empty or whitespace-only message — no call, session untouched.
    Empty,
    /// Diagnostic query: fetch `/health` and `/endpoints`.
    Health,
    /// Knowledge-base search. The query may be empty, which short-circuits
    /// into a static guidance reply without any call.
    KnowledgeBase { query: String },
    /// Everything else runs the coaching pipeline on the trimmed message.
    Coaching { message: String },
}

impl Intent {
    /// Classify a raw user message.
    pub fn classify(raw: &str) -> Intent {
        let message = raw.trim();
        if message.is_empty() {
            return Intent::Empty;
        }

        if message.eq_ignore_ascii_case(HEALTH_COMMAND) {
            return Intent::Health;
        }
        if let Some(query) = strip_kb_command(message) {
            return Intent::KnowledgeBase {
                query: query.trim().to_string(),
            };
        }

        Intent::Coaching {
            message: message.to_string(),
        }
    }
}

/// The query text after the KB command, or `None` when the message is not
/// a KB command.
///
/// The token match is ASCII case-insensitive on the original string.
/// `get` returns `None` when the token length does not fall on a char
/// boundary — messages whose prefix only resembles the command after
/// Unicode lowercasing (e.g. a Kelvin-sign `K`) are free text, not
/// commands, and must never panic the router.
fn strip_kb_command(message: &str) -> Option<&str> {
    let token = message.get(..KB_COMMAND.len())?;
    if !token.eq_ignore_ascii_case(KB_COMMAND) {
        return None;
    }
    let rest = &message[KB_COMMAND.len()..];
    if rest.is_empty() || rest.starts_with(' ') {
        return Some(rest);
    }
    None
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(Intent::classify(""), Intent::Empty);
        assert_eq!(Intent::classify("   \t "), Intent::Empty);
    }

    #[test]
    fn test_health_exact_case_insensitive() {
        assert_eq!(Intent::classify("/health"), Intent::Health);
        assert_eq!(Intent::classify("/HEALTH"), Intent::Health);
        assert_eq!(Intent::classify("  /Health  "), Intent::Health);
    }

    #[test]
    fn test_health_requires_exact_token() {
        // "/healthy" is free text, not a diagnostic command
        assert!(matches!(
            Intent::classify("/healthy"),
            Intent::Coaching { .. }
        ));
    }

    #[test]
    fn test_kb_with_query() {
        assert_eq!(
            Intent::classify("/kb sueño y actividad física"),
            Intent::KnowledgeBase {
                query: "sueño y actividad física".to_string()
            }
        );
        assert_eq!(
            Intent::classify("/KB Sueño"),
            Intent::KnowledgeBase {
                query: "Sueño".to_string()
            }
        );
    }

    #[test]
    fn test_kb_without_query() {
        assert_eq!(
            Intent::classify("/kb"),
            Intent::KnowledgeBase {
                query: String::new()
            }
        );
        assert_eq!(
            Intent::classify("/kb    "),
            Intent::KnowledgeBase {
                query: String::new()
            }
        );
    }

    #[test]
    fn test_kb_requires_word_boundary() {
        assert!(matches!(Intent::classify("/kbx"), Intent::Coaching { .. }));
    }

    #[test]
    fn test_kb_lookalike_unicode_prefix_is_free_text() {
        // U+212A KELVIN SIGN lowercases to ASCII `k`, so a lowercased copy
        // of these messages starts with "/kb" while the original does not
        // even have a char boundary at that byte offset. They are free
        // text and classification must not panic.
        assert!(matches!(
            Intent::classify("/\u{212A}b sueño"),
            Intent::Coaching { .. }
        ));
        assert!(matches!(
            Intent::classify("/\u{212A}b"),
            Intent::Coaching { .. }
        ));
    }

    #[test]
    fn test_free_text_is_coaching() {
        let intent = Intent::classify("  hombre, 42 años, objetivo: dormir mejor  ");
        assert_eq!(
            intent,
            Intent::Coaching {
                message: "hombre, 42 años, objetivo: dormir mejor".to_string()
            }
        );
    }
}
