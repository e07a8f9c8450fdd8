//! Prompt grounding builder. Pure, no I/O.
//!
//! The system prompt always carries the score line and the signal map (zeros
//! and `{}` when ungrounded). The user prompt carries the literal message and
//! at most `EXCERPT_CHAR_BUDGET` leading characters of the resume text.

use crate::resume::models::ResumeScore;
use crate::resume::store::ResolvedContext;

/// Hard cap on resume characters embedded in a single prompt.
pub const EXCERPT_CHAR_BUDGET: usize = 4000;

pub const CAREER_ASSISTANT_ROLE: &str = "You are a helpful career assistant.\n\
    You have access to the student's resume content below and a heuristic score.";

pub const TAILORING_INSTRUCTION: &str = "Use the resume to tailor advice, examples, and suggestions. \
    When asked to write bullets, produce concise, quantified bullets. \
    If information is missing, ask clarifying questions.";

pub const CLOSING_INSTRUCTION: &str = "Based on the resume, provide tailored guidance.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundedPrompt {
    pub system: String,
    pub user: String,
}

impl GroundedPrompt {
    /// Single-string form sent to models that take one prompt.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Builds the grounded prompt for one chat turn.
pub fn build_prompt(message: &str, context: Option<&ResolvedContext>) -> GroundedPrompt {
    let score = context.map(|c| &c.record.score);
    let resume_text = context.map(|c| c.text.as_str()).unwrap_or("");
    GroundedPrompt {
        system: build_system_prompt(score),
        user: build_user_prompt(message, resume_text),
    }
}

pub fn build_system_prompt(score: Option<&ResumeScore>) -> String {
    let (points, signals) = match score {
        Some(s) => (
            s.score,
            serde_json::to_string(&s.signals).unwrap_or_else(|_| "{}".to_string()),
        ),
        None => (0, "{}".to_string()),
    };
    format!(
        "{CAREER_ASSISTANT_ROLE}\n- Resume score: {points}/100\n- Signals: {signals}\n\n{TAILORING_INSTRUCTION}"
    )
}

pub fn build_user_prompt(message: &str, resume_text: &str) -> String {
    format!(
        "User message: {message}\n\nRelevant resume excerpt (may be empty):\n\n{}\n\n{CLOSING_INSTRUCTION}",
        excerpt(resume_text, EXCERPT_CHAR_BUDGET)
    )
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::resume::models::{ContextId, ContextRecord, SignalVector};

    fn resolved(score: u8, signals: SignalVector, text: &str) -> ResolvedContext {
        ResolvedContext {
            record: ContextRecord {
                context_id: ContextId::new(),
                original_filename: "cv.txt".to_string(),
                resume_file: "1_ab12cd34_cv.txt".to_string(),
                extracted_file: "1_ab12cd34_cv.txt.txt".to_string(),
                extracted_text_length: text.chars().count(),
                byte_size: text.len() as u64,
                content_type: None,
                score: ResumeScore { score, signals },
                created_at: Utc::now(),
            },
            text: text.to_string(),
        }
    }

    fn signals_80() -> SignalVector {
        SignalVector {
            projects: true,
            internships: false,
            leadership: true,
            impact: true,
            skills: true,
        }
    }

    #[test]
    fn test_grounded_system_prompt_embeds_score_and_signals() {
        let ctx = resolved(80, signals_80(), "Built 3 projects");
        let prompt = build_prompt("Review my resume", Some(&ctx));
        assert!(prompt.system.contains("80/100"));
        assert!(prompt.system.contains(
            r#"{"projects":true,"internships":false,"leadership":true,"impact":true,"skills":true}"#
        ));
        assert!(prompt.system.contains("ask clarifying questions"));
        assert!(prompt.system.contains("quantified"));
    }

    #[test]
    fn test_ungrounded_prompt_uses_zero_and_empty_signals() {
        let prompt = build_prompt("How do I prepare for interviews?", None);
        assert!(prompt.system.contains("- Resume score: 0/100"));
        assert!(prompt.system.contains("- Signals: {}"));
        assert!(prompt
            .user
            .starts_with("User message: How do I prepare for interviews?"));
        assert!(prompt
            .user
            .contains("Relevant resume excerpt (may be empty):\n\n\n\n"));
    }

    #[test]
    fn test_user_prompt_embeds_literal_message() {
        let prompt = build_prompt("Use {placeholders} verbatim", None);
        assert!(prompt.user.contains("User message: Use {placeholders} verbatim"));
        assert!(prompt.user.ends_with(CLOSING_INSTRUCTION));
    }

    #[test]
    fn test_excerpt_is_bounded_prefix() {
        let long = "abcdefghij".repeat(1000);
        let ctx = resolved(0, SignalVector::default(), &long);
        let prompt = build_prompt("hi", Some(&ctx));
        let expected = &long[..EXCERPT_CHAR_BUDGET];
        assert!(prompt.user.contains(expected));
        assert!(!prompt.user.contains(&long[..EXCERPT_CHAR_BUDGET + 1]));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let text = "é".repeat(EXCERPT_CHAR_BUDGET + 10);
        let cut = excerpt(&text, EXCERPT_CHAR_BUDGET);
        assert_eq!(cut.chars().count(), EXCERPT_CHAR_BUDGET);
        assert!(text.starts_with(cut));
    }

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(excerpt("short", EXCERPT_CHAR_BUDGET), "short");
        assert_eq!(excerpt("", EXCERPT_CHAR_BUDGET), "");
    }

    #[test]
    fn test_excerpt_length_never_exceeds_budget() {
        for len in [0, 1, 3999, 4000, 4001, 12_345] {
            let text = "x".repeat(len);
            assert!(excerpt(&text, EXCERPT_CHAR_BUDGET).chars().count() <= EXCERPT_CHAR_BUDGET);
        }
    }

    #[test]
    fn test_combined_joins_with_blank_line() {
        let prompt = GroundedPrompt {
            system: "S".to_string(),
            user: "U".to_string(),
        };
        assert_eq!(prompt.combined(), "S\n\nU");
    }

    #[test]
    fn test_builder_is_deterministic() {
        let ctx = resolved(40, signals_80(), "Led a team");
        assert_eq!(build_prompt("x", Some(&ctx)), build_prompt("x", Some(&ctx)));
    }
}
