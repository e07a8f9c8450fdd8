//! Heuristic resume scorer: five keyword classes, one point each.
//!
//! Pure and total: the same text always yields the same `ResumeScore`, and the
//! empty string scores 0 with every signal false.
//!
//! Each pattern anchors only on a trailing word boundary, so "built" and
//! "led" match but a bare plural like "projects" does not hit `project\b`.

use std::sync::LazyLock;

use regex::Regex;

use crate::resume::models::{ResumeScore, SignalVector};

static PROJECTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(project|built|developed)\b").expect("valid projects regex")
});

static INTERNSHIPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(intern|internship)\b").expect("valid internships regex"));

static LEADERSHIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(led|leader|captain|president)\b").expect("valid leadership regex")
});

static IMPACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(increased|reduced|improved|optimized|achieved|percent)\b|%")
        .expect("valid impact regex")
});

static SKILLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(react|node|python|java|aws|sql|typescript|ml|ai)\b")
        .expect("valid skills regex")
});

/// Evaluates the five signal classes against `text`.
pub fn compute_signals(text: &str) -> SignalVector {
    SignalVector {
        projects: PROJECTS.is_match(text),
        internships: INTERNSHIPS.is_match(text),
        leadership: LEADERSHIP.is_match(text),
        impact: IMPACT.is_match(text),
        skills: SKILLS.is_match(text),
    }
}

/// `round(100 * true_count / 5)`.
pub fn score_resume(text: &str) -> ResumeScore {
    let signals = compute_signals(text);
    let total = signals.count() as f64;
    let score = ((total / SignalVector::LEN as f64) * 100.0).round() as u8;
    ResumeScore { score, signals }
}
