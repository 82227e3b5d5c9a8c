use std::sync::LazyLock;

use regex::Regex;

use crate::models::Lead;

static PLACEHOLDER_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(example|test)\.").unwrap());

pub const DETAILED_GOALS_WORDS: usize = 30;
pub const DELIBERATE_FILL_MS: u64 = 15_000;

/// Advisory lead quality. Every rule contributes independently; there is
/// no floor or ceiling.
pub fn score(lead: &Lead) -> i32 {
    let mut score = 0;

    if lead.goals.split_whitespace().count() >= DETAILED_GOALS_WORDS {
        score += 2;
    }
    if lead.time_to_complete >= DELIBERATE_FILL_MS {
        score += 2;
    }
    if !lead.attribution.utm_source.is_empty() {
        score += 1;
    }
    let interest = lead.interest.to_lowercase();
    if interest.contains("virtual") || interest.contains("hybrid") {
        score += 1;
    }
    if lead.email.is_empty() || PLACEHOLDER_EMAIL_RE.is_match(&lead.email) {
        score -= 2;
    }

    score
}
