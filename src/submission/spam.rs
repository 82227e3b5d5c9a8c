use std::sync::LazyLock;

use regex::Regex;

use crate::config::IntakePolicy;
use crate::models::RawSubmission;
use crate::models::lead::domain_of;

/// Decoy field that humans never see and never fill.
pub const HONEYPOT_FIELD: &str = "company";
/// Names a per-page-load honeypot field when the site rotates it.
pub const HONEYPOT_KEY_FIELD: &str = "hp_key";
/// Anything filled in faster than this is a bot.
pub const MIN_FILL_MS: f64 = 5000.0;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Why a submission was dropped. Each reason is logged but never exposed
/// to the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Honeypot,
    TooFast,
    ChallengeMismatch,
    InvalidEmail,
    BlockedDomain,
    InvalidChoice(&'static str),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Honeypot => write!(f, "honeypot filled"),
            Rejection::TooFast => write!(f, "submitted too fast"),
            Rejection::ChallengeMismatch => write!(f, "challenge mismatch"),
            Rejection::InvalidEmail => write!(f, "invalid email"),
            Rejection::BlockedDomain => write!(f, "blocked email domain"),
            Rejection::InvalidChoice(field) => write!(f, "invalid choice for {field}"),
        }
    }
}

/// Run every anti-spam gate in order, stopping at the first rejection.
pub fn screen(submission: &RawSubmission, policy: &IntakePolicy) -> Result<(), Rejection> {
    if honeypot_filled(submission) {
        return Err(Rejection::Honeypot);
    }

    let ms = fill_time_ms(submission);
    if ms.is_finite() && ms < MIN_FILL_MS {
        return Err(Rejection::TooFast);
    }

    // Both values are compared after trimming.
    let challenge = submission.text("challenge");
    let answer = submission.text("challenge_answer");
    if !challenge.is_empty() && !answer.is_empty() && challenge != answer {
        return Err(Rejection::ChallengeMismatch);
    }

    let email = submission.text("email").to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(Rejection::InvalidEmail);
    }

    if domain_of(&email).is_some_and(|domain| is_blocked(domain, &policy.blocked_domains)) {
        return Err(Rejection::BlockedDomain);
    }

    if !is_member(submission.text("interest"), &policy.interests) {
        return Err(Rejection::InvalidChoice("interest"));
    }

    if !is_member(submission.text("bestTime"), &policy.best_times) {
        return Err(Rejection::InvalidChoice("bestTime"));
    }

    Ok(())
}

fn honeypot_filled(submission: &RawSubmission) -> bool {
    if !submission.text(HONEYPOT_FIELD).is_empty() {
        return true;
    }

    // Rotated names are always `hp_`-prefixed, so a forged key cannot point
    // the gate at a real field.
    let rotated = submission.text(HONEYPOT_KEY_FIELD);
    rotated.starts_with("hp_") && !submission.text(rotated).is_empty()
}

/// Client-reported fill time. Missing or blank reads as zero; anything
/// unparseable reads as NaN so the timing gate does not apply.
pub fn fill_time_ms(submission: &RawSubmission) -> f64 {
    let raw = submission.text("time_to_complete");
    if raw.is_empty() {
        return 0.0;
    }

    let radix = match raw.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return raw.parse::<f64>().unwrap_or(f64::NAN),
    };
    parse_radix(&raw[2..], radix)
}

/// Unsigned integer literal in `radix`, e.g. the digits after `0x`.
fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return f64::NAN;
    }
    u128::from_str_radix(digits, radix)
        .map(|n| n as f64)
        .unwrap_or(f64::INFINITY)
}

pub fn is_blocked(domain: &str, blocked: &[String]) -> bool {
    let domain = domain.to_lowercase();
    blocked.iter().any(|entry| {
        domain == *entry
            || domain
                .strip_suffix(entry.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

fn is_member(value: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a == value)
}
