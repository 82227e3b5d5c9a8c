use crate::models::{Attribution, Consent, Lead, RawSubmission};

use super::spam;

/// Build the canonical lead from a submission that passed [`spam::screen`].
pub fn lead(submission: &RawSubmission) -> Lead {
    let text = |name: &str| submission.text(name).to_string();

    Lead {
        first_name: text("firstName"),
        last_name: text("lastName"),
        email: submission.text("email").to_lowercase(),
        interest: text("interest"),
        best_time: text("bestTime"),
        goals: text("goals"),
        consent: consent(submission.text("consent")),
        time_to_complete: time_to_complete(spam::fill_time_ms(submission)),
        attribution: Attribution {
            utm_source: text("utm_source"),
            utm_medium: text("utm_medium"),
            utm_campaign: text("utm_campaign"),
            utm_term: text("utm_term"),
            utm_content: text("utm_content"),
            referrer: text("referrer"),
            landing_path: text("landing_path"),
            device: text("device"),
        },
    }
}

/// Checkbox inputs post `on` when ticked and nothing otherwise.
pub fn consent(value: &str) -> Consent {
    if value == "on" { Consent::Yes } else { Consent::No }
}

/// Clamp to a whole, non-negative millisecond count.
pub fn time_to_complete(ms: f64) -> u64 {
    if !ms.is_finite() || ms <= 0.0 {
        return 0;
    }
    ms.trunc() as u64
}
