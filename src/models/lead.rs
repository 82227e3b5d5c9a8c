/// A validated, normalized consultation request.
///
/// Only built by [`crate::submission::normalize::lead`] once every spam
/// gate has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub interest: String,
    pub best_time: String,
    pub goals: String,
    pub consent: Consent,
    pub time_to_complete: u64,
    pub attribution: Attribution,
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Yes,
    No,
}

impl Consent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Consent::Yes => "yes",
            Consent::No => "no",
        }
    }
}

/// Where the visitor came from, as captured by the form's hidden fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribution {
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub utm_term: String,
    pub utm_content: String,
    pub referrer: String,
    pub landing_path: String,
    pub device: String,
}

pub fn domain_of(email: &str) -> Option<&str> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|d| !d.is_empty())
}
