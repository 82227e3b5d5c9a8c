use std::net::IpAddr;

/// Interests offered by the consultation form.
pub const DEFAULT_INTERESTS: &[&str] = &[
    "Fat Loss",
    "Strength Training",
    "Muscle Gain",
    "General Fitness",
    "Virtual Coaching",
    "Hybrid Coaching",
];

/// Contact windows offered by the consultation form.
pub const DEFAULT_BEST_TIMES: &[&str] = &[
    "Morning (7–10 AM)",
    "Midday (10 AM–2 PM)",
    "Afternoon (2–5 PM)",
    "Evening (5–8 PM)",
];

/// Disposable-mail providers. Subdomains are blocked too.
pub const DEFAULT_BLOCKED_DOMAINS: &[&str] = &[
    "mailinator.com",
    "guerrillamail.com",
    "10minutemail.com",
    "tempmail.com",
    "temp-mail.org",
    "yopmail.com",
    "trashmail.com",
    "sharklasers.com",
    "getnada.com",
    "dispostable.com",
    "maildrop.cc",
    "throwawaymail.com",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub max_body_size: usize,
    pub http_timeout_secs: u64,
    pub intake: IntakePolicy,
    pub airtable: Option<AirtableConfig>,
    pub postmark: PostmarkConfig,
    pub business: BusinessProfile,
}

/// Rules applied before a submission becomes a lead.
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    pub form_name: String,
    pub interests: Vec<String>,
    pub best_times: Vec<String>,
    pub blocked_domains: Vec<String>,
    /// Skip the lead confirmation when the sender and lead domains differ.
    pub confirm_same_domain_only: bool,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            form_name: "consultation".to_string(),
            interests: to_owned_list(DEFAULT_INTERESTS),
            best_times: to_owned_list(DEFAULT_BEST_TIMES),
            blocked_domains: to_owned_list(DEFAULT_BLOCKED_DOMAINS),
            confirm_same_domain_only: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub api_url: String,
    pub token: String,
    pub base_id: String,
    pub table_name: String,
}

/// Email provider settings. Every credential is optional here; the effects
/// decide whether a missing value is a skip or a fault.
#[derive(Debug, Clone)]
pub struct PostmarkConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub message_stream: String,
    pub sales_email: Option<String>,
    pub from: Option<String>,
}

impl PostmarkConfig {
    /// Verified sender, falling back to the owner inbox.
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref().or(self.sales_email.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct BusinessProfile {
    pub name: String,
    pub signature: String,
    pub scheduling_link: Option<String>,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            name: "Ashtiany Fitness".to_string(),
            signature: "Alex".to_string(),
            scheduling_link: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("INTAKE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_HOST: {e}"))?;

        let port: u16 = env_or("INTAKE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_PORT: {e}"))?;

        let log_level = env_or("INTAKE_LOG_LEVEL", "info");

        let max_body_size: usize = env_or("INTAKE_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_MAX_BODY_SIZE: {e}"))?;

        let http_timeout_secs: u64 = env_or("INTAKE_HTTP_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_HTTP_TIMEOUT_SECS: {e}"))?;

        let defaults = IntakePolicy::default();
        let intake = IntakePolicy {
            form_name: env_or("INTAKE_FORM_NAME", &defaults.form_name),
            interests: env_list("INTAKE_INTERESTS", '|').unwrap_or(defaults.interests),
            best_times: env_list("INTAKE_BEST_TIMES", '|').unwrap_or(defaults.best_times),
            blocked_domains: env_list("INTAKE_BLOCKED_DOMAINS", ',')
                .map(|domains| domains.into_iter().map(|d| d.to_lowercase()).collect())
                .unwrap_or(defaults.blocked_domains),
            confirm_same_domain_only: parse_bool(
                "INTAKE_CONFIRM_SAME_DOMAIN_ONLY",
                &env_or("INTAKE_CONFIRM_SAME_DOMAIN_ONLY", "true"),
            )?,
        };

        let airtable = match (
            env_opt("AIRTABLE_TOKEN"),
            env_opt("AIRTABLE_BASE_ID"),
            env_opt("AIRTABLE_TABLE_NAME"),
        ) {
            (Some(token), Some(base_id), Some(table_name)) => Some(AirtableConfig {
                api_url: env_or("AIRTABLE_API_URL", "https://api.airtable.com/v0"),
                token,
                base_id,
                table_name,
            }),
            _ => None,
        };

        let postmark = PostmarkConfig {
            api_url: env_or("POSTMARK_API_URL", "https://api.postmarkapp.com"),
            token: env_opt("POSTMARK_TOKEN"),
            message_stream: env_or("POSTMARK_MESSAGE_STREAM", "outbound"),
            sales_email: env_opt("SALES_EMAIL"),
            from: env_opt("POSTMARK_FROM"),
        };

        let business_defaults = BusinessProfile::default();
        let business = BusinessProfile {
            name: env_or("BUSINESS_NAME", &business_defaults.name),
            signature: env_or("SIGNATURE_NAME", &business_defaults.signature),
            scheduling_link: env_opt("CALENDLY_LINK"),
        };

        Ok(Config {
            host,
            port,
            log_level,
            max_body_size,
            http_timeout_secs,
            intake,
            airtable,
            postmark,
            business,
        })
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("Invalid {key}: expected a boolean, got '{other}'")),
    }
}

/// Unset and blank variables are both treated as missing.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_list(key: &str, separator: char) -> Option<Vec<String>> {
    let items: Vec<String> = env_opt(key)?
        .split(separator)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();
    (!items.is_empty()).then_some(items)
}
