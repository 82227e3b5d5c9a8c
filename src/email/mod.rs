pub mod templates;

use serde::Serialize;

use crate::config::PostmarkConfig;
use crate::effects::{EffectError, ensure_success};

/// A single transactional message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkRequest<'a> {
    #[serde(flatten)]
    email: &'a OutboundEmail,
    message_stream: &'a str,
}

/// The bare address of a mailbox, dropping any display name:
/// `Name <user@host>` yields `user@host`.
pub fn mailbox_address(mailbox: &str) -> &str {
    let mailbox = mailbox.trim();
    match mailbox.rsplit_once('<') {
        Some((_, rest)) => rest.strip_suffix('>').unwrap_or(rest).trim(),
        None => mailbox,
    }
}

/// Thin client over the Postmark `/email` endpoint.
#[derive(Clone)]
pub struct PostmarkMailer {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    message_stream: String,
}

impl PostmarkMailer {
    pub fn new(client: reqwest::Client, api_url: &str, token: String, message_stream: String) -> Self {
        Self {
            client,
            endpoint: format!("{}/email", api_url.trim_end_matches('/')),
            token,
            message_stream,
        }
    }

    /// `None` when no server token is configured.
    pub fn from_config(client: reqwest::Client, config: &PostmarkConfig) -> Option<Self> {
        let token = config.token.clone()?;
        Some(Self::new(
            client,
            &config.api_url,
            token,
            config.message_stream.clone(),
        ))
    }

    pub async fn send(&self, label: &str, email: &OutboundEmail) -> Result<(), EffectError> {
        let body = PostmarkRequest {
            email,
            message_stream: &self.message_stream,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-Postmark-Server-Token", &self.token)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EffectError::Transport(format!("Postmark({label}): {e}")))?;

        ensure_success(&format!("Postmark({label})"), resp).await
    }
}
