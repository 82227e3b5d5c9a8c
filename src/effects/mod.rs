pub mod confirmation;
pub mod context;
pub mod owner;
pub mod record;

use async_trait::async_trait;

use context::EffectContext;

/// How much a caller should care when an effect fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPolicy {
    /// Failure fails the whole invocation.
    Mandatory,
    /// Failure is logged and swallowed.
    BestEffort,
}

/// Result of an effect that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    Delivered,
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    ConfigMissing(String),
    Upstream { service: String, status: u16, body: String },
    Transport(String),
    Build(String),
}

impl std::fmt::Display for EffectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectError::ConfigMissing(what) => write!(f, "not configured: {what}"),
            EffectError::Upstream { service, status, body } => {
                write!(f, "{service}: {status} {body}")
            }
            EffectError::Transport(msg) => write!(f, "request failed: {msg}"),
            EffectError::Build(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EffectError {}

/// A side effect triggered once per accepted lead.
#[async_trait]
pub trait Effect: Send + Sync {
    fn id(&self) -> &str;
    async fn execute(&self, ctx: &EffectContext) -> Result<EffectOutcome, EffectError>;
}

/// Turn a non-2xx response into an [`EffectError::Upstream`], keeping at most
/// 1 KiB of the response body.
pub(crate) async fn ensure_success(
    service: &str,
    resp: reqwest::Response,
) -> Result<(), EffectError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }

    let body = resp
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(1024)
        .collect::<String>();

    Err(EffectError::Upstream {
        service: service.to_string(),
        status: status.as_u16(),
        body,
    })
}
