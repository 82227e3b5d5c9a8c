use async_trait::async_trait;
use serde::Serialize;

use super::context::EffectContext;
use super::{Effect, EffectError, EffectOutcome, ensure_success};
use crate::config::AirtableConfig;

/// Stores each lead as a row in the Airtable leads table.
pub struct RecordEffect {
    client: reqwest::Client,
    config: Option<AirtableConfig>,
}

impl RecordEffect {
    pub fn new(client: reqwest::Client, config: Option<AirtableConfig>) -> Self {
        Self { client, config }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateRecords<'a> {
    pub records: Vec<NewRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct NewRecord<'a> {
    pub fields: LeadFields<'a>,
}

/// Column names as they appear in the Airtable base.
#[derive(Debug, Serialize)]
pub struct LeadFields<'a> {
    #[serde(rename = "Status")]
    pub status: &'a str,
    #[serde(rename = "Score")]
    pub score: i32,
    #[serde(rename = "First Name")]
    pub first_name: &'a str,
    #[serde(rename = "Last Name")]
    pub last_name: &'a str,
    #[serde(rename = "Email")]
    pub email: &'a str,
    #[serde(rename = "Interest")]
    pub interest: &'a str,
    #[serde(rename = "Best Time")]
    pub best_time: &'a str,
    #[serde(rename = "Goals")]
    pub goals: &'a str,
    #[serde(rename = "Consent")]
    pub consent: &'a str,
    #[serde(rename = "UTM Source")]
    pub utm_source: &'a str,
    #[serde(rename = "UTM Medium")]
    pub utm_medium: &'a str,
    #[serde(rename = "UTM Campaign")]
    pub utm_campaign: &'a str,
    #[serde(rename = "UTM Term")]
    pub utm_term: &'a str,
    #[serde(rename = "UTM Content")]
    pub utm_content: &'a str,
    #[serde(rename = "Referrer")]
    pub referrer: &'a str,
    #[serde(rename = "Landing Path")]
    pub landing_path: &'a str,
    #[serde(rename = "Device")]
    pub device: &'a str,
    #[serde(rename = "Time to Complete (ms)")]
    pub time_to_complete: u64,
    #[serde(rename = "Submitted At")]
    pub submitted_at: String,
}

impl<'a> LeadFields<'a> {
    pub fn from_context(ctx: &'a EffectContext) -> Self {
        let lead = &ctx.lead;
        let attr = &lead.attribution;
        Self {
            status: "New",
            score: ctx.score,
            first_name: &lead.first_name,
            last_name: &lead.last_name,
            email: &lead.email,
            interest: &lead.interest,
            best_time: &lead.best_time,
            goals: &lead.goals,
            consent: lead.consent.as_str(),
            utm_source: &attr.utm_source,
            utm_medium: &attr.utm_medium,
            utm_campaign: &attr.utm_campaign,
            utm_term: &attr.utm_term,
            utm_content: &attr.utm_content,
            referrer: &attr.referrer,
            landing_path: &attr.landing_path,
            device: &attr.device,
            time_to_complete: lead.time_to_complete,
            submitted_at: ctx
                .submitted_at
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}

/// `{api_url}/{base_id}/{table_name}` with each segment percent-encoded.
pub fn table_url(config: &AirtableConfig) -> Result<reqwest::Url, EffectError> {
    let mut url = reqwest::Url::parse(&config.api_url)
        .map_err(|e| EffectError::Build(format!("Invalid Airtable API URL: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| EffectError::Build("Airtable API URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push(&config.base_id)
        .push(&config.table_name);
    Ok(url)
}

#[async_trait]
impl Effect for RecordEffect {
    fn id(&self) -> &str {
        "record"
    }

    async fn execute(&self, ctx: &EffectContext) -> Result<EffectOutcome, EffectError> {
        let Some(config) = &self.config else {
            return Ok(EffectOutcome::Skipped("Airtable not configured".to_string()));
        };

        let url = table_url(config)?;
        let body = CreateRecords {
            records: vec![NewRecord {
                fields: LeadFields::from_context(ctx),
            }],
        };

        let resp = self
            .client
            .post(url)
            .bearer_auth(&config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| EffectError::Transport(format!("Airtable: {e}")))?;

        ensure_success("Airtable", resp).await?;
        Ok(EffectOutcome::Delivered)
    }
}
