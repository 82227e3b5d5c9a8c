use std::sync::Arc;

use futures_util::future::join_all;
use uuid::Uuid;

use crate::config::{Config, IntakePolicy};
use crate::effects::confirmation::LeadConfirmation;
use crate::effects::context::EffectContext;
use crate::effects::owner::OwnerNotification;
use crate::effects::record::RecordEffect;
use crate::effects::{Effect, EffectError, EffectOutcome, EffectPolicy};
use crate::email::PostmarkMailer;
use crate::error::AppError;
use crate::models::RawSubmission;

use super::normalize;
use super::score;
use super::spam::{self, Rejection};

pub struct RegisteredEffect {
    pub policy: EffectPolicy,
    pub effect: Arc<dyn Effect>,
}

pub enum PipelineResult {
    Ignored,
    Rejected(Rejection),
    Processed(Report),
}

impl PipelineResult {
    /// Response message. Rejections read exactly like processed leads so
    /// probing clients learn nothing about the filters.
    pub fn message(&self) -> &'static str {
        match self {
            PipelineResult::Ignored => "Ignored other form",
            PipelineResult::Rejected(_) | PipelineResult::Processed(_) => "Processed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub submission_id: Uuid,
    pub score: i32,
    pub effects: Vec<EffectReport>,
}

impl Report {
    pub fn effect(&self, id: &str) -> Option<&EffectReport> {
        self.effects.iter().find(|e| e.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct EffectReport {
    pub id: String,
    pub policy: EffectPolicy,
    pub status: EffectStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectStatus {
    Delivered,
    Skipped(String),
    Failed(String),
}

/// Screens, normalizes and scores submissions, then fans out to the
/// registered effects. Holds no per-request state.
pub struct Pipeline {
    intake: IntakePolicy,
    effects: Vec<RegisteredEffect>,
}

impl Pipeline {
    pub fn new(intake: IntakePolicy) -> Self {
        Self {
            intake,
            effects: Vec::new(),
        }
    }

    /// Wire the record store, owner notification and lead confirmation.
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        let mailer = PostmarkMailer::from_config(client.clone(), &config.postmark);
        let sender = config.postmark.sender().map(str::to_string);
        let sales_email = config.postmark.sales_email.clone();

        let mut pipeline = Self::new(config.intake.clone());
        pipeline.register(
            EffectPolicy::BestEffort,
            Arc::new(RecordEffect::new(client, config.airtable.clone())),
        );
        pipeline.register(
            EffectPolicy::Mandatory,
            Arc::new(OwnerNotification::new(
                mailer.clone(),
                sales_email.clone(),
                sender.clone(),
                config.business.name.clone(),
            )),
        );
        pipeline.register(
            EffectPolicy::BestEffort,
            Arc::new(LeadConfirmation::new(
                mailer,
                sender,
                sales_email,
                config.business.clone(),
                config.intake.confirm_same_domain_only,
            )),
        );
        pipeline
    }

    pub fn register(&mut self, policy: EffectPolicy, effect: Arc<dyn Effect>) {
        self.effects.push(RegisteredEffect { policy, effect });
    }

    #[tracing::instrument(name = "intake", skip_all, fields(form = %submission.form_name))]
    pub async fn run(&self, submission: RawSubmission) -> Result<PipelineResult, AppError> {
        if submission.form_name != self.intake.form_name {
            tracing::debug!("Ignoring submission for form '{}'", submission.form_name);
            return Ok(PipelineResult::Ignored);
        }

        if let Err(rejection) = spam::screen(&submission, &self.intake) {
            tracing::info!(reason = %rejection, "Submission rejected");
            return Ok(PipelineResult::Rejected(rejection));
        }

        let lead = normalize::lead(&submission);
        let score = score::score(&lead);
        let ctx = EffectContext::new(lead, score);
        tracing::info!(submission_id = %ctx.submission_id, score, "Lead accepted");

        let results = join_all(self.effects.iter().map(|registered| {
            let ctx = &ctx;
            async move { (registered, registered.effect.execute(ctx).await) }
        }))
        .await;

        let mut fatal = None;
        let mut effects = Vec::with_capacity(results.len());

        for (registered, result) in results {
            let id = registered.effect.id().to_string();
            let status = match result {
                Ok(EffectOutcome::Delivered) => {
                    tracing::info!(effect = %id, "Effect delivered");
                    EffectStatus::Delivered
                }
                Ok(EffectOutcome::Skipped(reason)) => {
                    tracing::info!(effect = %id, "Effect skipped: {reason}");
                    EffectStatus::Skipped(reason)
                }
                Err(e) => {
                    match registered.policy {
                        EffectPolicy::Mandatory => {
                            tracing::error!(effect = %id, "Mandatory effect failed: {e}");
                            if fatal.is_none() {
                                fatal = Some(fatal_error(&id, &e));
                            }
                        }
                        EffectPolicy::BestEffort => {
                            tracing::warn!(effect = %id, "Effect failed: {e}");
                        }
                    }
                    EffectStatus::Failed(e.to_string())
                }
            };
            effects.push(EffectReport {
                id,
                policy: registered.policy,
                status,
            });
        }

        if let Some(err) = fatal {
            return Err(err);
        }

        Ok(PipelineResult::Processed(Report {
            submission_id: ctx.submission_id,
            score: ctx.score,
            effects,
        }))
    }
}

fn fatal_error(effect_id: &str, err: &EffectError) -> AppError {
    match err {
        EffectError::ConfigMissing(what) => AppError::ConfigMissing(format!("{effect_id}: {what}")),
        other => AppError::Upstream(format!("{effect_id}: {other}")),
    }
}
