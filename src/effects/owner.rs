use async_trait::async_trait;

use super::context::EffectContext;
use super::{Effect, EffectError, EffectOutcome};
use crate::email::{OutboundEmail, PostmarkMailer, templates};

/// Emails the business inbox about every new lead.
pub struct OwnerNotification {
    mailer: Option<PostmarkMailer>,
    sales_email: Option<String>,
    sender: Option<String>,
    business_name: String,
}

impl OwnerNotification {
    pub fn new(
        mailer: Option<PostmarkMailer>,
        sales_email: Option<String>,
        sender: Option<String>,
        business_name: String,
    ) -> Self {
        Self {
            mailer,
            sales_email,
            sender,
            business_name,
        }
    }
}

#[async_trait]
impl Effect for OwnerNotification {
    fn id(&self) -> &str {
        "owner_notification"
    }

    async fn execute(&self, ctx: &EffectContext) -> Result<EffectOutcome, EffectError> {
        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| EffectError::ConfigMissing("POSTMARK_TOKEN".to_string()))?;
        let to = self
            .sales_email
            .as_ref()
            .ok_or_else(|| EffectError::ConfigMissing("SALES_EMAIL".to_string()))?;
        let from = self.sender.clone().unwrap_or_else(|| to.clone());

        let email = OutboundEmail {
            from,
            to: to.clone(),
            subject: templates::owner_subject(ctx),
            html_body: templates::render_owner_html(ctx, &self.business_name)?,
            text_body: Some(templates::render_owner_text(ctx)),
            reply_to: Some(ctx.lead.email.clone()).filter(|e| !e.is_empty()),
        };

        mailer.send("owner", &email).await?;
        Ok(EffectOutcome::Delivered)
    }
}
