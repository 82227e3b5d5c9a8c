use async_trait::async_trait;

use super::context::EffectContext;
use super::{Effect, EffectError, EffectOutcome};
use crate::config::BusinessProfile;
use crate::email::{OutboundEmail, PostmarkMailer, mailbox_address, templates};
use crate::models::lead::domain_of;

/// Acknowledges the request to the lead.
pub struct LeadConfirmation {
    mailer: Option<PostmarkMailer>,
    sender: Option<String>,
    reply_to: Option<String>,
    business: BusinessProfile,
    same_domain_only: bool,
}

impl LeadConfirmation {
    pub fn new(
        mailer: Option<PostmarkMailer>,
        sender: Option<String>,
        reply_to: Option<String>,
        business: BusinessProfile,
        same_domain_only: bool,
    ) -> Self {
        Self {
            mailer,
            sender,
            reply_to,
            business,
            same_domain_only,
        }
    }
}

/// Some providers only deliver to the sender's own domain until the
/// account is approved. Returns true when this send would be refused.
pub fn crosses_domains(sender: &str, recipient: &str) -> bool {
    match (domain_of(mailbox_address(sender)), domain_of(recipient)) {
        (Some(a), Some(b)) => !a.eq_ignore_ascii_case(b),
        _ => true,
    }
}

#[async_trait]
impl Effect for LeadConfirmation {
    fn id(&self) -> &str {
        "lead_confirmation"
    }

    async fn execute(&self, ctx: &EffectContext) -> Result<EffectOutcome, EffectError> {
        let (Some(mailer), Some(from)) = (&self.mailer, &self.sender) else {
            return Ok(EffectOutcome::Skipped("Postmark not configured".to_string()));
        };

        let lead = &ctx.lead;
        if lead.email.is_empty() {
            return Ok(EffectOutcome::Skipped("lead has no email".to_string()));
        }

        if self.same_domain_only && crosses_domains(from, &lead.email) {
            return Ok(EffectOutcome::Skipped(
                "sender and recipient domains differ".to_string(),
            ));
        }

        let email = OutboundEmail {
            from: from.clone(),
            to: lead.email.clone(),
            subject: templates::confirmation_subject(&self.business),
            html_body: templates::render_confirmation_html(lead, &self.business)?,
            text_body: Some(templates::render_confirmation_text(lead, &self.business)),
            reply_to: self.reply_to.clone(),
        };

        mailer.send("lead", &email).await?;
        Ok(EffectOutcome::Delivered)
    }
}
