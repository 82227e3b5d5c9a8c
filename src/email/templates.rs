use askama::Template;

use crate::config::BusinessProfile;
use crate::effects::EffectError;
use crate::effects::context::EffectContext;
use crate::models::Lead;

pub fn owner_subject(ctx: &EffectContext) -> String {
    let lead = &ctx.lead;
    format!(
        "New Lead: {} {} ({}) — Score {}",
        lead.first_name, lead.last_name, lead.interest, ctx.score
    )
}

#[derive(Template)]
#[template(path = "email/owner.html")]
struct OwnerEmailTemplate<'a> {
    business: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    interest: &'a str,
    best_time: &'a str,
    consent: &'static str,
    score: i32,
    goal_lines: Vec<&'a str>,
    utm_source: &'a str,
    utm_medium: &'a str,
    utm_campaign: &'a str,
    referrer: &'a str,
    landing_path: &'a str,
    device: &'a str,
    time_to_complete: u64,
}

#[derive(Template)]
#[template(path = "email/confirmation.html")]
struct ConfirmationEmailTemplate<'a> {
    name: &'a str,
    business: &'a str,
    signature: &'a str,
    scheduling_link: Option<&'a str>,
}

pub fn render_owner_html(ctx: &EffectContext, business: &str) -> Result<String, EffectError> {
    let lead = &ctx.lead;
    let attr = &lead.attribution;
    OwnerEmailTemplate {
        business,
        first_name: &lead.first_name,
        last_name: &lead.last_name,
        email: &lead.email,
        interest: &lead.interest,
        best_time: &lead.best_time,
        consent: lead.consent.as_str(),
        score: ctx.score,
        goal_lines: lead.goals.lines().collect(),
        utm_source: or_dash(&attr.utm_source),
        utm_medium: or_dash(&attr.utm_medium),
        utm_campaign: or_dash(&attr.utm_campaign),
        referrer: or_dash(&attr.referrer),
        landing_path: or_dash(&attr.landing_path),
        device: or_dash(&attr.device),
        time_to_complete: lead.time_to_complete,
    }
    .render()
    .map_err(|e| EffectError::Build(format!("Failed to render owner email: {e}")))
}

pub fn render_owner_text(ctx: &EffectContext) -> String {
    let lead = &ctx.lead;
    let attr = &lead.attribution;
    format!(
        "New lead: {name} ({email})\n\
         Interest: {interest}\n\
         Best time: {best_time}\n\
         Consent: {consent}\n\
         Score: {score}\n\
         \n\
         Goals:\n{goals}\n\
         \n\
         UTM: {source}/{medium}/{campaign}\n\
         Referrer: {referrer}\n\
         Path: {path}\n\
         Device: {device}\n\
         TTC: {ttc} ms\n",
        name = lead.full_name(),
        email = lead.email,
        interest = lead.interest,
        best_time = lead.best_time,
        consent = lead.consent.as_str(),
        score = ctx.score,
        goals = lead.goals,
        source = or_dash(&attr.utm_source),
        medium = or_dash(&attr.utm_medium),
        campaign = or_dash(&attr.utm_campaign),
        referrer = or_dash(&attr.referrer),
        path = or_dash(&attr.landing_path),
        device = or_dash(&attr.device),
        ttc = lead.time_to_complete,
    )
}

pub fn confirmation_subject(business: &BusinessProfile) -> String {
    format!("{} — Consultation Request Received", business.name)
}

pub fn render_confirmation_text(lead: &Lead, business: &BusinessProfile) -> String {
    let booking = match &business.scheduling_link {
        Some(link) => format!("To lock a time now, book here: {link}\n"),
        None => String::new(),
    };
    format!(
        "Hi {name},\n\
         \n\
         Thanks for reaching out to {business}. I'll follow up shortly.\n\
         {booking}\n\
         – {signature}\n",
        name = greeting_name(lead),
        business = business.name,
        signature = business.signature,
    )
}

pub fn render_confirmation_html(
    lead: &Lead,
    business: &BusinessProfile,
) -> Result<String, EffectError> {
    ConfirmationEmailTemplate {
        name: greeting_name(lead),
        business: &business.name,
        signature: &business.signature,
        scheduling_link: business.scheduling_link.as_deref(),
    }
    .render()
    .map_err(|e| EffectError::Build(format!("Failed to render confirmation email: {e}")))
}

fn greeting_name(lead: &Lead) -> &str {
    if lead.first_name.is_empty() {
        "there"
    } else {
        &lead.first_name
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}
