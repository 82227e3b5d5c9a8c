use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Lead;

pub struct EffectContext {
    pub submission_id: Uuid,
    pub lead: Lead,
    pub score: i32,
    pub submitted_at: DateTime<Utc>,
}

impl EffectContext {
    pub fn new(lead: Lead, score: i32) -> Self {
        Self {
            submission_id: Uuid::now_v7(),
            lead,
            score,
            submitted_at: Utc::now(),
        }
    }
}
