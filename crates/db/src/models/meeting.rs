use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One scheduled video conference. Rows are append-only; the case itself
/// carries the latest meeting in its denormalized fields.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Meeting {
    pub id: Uuid,
    pub dispute_id: Uuid,
    pub meeting_date: DateTime<Utc>,
    pub meeting_link: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMeeting {
    pub dispute_id: Uuid,
    pub meeting_date: DateTime<Utc>,
    pub meeting_link: String,
}

impl Meeting {
    pub fn new(data: CreateMeeting) -> Self {
        Self {
            id: Uuid::new_v4(),
            dispute_id: data.dispute_id,
            meeting_date: data.meeting_date,
            meeting_link: data.meeting_link,
            created_at: Utc::now(),
        }
    }
}
