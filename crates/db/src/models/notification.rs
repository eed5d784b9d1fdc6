use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    ProfessionalAssigned,
    MeetingScheduled,
    DocumentIssued,
}

/// In-app notification shown on a user's dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dispute_id: Uuid,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub dispute_id: Uuid,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(data: CreateNotification) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            dispute_id: data.dispute_id,
            kind: data.kind,
            title: data.title,
            message: data.message,
            read: false,
            created_at: Utc::now(),
        }
    }
}
