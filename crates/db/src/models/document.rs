use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Evidence document submitted by a party during proceedings. Only the
/// descriptor is kept here; it is what the issued award lists.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SubmittedDocument {
    pub id: Uuid,
    pub dispute_id: Uuid,
    pub document_name: String,
    pub submitted_by: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateSubmittedDocument {
    pub dispute_id: Uuid,
    pub document_name: String,
    pub submitted_by: String,
    pub description: Option<String>,
}

impl SubmittedDocument {
    pub fn new(data: CreateSubmittedDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            dispute_id: data.dispute_id,
            document_name: data.document_name,
            submitted_by: data.submitted_by,
            // Empty descriptions are stored as absent.
            description: data.description.filter(|d| !d.is_empty()),
            created_at: Utc::now(),
        }
    }
}
