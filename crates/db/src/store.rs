//! Collaborator seams over case data. The server wires these to the
//! in-memory store; a SQL-backed store would implement the same traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    dispute::{CaseUpdate, Dispute, DisputeStatus, FinalDocumentWrite},
    document::SubmittedDocument,
    meeting::Meeting,
    notification::Notification,
    professional::{Professional, UpdateProfessional},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("case not found: {0}")]
    CaseNotFound(String),
    #[error("professional not found: {0}")]
    ProfessionalNotFound(Uuid),
    #[error("notification not found: {0}")]
    NotificationNotFound(Uuid),
    #[error("store backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn insert(&self, dispute: Dispute) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Dispute>, StoreError>;

    /// Look up by internal id or public case code, whichever matches.
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Dispute>, StoreError>;

    /// All cases, newest filing first.
    async fn list(&self) -> Result<Vec<Dispute>, StoreError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Dispute>, StoreError>;

    async fn list_for_professional(
        &self,
        professional_id: Uuid,
    ) -> Result<Vec<Dispute>, StoreError>;

    /// Write the professional assignment columns and the given status.
    async fn set_assignment(
        &self,
        id: Uuid,
        professional_id: Uuid,
        professional_name: &str,
        status: DisputeStatus,
    ) -> Result<Dispute, StoreError>;

    /// Write the denormalized meeting columns and the given status.
    async fn set_meeting(
        &self,
        id: Uuid,
        meeting_date: DateTime<Utc>,
        meeting_link: &str,
        status: DisputeStatus,
    ) -> Result<Dispute, StoreError>;

    /// Write all final-document columns in one update.
    async fn set_final_document(
        &self,
        id: Uuid,
        write: FinalDocumentWrite,
    ) -> Result<Dispute, StoreError>;

    /// Append an entry to the case's history timeline.
    async fn append_update(&self, id: Uuid, entry: CaseUpdate) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProfessionalStore: Send + Sync {
    async fn insert(&self, professional: Professional) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Professional>, StoreError>;

    async fn list(&self) -> Result<Vec<Professional>, StoreError>;

    async fn update(
        &self,
        id: Uuid,
        update: UpdateProfessional,
    ) -> Result<Professional, StoreError>;

    async fn increment_cases_handled(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn insert(&self, meeting: Meeting) -> Result<(), StoreError>;

    /// Meetings for a case in scheduling order.
    async fn list_for_dispute(&self, dispute_id: Uuid) -> Result<Vec<Meeting>, StoreError>;

    async fn count_for_dispute(&self, dispute_id: Uuid) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, document: SubmittedDocument) -> Result<(), StoreError>;

    /// Submitted documents for a case in submission order.
    async fn list_for_dispute(
        &self,
        dispute_id: Uuid,
    ) -> Result<Vec<SubmittedDocument>, StoreError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: Notification) -> Result<(), StoreError>;

    /// Notifications for a user, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError>;

    async fn mark_read(&self, id: Uuid) -> Result<Notification, StoreError>;
}
