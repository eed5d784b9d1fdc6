//! In-memory store backing the server binary and the test suites. All access
//! goes through the store traits, so a SQL-backed implementation can replace
//! this one without touching the services.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    models::{
        dispute::{CaseUpdate, Dispute, DisputeStatus, FinalDocumentWrite},
        document::SubmittedDocument,
        meeting::Meeting,
        notification::Notification,
        professional::{Professional, UpdateProfessional},
    },
    store::{
        CaseStore, DocumentStore, MeetingStore, NotificationStore, ProfessionalStore, StoreError,
    },
};

#[derive(Default)]
pub struct MemoryDb {
    disputes: RwLock<HashMap<Uuid, Dispute>>,
    professionals: RwLock<HashMap<Uuid, Professional>>,
    meetings: RwLock<Vec<Meeting>>,
    documents: RwLock<Vec<SubmittedDocument>>,
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CaseStore for MemoryDb {
    async fn insert(&self, dispute: Dispute) -> Result<(), StoreError> {
        self.disputes.write().await.insert(dispute.id, dispute);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Dispute>, StoreError> {
        Ok(self.disputes.read().await.get(&id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Dispute>, StoreError> {
        let disputes = self.disputes.read().await;
        if let Ok(id) = Uuid::parse_str(reference) {
            if let Some(dispute) = disputes.get(&id) {
                return Ok(Some(dispute.clone()));
            }
        }
        Ok(disputes
            .values()
            .find(|d| d.case_code == reference)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Dispute>, StoreError> {
        let mut all: Vec<Dispute> = self.disputes.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.filed_at.cmp(&a.filed_at));
        Ok(all)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Dispute>, StoreError> {
        let mut mine: Vec<Dispute> = self
            .disputes
            .read()
            .await
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.filed_at.cmp(&a.filed_at));
        Ok(mine)
    }

    async fn list_for_professional(
        &self,
        professional_id: Uuid,
    ) -> Result<Vec<Dispute>, StoreError> {
        let mut assigned: Vec<Dispute> = self
            .disputes
            .read()
            .await
            .values()
            .filter(|d| d.assigned_professional_id == Some(professional_id))
            .cloned()
            .collect();
        assigned.sort_by(|a, b| b.filed_at.cmp(&a.filed_at));
        Ok(assigned)
    }

    async fn set_assignment(
        &self,
        id: Uuid,
        professional_id: Uuid,
        professional_name: &str,
        status: DisputeStatus,
    ) -> Result<Dispute, StoreError> {
        let mut disputes = self.disputes.write().await;
        let dispute = disputes
            .get_mut(&id)
            .ok_or_else(|| StoreError::CaseNotFound(id.to_string()))?;
        dispute.assigned_professional_id = Some(professional_id);
        dispute.assigned_professional_name = Some(professional_name.to_string());
        dispute.status = status;
        Ok(dispute.clone())
    }

    async fn set_meeting(
        &self,
        id: Uuid,
        meeting_date: DateTime<Utc>,
        meeting_link: &str,
        status: DisputeStatus,
    ) -> Result<Dispute, StoreError> {
        let mut disputes = self.disputes.write().await;
        let dispute = disputes
            .get_mut(&id)
            .ok_or_else(|| StoreError::CaseNotFound(id.to_string()))?;
        dispute.meeting_date = Some(meeting_date);
        dispute.meeting_link = Some(meeting_link.to_string());
        dispute.status = status;
        Ok(dispute.clone())
    }

    async fn set_final_document(
        &self,
        id: Uuid,
        write: FinalDocumentWrite,
    ) -> Result<Dispute, StoreError> {
        let mut disputes = self.disputes.write().await;
        let dispute = disputes
            .get_mut(&id)
            .ok_or_else(|| StoreError::CaseNotFound(id.to_string()))?;
        dispute.document_type = Some(write.document_type);
        dispute.final_document = Some(write.final_document);
        dispute.award_object_key = Some(write.award_object_key);
        dispute.applicant_advocate_name = write.applicant_advocate_name;
        dispute.applicant_advocate_phone = write.applicant_advocate_phone;
        dispute.respondent_advocate_name = write.respondent_advocate_name;
        dispute.respondent_advocate_phone = write.respondent_advocate_phone;
        dispute.status = write.status;
        Ok(dispute.clone())
    }

    async fn append_update(&self, id: Uuid, entry: CaseUpdate) -> Result<(), StoreError> {
        let mut disputes = self.disputes.write().await;
        let dispute = disputes
            .get_mut(&id)
            .ok_or_else(|| StoreError::CaseNotFound(id.to_string()))?;
        dispute.updates.push(entry);
        Ok(())
    }
}

#[async_trait]
impl ProfessionalStore for MemoryDb {
    async fn insert(&self, professional: Professional) -> Result<(), StoreError> {
        self.professionals
            .write()
            .await
            .insert(professional.id, professional);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Professional>, StoreError> {
        Ok(self.professionals.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Professional>, StoreError> {
        let mut all: Vec<Professional> =
            self.professionals.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn update(
        &self,
        id: Uuid,
        update: UpdateProfessional,
    ) -> Result<Professional, StoreError> {
        let mut professionals = self.professionals.write().await;
        let professional = professionals
            .get_mut(&id)
            .ok_or(StoreError::ProfessionalNotFound(id))?;
        if let Some(name) = update.name {
            professional.name = name;
        }
        if let Some(email) = update.email {
            professional.email = email;
        }
        if let Some(phone) = update.phone {
            professional.phone = phone;
        }
        if let Some(specialization) = update.specialization {
            professional.specialization = specialization;
        }
        if let Some(experience_years) = update.experience_years {
            professional.experience_years = experience_years;
        }
        if let Some(status) = update.status {
            professional.status = status;
        }
        Ok(professional.clone())
    }

    async fn increment_cases_handled(&self, id: Uuid) -> Result<(), StoreError> {
        let mut professionals = self.professionals.write().await;
        let professional = professionals
            .get_mut(&id)
            .ok_or(StoreError::ProfessionalNotFound(id))?;
        professional.cases_handled += 1;
        Ok(())
    }
}

#[async_trait]
impl MeetingStore for MemoryDb {
    async fn insert(&self, meeting: Meeting) -> Result<(), StoreError> {
        self.meetings.write().await.push(meeting);
        Ok(())
    }

    async fn list_for_dispute(&self, dispute_id: Uuid) -> Result<Vec<Meeting>, StoreError> {
        Ok(self
            .meetings
            .read()
            .await
            .iter()
            .filter(|m| m.dispute_id == dispute_id)
            .cloned()
            .collect())
    }

    async fn count_for_dispute(&self, dispute_id: Uuid) -> Result<usize, StoreError> {
        Ok(self
            .meetings
            .read()
            .await
            .iter()
            .filter(|m| m.dispute_id == dispute_id)
            .count())
    }
}

#[async_trait]
impl DocumentStore for MemoryDb {
    async fn insert(&self, document: SubmittedDocument) -> Result<(), StoreError> {
        self.documents.write().await.push(document);
        Ok(())
    }

    async fn list_for_dispute(
        &self,
        dispute_id: Uuid,
    ) -> Result<Vec<SubmittedDocument>, StoreError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .filter(|d| d.dispute_id == dispute_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationStore for MemoryDb {
    async fn insert(&self, notification: Notification) -> Result<(), StoreError> {
        self.notifications.write().await.push(notification);
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid) -> Result<Notification, StoreError> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::NotificationNotFound(id))?;
        notification.read = true;
        Ok(notification.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        dispute::{
            Applicant, ContractType, CreateDispute, DocumentType, FinalDocument,
            ResolutionMethod, Respondent,
        },
        notification::{CreateNotification, NotificationKind},
        professional::{CreateProfessional, ProfessionalKind, ProfessionalStatus},
    };

    fn sample_dispute() -> Dispute {
        Dispute::new(
            CreateDispute {
                user_id: Uuid::new_v4(),
                applicant: Applicant {
                    name: "Ravi Kumar".to_string(),
                    phone: "9811111111".to_string(),
                    email: "ravi@example.com".to_string(),
                    address: "12 MG Road, Pune".to_string(),
                    annual_income: 350_000,
                },
                respondent: Respondent {
                    name: "Sunil Shah".to_string(),
                    phone: "9822222222".to_string(),
                    email: "sunil@example.com".to_string(),
                    address: "44 FC Road, Pune".to_string(),
                },
                contract_type: ContractType::LoanAgreement,
                resolution_method: ResolutionMethod::Arbitration,
                description: "Unpaid loan installments since January.".to_string(),
            },
            "ODR/2025/123456".to_string(),
            true,
        )
    }

    #[tokio::test]
    async fn find_by_reference_matches_id_and_case_code() {
        let db = MemoryDb::new();
        let dispute = sample_dispute();
        let id = dispute.id;
        CaseStore::insert(&db, dispute).await.unwrap();

        let by_id = db.find_by_reference(&id.to_string()).await.unwrap();
        assert!(by_id.is_some());

        let by_code = db.find_by_reference("ODR/2025/123456").await.unwrap();
        assert_eq!(by_code.unwrap().id, id);

        let missing = db.find_by_reference("ODR/2025/999999").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn set_final_document_writes_every_column() {
        let db = MemoryDb::new();
        let dispute = sample_dispute();
        let id = dispute.id;
        CaseStore::insert(&db, dispute).await.unwrap();

        let updated = db
            .set_final_document(
                id,
                FinalDocumentWrite {
                    document_type: DocumentType::ArbitrationAward,
                    final_document: FinalDocument {
                        document_type: DocumentType::ArbitrationAward,
                        summary: "Settled.".to_string(),
                        outcome: "Award in favour of applicant.".to_string(),
                        terms: "Payment within 30 days.".to_string(),
                        remarks: String::new(),
                        issued_at: Utc::now(),
                    },
                    award_object_key: format!("{}/award-1.pdf", id),
                    applicant_advocate_name: Some("Adv. Rao".to_string()),
                    applicant_advocate_phone: None,
                    respondent_advocate_name: None,
                    respondent_advocate_phone: None,
                    status: DisputeStatus::ArbitrationAwardIssued,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, DisputeStatus::ArbitrationAwardIssued);
        assert_eq!(updated.applicant_advocate_name.as_deref(), Some("Adv. Rao"));
        assert!(updated.respondent_advocate_name.is_none());
        assert!(updated.award_object_key.is_some());
    }

    #[tokio::test]
    async fn set_final_document_on_missing_case_fails() {
        let db = MemoryDb::new();
        let err = db
            .set_assignment(
                Uuid::new_v4(),
                Uuid::new_v4(),
                "Adv. Meera Nair",
                DisputeStatus::ProfessionalAssigned,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CaseNotFound(_)));
    }

    #[tokio::test]
    async fn notifications_list_newest_first_and_mark_read() {
        let db = MemoryDb::new();
        let user_id = Uuid::new_v4();
        let dispute_id = Uuid::new_v4();
        for title in ["first", "second"] {
            NotificationStore::insert(
                &db,
                Notification::new(CreateNotification {
                    user_id,
                    dispute_id,
                    kind: NotificationKind::MeetingScheduled,
                    title: title.to_string(),
                    message: String::new(),
                }),
            )
            .await
            .unwrap();
        }

        let listed = NotificationStore::list_for_user(&db, user_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "second");
        assert!(!listed[0].read);

        let marked = db.mark_read(listed[0].id).await.unwrap();
        assert!(marked.read);
        let listed = NotificationStore::list_for_user(&db, user_id).await.unwrap();
        assert!(listed[0].read);
        assert!(!listed[1].read);
    }

    #[tokio::test]
    async fn professional_update_and_counter() {
        let db = MemoryDb::new();
        let professional = Professional::new(CreateProfessional {
            name: "Adv. Meera Nair".to_string(),
            kind: ProfessionalKind::Arbitrator,
            email: "meera@example.com".to_string(),
            phone: "9876543210".to_string(),
            specialization: "Financial disputes".to_string(),
            experience_years: 8,
        });
        let id = professional.id;
        ProfessionalStore::insert(&db, professional).await.unwrap();

        db.increment_cases_handled(id).await.unwrap();
        db.increment_cases_handled(id).await.unwrap();

        let updated = db
            .update(
                id,
                UpdateProfessional {
                    status: Some(ProfessionalStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.cases_handled, 2);
        assert_eq!(updated.status, ProfessionalStatus::Inactive);
        assert_eq!(updated.name, "Adv. Meera Nair");
    }
}
