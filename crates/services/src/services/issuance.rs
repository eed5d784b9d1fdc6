//! Final-document issuance: render, store, record, notify.
//!
//! The flow is one conceptual transaction over three collaborators. Render,
//! upload and the case update are fatal; everything after the case update is
//! best-effort and reported through the outcome's soft failures. Nothing is
//! rolled back on a fatal failure, so an aborted run can leave an uploaded
//! object behind with no case pointing at it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use db::{
    models::{
        dispute::{
            Advocate, Dispute, DisputeStatus, DocumentType, FinalDocument, FinalDocumentWrite,
        },
        notification::NotificationKind,
    },
    store::{CaseStore, DocumentStore, MeetingStore, ProfessionalStore, StoreError},
};
use pdf::award::{AwardDocument, DocumentEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use super::{
    email::{EmailSender, send_to_parties},
    notifications::NotificationService,
    storage::{ObjectStore, StorageError},
    workflow::{StepFailure, Workflow},
};

/// Signer name printed when the professional record cannot be read.
const UNKNOWN_PROFESSIONAL: &str = "Unknown Professional";

#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("case not found: {0}")]
    CaseNotFound(Uuid),
    #[error("case {0} has no assigned professional")]
    NoProfessionalAssigned(Uuid),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct IssueDocumentRequest {
    pub document_type: DocumentType,
    pub summary: String,
    pub outcome: String,
    pub terms: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub applicant_advocate_name: Option<String>,
    #[serde(default)]
    pub applicant_advocate_phone: Option<String>,
    #[serde(default)]
    pub respondent_advocate_name: Option<String>,
    #[serde(default)]
    pub respondent_advocate_phone: Option<String>,
}

#[derive(Debug, Serialize, TS)]
pub struct IssuanceOutcome {
    pub case_id: Uuid,
    pub case_code: String,
    pub status: DisputeStatus,
    pub storage_key: String,
    pub issued_at: DateTime<Utc>,
    pub soft_failures: Vec<StepFailure>,
}

/// Drives the issue-document flow end to end.
#[derive(Clone)]
pub struct IssuanceService {
    cases: Arc<dyn CaseStore>,
    professionals: Arc<dyn ProfessionalStore>,
    meetings: Arc<dyn MeetingStore>,
    documents: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
    notifications: NotificationService,
    email: Arc<dyn EmailSender>,
}

impl IssuanceService {
    pub fn new(
        cases: Arc<dyn CaseStore>,
        professionals: Arc<dyn ProfessionalStore>,
        meetings: Arc<dyn MeetingStore>,
        documents: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        notifications: NotificationService,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            cases,
            professionals,
            meetings,
            documents,
            objects,
            notifications,
            email,
        }
    }

    /// Issue the final document for a case.
    ///
    /// Preconditions: the summary, outcome and terms are non-empty and the
    /// case has an assigned professional. Both are checked before any side
    /// effect. Concurrent issuances are not guarded against; each produces
    /// its own storage object and the last case update wins.
    pub async fn issue(
        &self,
        case_id: Uuid,
        request: IssueDocumentRequest,
    ) -> Result<IssuanceOutcome, IssuanceError> {
        validate_issue_request(&request)?;

        let mut flow = Workflow::new("issue-document");

        let dispute = flow
            .fatal("load-case", async {
                self.cases
                    .get(case_id)
                    .await?
                    .ok_or(IssuanceError::CaseNotFound(case_id))
            })
            .await?;
        let professional_id = dispute
            .assigned_professional_id
            .ok_or(IssuanceError::NoProfessionalAssigned(case_id))?;

        let professional_name = flow
            .best_effort("professional-name", async {
                self.professionals
                    .get(professional_id)
                    .await?
                    .map(|p| p.name)
                    .ok_or(StoreError::ProfessionalNotFound(professional_id))
            })
            .await
            .unwrap_or_else(|| UNKNOWN_PROFESSIONAL.to_string());

        let meetings_count = flow
            .best_effort("count-meetings", self.meetings.count_for_dispute(case_id))
            .await
            .unwrap_or(0);
        let documents_submitted: Vec<DocumentEntry> = flow
            .best_effort("list-documents", self.documents.list_for_dispute(case_id))
            .await
            .unwrap_or_default()
            .into_iter()
            .map(DocumentEntry::from)
            .collect();

        // One timestamp for the storage key, the record and both printed
        // dates on the document.
        let issued_at = Utc::now();

        let applicant_advocate_name = clean(request.applicant_advocate_name.clone());
        let applicant_advocate_phone = clean(request.applicant_advocate_phone.clone());
        let respondent_advocate_name = clean(request.respondent_advocate_name.clone());
        let respondent_advocate_phone = clean(request.respondent_advocate_phone.clone());

        let award = AwardDocument {
            case_code: dispute.case_code.clone(),
            applicant_name: dispute.applicant.name.clone(),
            respondent_name: dispute.respondent.name.clone(),
            resolution_method: dispute.resolution_method.clone(),
            document_type: request.document_type.clone(),
            professional_name,
            meetings_count: meetings_count as u32,
            issued_at,
            documents_submitted,
            applicant_advocate: applicant_advocate_name.clone().map(|name| Advocate {
                name,
                phone: applicant_advocate_phone.clone().unwrap_or_default(),
            }),
            respondent_advocate: respondent_advocate_name.clone().map(|name| Advocate {
                name,
                phone: respondent_advocate_phone.clone().unwrap_or_default(),
            }),
            resolution_summary: request.summary.clone(),
            outcomes: request.outcome.clone(),
            terms_and_conditions: request.terms.clone(),
        };

        // The layout engine is total over the typed aggregate, so rendering
        // cannot fail once the preconditions above have passed.
        let bytes = pdf::generate_award_pdf(&award);

        let storage_key = format!(
            "{}/award-{}.pdf",
            dispute.id,
            issued_at.timestamp_millis()
        );
        flow.fatal("upload-document", self.objects.put(&storage_key, bytes))
            .await?;

        let write = FinalDocumentWrite {
            document_type: request.document_type.clone(),
            final_document: FinalDocument {
                document_type: request.document_type.clone(),
                summary: request.summary.clone(),
                outcome: request.outcome.clone(),
                terms: request.terms.clone(),
                remarks: request.remarks.clone(),
                issued_at,
            },
            award_object_key: storage_key.clone(),
            applicant_advocate_name,
            applicant_advocate_phone,
            respondent_advocate_name,
            respondent_advocate_phone,
            status: request.document_type.issued_status(),
        };
        let updated = flow
            .fatal("update-case", self.cases.set_final_document(case_id, write))
            .await?;

        flow.best_effort(
            "record-notification",
            self.notifications.record(
                dispute.user_id,
                dispute.id,
                NotificationKind::DocumentIssued,
                "Final Document Issued",
                &format!(
                    "{} has been issued for case {}",
                    request.document_type.display_name(),
                    dispute.case_code
                ),
            ),
        )
        .await;

        let (subject, body) = award_email(&dispute);
        send_to_parties(
            self.email.as_ref(),
            &mut flow,
            &dispute.applicant.email,
            &dispute.respondent.email,
            &subject,
            &body,
        )
        .await;

        info!(
            case_id = %dispute.id,
            case_code = %dispute.case_code,
            document_type = %request.document_type,
            storage_key = %storage_key,
            "final document issued"
        );
        Ok(IssuanceOutcome {
            case_id: dispute.id,
            case_code: dispute.case_code,
            status: updated.status,
            storage_key,
            issued_at,
            soft_failures: flow.into_soft_failures(),
        })
    }
}

/// Empty strings from the form are treated as absent, each field on its own.
fn clean(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn validate_issue_request(request: &IssueDocumentRequest) -> Result<(), IssuanceError> {
    let required = [
        ("summary", &request.summary),
        ("outcome", &request.outcome),
        ("terms", &request.terms),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(IssuanceError::Validation(format!("{} is required", field)));
        }
    }
    Ok(())
}

fn award_email(dispute: &Dispute) -> (String, String) {
    let subject = format!(
        "eNyaya Resolve - Award Copy Finalized for Case {}",
        dispute.case_code
    );
    let body = format!(
        "<p>Dear Participant,</p>\
         <p>The award copy for your dispute resolution case has been finalized.</p>\
         <p>Case ID: {}<br>Resolution Method: {}<br>Applicant: {}<br>Respondent: {}</p>\
         <p>The final award document is now available in your dashboard.</p>\
         <p>This email is generated from eNyaya Resolve</p>",
        dispute.case_code,
        dispute.resolution_method.label(),
        dispute.applicant.name,
        dispute.respondent.name,
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use db::{
        memory::MemoryDb,
        models::{
            dispute::{Applicant, ContractType, CreateDispute, ResolutionMethod, Respondent},
            document::{CreateSubmittedDocument, SubmittedDocument},
            professional::{CreateProfessional, Professional, ProfessionalKind},
        },
        store::NotificationStore,
    };

    use super::*;
    use crate::services::{email::MockEmailSender, storage::MemoryObjectStore};

    struct FailingObjectStore;

    #[async_trait]
    impl ObjectStore for FailingObjectStore {
        async fn put(&self, _key: &str, _bytes: Vec<u8>) -> Result<(), StorageError> {
            Err(StorageError::Backend("storage offline".to_string()))
        }

        async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
            Err(StorageError::NotFound(key.to_string()))
        }

        async fn signed_url(&self, key: &str, _ttl_secs: u64) -> Result<String, StorageError> {
            Err(StorageError::NotFound(key.to_string()))
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    async fn assigned_case(db: &Arc<MemoryDb>) -> (Dispute, Professional) {
        let professional = Professional::new(CreateProfessional {
            name: "Dr. Meera Iyer".to_string(),
            kind: ProfessionalKind::Arbitrator,
            email: "meera@example.com".to_string(),
            phone: "9000000000".to_string(),
            specialization: "Financial disputes".to_string(),
            experience_years: 12,
        });
        ProfessionalStore::insert(db.as_ref(), professional.clone())
            .await
            .unwrap();

        let dispute = Dispute::new(
            CreateDispute {
                user_id: Uuid::new_v4(),
                applicant: Applicant {
                    name: "Asha Verma".to_string(),
                    phone: "9876543210".to_string(),
                    email: "asha@example.com".to_string(),
                    address: "12 MG Road, Pune".to_string(),
                    annual_income: 450_000,
                },
                respondent: Respondent {
                    name: "Rohan Mehta".to_string(),
                    phone: "9123456780".to_string(),
                    email: "rohan@example.com".to_string(),
                    address: "4 Park Street, Mumbai".to_string(),
                },
                contract_type: ContractType::LoanAgreement,
                resolution_method: ResolutionMethod::Arbitration,
                description: "Unpaid loan installments since January".to_string(),
            },
            "ODR/2025/112233".to_string(),
            true,
        );
        CaseStore::insert(db.as_ref(), dispute.clone()).await.unwrap();
        let dispute = db
            .set_assignment(
                dispute.id,
                professional.id,
                &professional.name,
                DisputeStatus::ProfessionalAssigned,
            )
            .await
            .unwrap();
        (dispute, professional)
    }

    fn service(
        db: &Arc<MemoryDb>,
        objects: Arc<dyn ObjectStore>,
        email: Arc<MockEmailSender>,
    ) -> IssuanceService {
        IssuanceService::new(
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            objects,
            NotificationService::new(db.clone()),
            email,
        )
    }

    fn award_request() -> IssueDocumentRequest {
        IssueDocumentRequest {
            document_type: DocumentType::ArbitrationAward,
            summary: "Both parties presented their accounts over three sittings.".to_string(),
            outcome: "The respondent shall repay the outstanding amount.".to_string(),
            terms: "Payment within 30 days of issuance.".to_string(),
            remarks: "None".to_string(),
            applicant_advocate_name: None,
            applicant_advocate_phone: None,
            respondent_advocate_name: Some("Adv. Kavita Rao".to_string()),
            respondent_advocate_phone: Some("9988776655".to_string()),
        }
    }

    #[tokio::test]
    async fn issue_renders_uploads_and_updates_the_case() {
        let db = Arc::new(MemoryDb::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let email = Arc::new(MockEmailSender::new());
        let issuance = service(&db, objects.clone(), email.clone());
        let (dispute, _) = assigned_case(&db).await;
        DocumentStore::insert(
            db.as_ref(),
            SubmittedDocument::new(CreateSubmittedDocument {
                dispute_id: dispute.id,
                document_name: "Loan Agreement.pdf".to_string(),
                submitted_by: "Applicant".to_string(),
                description: Some("Signed agreement with repayment schedule".to_string()),
            }),
        )
        .await
        .unwrap();

        let outcome = issuance.issue(dispute.id, award_request()).await.unwrap();

        assert!(outcome.soft_failures.is_empty());
        assert_eq!(outcome.status, DisputeStatus::ArbitrationAwardIssued);
        assert!(outcome.storage_key.starts_with(&format!("{}/award-", dispute.id)));
        assert!(outcome.storage_key.ends_with(".pdf"));

        let bytes = objects.get(&outcome.storage_key).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(find(&bytes, b"ARBITRATION AWARD"));
        assert!(find(&bytes, b"Dr. Meera Iyer"));

        let updated = CaseStore::get(db.as_ref(), dispute.id).await.unwrap().unwrap();
        assert_eq!(updated.status, DisputeStatus::ArbitrationAwardIssued);
        assert_eq!(updated.document_type, Some(DocumentType::ArbitrationAward));
        assert_eq!(updated.award_object_key.as_deref(), Some(outcome.storage_key.as_str()));
        let record = updated.final_document.unwrap();
        assert_eq!(record.issued_at, outcome.issued_at);
        assert_eq!(record.remarks, "None");
        // Advocate columns are written independently, absent sides as null.
        assert!(updated.applicant_advocate_name.is_none());
        assert!(updated.applicant_advocate_phone.is_none());
        assert_eq!(updated.respondent_advocate_name.as_deref(), Some("Adv. Kavita Rao"));
        assert_eq!(updated.respondent_advocate_phone.as_deref(), Some("9988776655"));

        let feed = NotificationStore::list_for_user(db.as_ref(), dispute.user_id)
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, NotificationKind::DocumentIssued);
        assert_eq!(
            feed[0].message,
            format!("Arbitration Award has been issued for case {}", dispute.case_code)
        );

        let sent = email.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[0].subject.contains("Award Copy Finalized"));
    }

    #[tokio::test]
    async fn reissuance_keeps_both_objects_and_points_at_the_second() {
        let db = Arc::new(MemoryDb::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let email = Arc::new(MockEmailSender::new());
        let issuance = service(&db, objects.clone(), email.clone());
        let (dispute, _) = assigned_case(&db).await;

        let first = issuance.issue(dispute.id, award_request()).await.unwrap();
        // Keys are millisecond-stamped; give the clock a tick.
        tokio::time::sleep(Duration::from_millis(5)).await;
        let mut second_request = award_request();
        second_request.document_type = DocumentType::MediationReport;
        second_request.summary = "Revised summary after review.".to_string();
        let second = issuance.issue(dispute.id, second_request).await.unwrap();

        assert_ne!(first.storage_key, second.storage_key);
        assert_eq!(objects.object_count().await, 2);

        let updated = CaseStore::get(db.as_ref(), dispute.id).await.unwrap().unwrap();
        assert_eq!(updated.award_object_key.as_deref(), Some(second.storage_key.as_str()));
        assert_eq!(updated.status, DisputeStatus::MediationReportIssued);
        assert_eq!(updated.final_document.unwrap().summary, "Revised summary after review.");
    }

    #[tokio::test]
    async fn upload_failure_aborts_without_touching_the_case() {
        let db = Arc::new(MemoryDb::new());
        let email = Arc::new(MockEmailSender::new());
        let issuance = service(&db, Arc::new(FailingObjectStore), email.clone());
        let (dispute, _) = assigned_case(&db).await;

        let err = issuance.issue(dispute.id, award_request()).await.unwrap_err();
        assert!(matches!(err, IssuanceError::Storage(StorageError::Backend(_))));

        let unchanged = CaseStore::get(db.as_ref(), dispute.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, DisputeStatus::ProfessionalAssigned);
        assert!(unchanged.final_document.is_none());
        assert!(unchanged.award_object_key.is_none());
        assert!(unchanged.document_type.is_none());

        let feed = NotificationStore::list_for_user(db.as_ref(), dispute.user_id)
            .await
            .unwrap();
        assert!(feed.is_empty());
        assert!(email.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn unassigned_cases_cannot_issue() {
        let db = Arc::new(MemoryDb::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let email = Arc::new(MockEmailSender::new());
        let issuance = service(&db, objects.clone(), email);

        let dispute = Dispute::new(
            CreateDispute {
                user_id: Uuid::new_v4(),
                applicant: Applicant {
                    name: "Asha Verma".to_string(),
                    phone: "9876543210".to_string(),
                    email: "asha@example.com".to_string(),
                    address: "12 MG Road, Pune".to_string(),
                    annual_income: 450_000,
                },
                respondent: Respondent {
                    name: "Rohan Mehta".to_string(),
                    phone: "9123456780".to_string(),
                    email: "rohan@example.com".to_string(),
                    address: "4 Park Street, Mumbai".to_string(),
                },
                contract_type: ContractType::Other,
                resolution_method: ResolutionMethod::Mediation,
                description: "No professional assigned yet".to_string(),
            },
            "ODR/2025/445566".to_string(),
            false,
        );
        CaseStore::insert(db.as_ref(), dispute.clone()).await.unwrap();

        let err = issuance.issue(dispute.id, award_request()).await.unwrap_err();
        assert!(matches!(err, IssuanceError::NoProfessionalAssigned(_)));
        assert_eq!(objects.object_count().await, 0);
    }

    #[tokio::test]
    async fn blank_required_text_is_rejected_before_any_side_effect() {
        let db = Arc::new(MemoryDb::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let email = Arc::new(MockEmailSender::new());
        let issuance = service(&db, objects.clone(), email);
        let (dispute, _) = assigned_case(&db).await;

        let mut request = award_request();
        request.terms = "   ".to_string();
        let err = issuance.issue(dispute.id, request).await.unwrap_err();
        assert!(matches!(err, IssuanceError::Validation(_)));
        assert_eq!(objects.object_count().await, 0);
    }

    #[tokio::test]
    async fn missing_professional_record_falls_back_to_placeholder() {
        let db = Arc::new(MemoryDb::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let email = Arc::new(MockEmailSender::new());
        let issuance = service(&db, objects.clone(), email);
        let (dispute, _) = assigned_case(&db).await;
        // Point the case at a professional id with no roster record.
        let dispute = db
            .set_assignment(
                dispute.id,
                Uuid::new_v4(),
                "stale name",
                DisputeStatus::ProfessionalAssigned,
            )
            .await
            .unwrap();

        let outcome = issuance.issue(dispute.id, award_request()).await.unwrap();
        assert_eq!(outcome.status, DisputeStatus::ArbitrationAwardIssued);
        let steps: Vec<&str> = outcome.soft_failures.iter().map(|f| f.step.as_str()).collect();
        assert_eq!(steps, vec!["professional-name"]);

        let bytes = objects.get(&outcome.storage_key).await.unwrap();
        assert!(find(&bytes, b"Unknown Professional"));
    }

    #[tokio::test]
    async fn email_outage_never_fails_the_issuance() {
        let db = Arc::new(MemoryDb::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let email = Arc::new(MockEmailSender::new());
        email.fail_sends();
        let issuance = service(&db, objects.clone(), email);
        let (dispute, _) = assigned_case(&db).await;

        let outcome = issuance.issue(dispute.id, award_request()).await.unwrap();
        assert_eq!(outcome.status, DisputeStatus::ArbitrationAwardIssued);
        let steps: Vec<&str> = outcome.soft_failures.iter().map(|f| f.step.as_str()).collect();
        assert_eq!(steps, vec!["email-applicant", "email-respondent"]);
    }
}
