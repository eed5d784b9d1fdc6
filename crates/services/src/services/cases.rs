//! Case lifecycle: registration, assignment and tracking.

use std::sync::Arc;

use chrono::Utc;
use db::{
    models::{
        dispute::{CaseUpdate, CreateDispute, Dispute, DisputeStatus},
        notification::NotificationKind,
        professional::ProfessionalStatus,
    },
    store::{CaseStore, ProfessionalStore, StoreError},
};
use thiserror::Error;
use tracing::{info, warn};
use utils::ids::generate_case_code;
use uuid::Uuid;

use super::notifications::NotificationService;

/// Annual income in rupees below which an applicant qualifies for legal aid.
pub const LEGAL_AID_INCOME_LIMIT: i64 = 500_000;

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("case not found: {0}")]
    NotFound(String),
    #[error("professional not found: {0}")]
    ProfessionalNotFound(Uuid),
    #[error("professional {0} is not active")]
    ProfessionalInactive(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registration, assignment and lookups over the case store.
#[derive(Clone)]
pub struct CaseService {
    cases: Arc<dyn CaseStore>,
    professionals: Arc<dyn ProfessionalStore>,
    notifications: NotificationService,
}

impl CaseService {
    pub fn new(
        cases: Arc<dyn CaseStore>,
        professionals: Arc<dyn ProfessionalStore>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            cases,
            professionals,
            notifications,
        }
    }

    /// File a new dispute. Assigns a public case code, derives legal-aid
    /// eligibility from the applicant's income and seeds the history timeline.
    pub async fn register(&self, data: CreateDispute) -> Result<Dispute, CaseError> {
        validate_registration(&data)?;

        let legal_aid_eligible = data.applicant.annual_income < LEGAL_AID_INCOME_LIMIT;
        let mut dispute = Dispute::new(data, generate_case_code(), legal_aid_eligible);
        dispute.updates.push(CaseUpdate {
            at: dispute.filed_at,
            title: "Case Filed".to_string(),
            description: "Your case has been registered and is pending review".to_string(),
            status: DisputeStatus::PendingReview,
        });
        self.cases.insert(dispute.clone()).await?;

        info!(
            case_id = %dispute.id,
            case_code = %dispute.case_code,
            legal_aid_eligible,
            "case registered"
        );
        Ok(dispute)
    }

    /// Assign an active professional to a case. Updates the case columns,
    /// bumps the professional's workload counter and notifies the filer.
    pub async fn assign_professional(
        &self,
        case_id: Uuid,
        professional_id: Uuid,
    ) -> Result<Dispute, CaseError> {
        let professional = self
            .professionals
            .get(professional_id)
            .await?
            .ok_or(CaseError::ProfessionalNotFound(professional_id))?;
        if professional.status != ProfessionalStatus::Active {
            return Err(CaseError::ProfessionalInactive(professional_id));
        }

        let dispute = self
            .cases
            .set_assignment(
                case_id,
                professional.id,
                &professional.name,
                DisputeStatus::ProfessionalAssigned,
            )
            .await?;
        self.professionals
            .increment_cases_handled(professional.id)
            .await?;
        self.cases
            .append_update(
                case_id,
                CaseUpdate {
                    at: Utc::now(),
                    title: "Professional Assigned".to_string(),
                    description: format!("{} will handle your case", professional.name),
                    status: DisputeStatus::ProfessionalAssigned,
                },
            )
            .await?;

        if let Err(err) = self
            .notifications
            .record(
                dispute.user_id,
                dispute.id,
                NotificationKind::ProfessionalAssigned,
                "Professional Assigned",
                &format!(
                    "{} has been assigned to your case {}",
                    professional.name, dispute.case_code
                ),
            )
            .await
        {
            warn!(case_id = %case_id, error = %err, "failed to record assignment notification");
        }

        info!(case_id = %dispute.id, professional_id = %professional.id, "professional assigned");
        Ok(dispute)
    }

    /// Find a case by internal id or public case code.
    pub async fn track(&self, reference: &str) -> Result<Dispute, CaseError> {
        self.cases
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| CaseError::NotFound(reference.to_string()))
    }

    pub async fn get(&self, id: Uuid) -> Result<Dispute, CaseError> {
        self.cases
            .get(id)
            .await?
            .ok_or_else(|| CaseError::NotFound(id.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Dispute>, CaseError> {
        Ok(self.cases.list().await?)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Dispute>, CaseError> {
        Ok(self.cases.list_for_user(user_id).await?)
    }

    pub async fn list_for_professional(
        &self,
        professional_id: Uuid,
    ) -> Result<Vec<Dispute>, CaseError> {
        Ok(self.cases.list_for_professional(professional_id).await?)
    }
}

fn validate_registration(data: &CreateDispute) -> Result<(), CaseError> {
    let required = [
        ("applicant name", &data.applicant.name),
        ("applicant phone", &data.applicant.phone),
        ("applicant email", &data.applicant.email),
        ("respondent name", &data.respondent.name),
        ("dispute description", &data.description),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(CaseError::Validation(format!("{} is required", field)));
        }
    }
    if data.applicant.annual_income < 0 {
        return Err(CaseError::Validation(
            "annual income must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use db::{
        memory::MemoryDb,
        models::{
            dispute::{Applicant, ContractType, ResolutionMethod, Respondent},
            professional::{CreateProfessional, Professional, ProfessionalKind, UpdateProfessional},
        },
        store::NotificationStore,
    };

    use super::*;

    fn sample_case(annual_income: i64) -> CreateDispute {
        CreateDispute {
            user_id: Uuid::new_v4(),
            applicant: Applicant {
                name: "Asha Verma".to_string(),
                phone: "9876543210".to_string(),
                email: "asha@example.com".to_string(),
                address: "12 MG Road, Pune".to_string(),
                annual_income,
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
        }
    }

    fn service(db: &Arc<MemoryDb>) -> CaseService {
        CaseService::new(
            db.clone(),
            db.clone(),
            NotificationService::new(db.clone()),
        )
    }

    #[tokio::test]
    async fn registration_derives_legal_aid_eligibility_from_income() {
        let db = Arc::new(MemoryDb::new());
        let cases = service(&db);

        let eligible = cases.register(sample_case(499_999)).await.unwrap();
        assert!(eligible.legal_aid_eligible);
        assert_eq!(eligible.status, DisputeStatus::PendingReview);
        assert!(eligible.case_code.starts_with("ODR/"));
        assert_eq!(eligible.updates.len(), 1);
        assert_eq!(eligible.updates[0].title, "Case Filed");

        // The threshold itself is not eligible.
        let not_eligible = cases.register(sample_case(500_000)).await.unwrap();
        assert!(!not_eligible.legal_aid_eligible);
    }

    #[tokio::test]
    async fn registration_rejects_blank_required_fields() {
        let db = Arc::new(MemoryDb::new());
        let cases = service(&db);

        let mut data = sample_case(300_000);
        data.applicant.name = "   ".to_string();
        let err = cases.register(data).await.unwrap_err();
        assert!(matches!(err, CaseError::Validation(_)));
    }

    #[tokio::test]
    async fn assignment_updates_case_counter_and_feed() {
        let db = Arc::new(MemoryDb::new());
        let cases = service(&db);

        let dispute = cases.register(sample_case(300_000)).await.unwrap();
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

        let assigned = cases
            .assign_professional(dispute.id, professional.id)
            .await
            .unwrap();
        assert_eq!(assigned.status, DisputeStatus::ProfessionalAssigned);
        assert_eq!(assigned.assigned_professional_id, Some(professional.id));
        assert_eq!(
            assigned.assigned_professional_name.as_deref(),
            Some("Dr. Meera Iyer")
        );

        let roster = ProfessionalStore::get(db.as_ref(), professional.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(roster.cases_handled, 1);

        let timeline = cases.get(dispute.id).await.unwrap().updates;
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[1].title, "Professional Assigned");
        assert_eq!(timeline[1].status, DisputeStatus::ProfessionalAssigned);

        let feed = NotificationStore::list_for_user(db.as_ref(), dispute.user_id)
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, NotificationKind::ProfessionalAssigned);
        assert!(feed[0].message.contains(&dispute.case_code));
    }

    #[tokio::test]
    async fn inactive_professionals_cannot_be_assigned() {
        let db = Arc::new(MemoryDb::new());
        let cases = service(&db);

        let dispute = cases.register(sample_case(300_000)).await.unwrap();
        let professional = Professional::new(CreateProfessional {
            name: "Adv. Kunal Shah".to_string(),
            kind: ProfessionalKind::Mediator,
            email: "kunal@example.com".to_string(),
            phone: "9000000001".to_string(),
            specialization: "Tenancy".to_string(),
            experience_years: 8,
        });
        ProfessionalStore::insert(db.as_ref(), professional.clone())
            .await
            .unwrap();
        db.update(
            professional.id,
            UpdateProfessional {
                status: Some(ProfessionalStatus::Inactive),
                ..UpdateProfessional::default()
            },
        )
        .await
        .unwrap();

        let err = cases
            .assign_professional(dispute.id, professional.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CaseError::ProfessionalInactive(_)));

        let unchanged = cases.get(dispute.id).await.unwrap();
        assert_eq!(unchanged.status, DisputeStatus::PendingReview);
    }

    #[tokio::test]
    async fn track_resolves_case_codes_and_ids() {
        let db = Arc::new(MemoryDb::new());
        let cases = service(&db);

        let dispute = cases.register(sample_case(300_000)).await.unwrap();
        let by_code = cases.track(&dispute.case_code).await.unwrap();
        assert_eq!(by_code.id, dispute.id);

        let by_id = cases.track(&dispute.id.to_string()).await.unwrap();
        assert_eq!(by_id.case_code, dispute.case_code);

        let err = cases.track("ODR/2020/000001").await.unwrap_err();
        assert!(matches!(err, CaseError::NotFound(_)));
    }
}
