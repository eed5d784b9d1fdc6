use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle of a dispute. Display strings are the wire tokens shown to
/// parties, so they are spelled out rather than derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
pub enum DisputeStatus {
    #[default]
    #[serde(rename = "Pending Review")]
    #[strum(serialize = "Pending Review")]
    PendingReview,
    #[serde(rename = "Professional Assigned")]
    #[strum(serialize = "Professional Assigned")]
    ProfessionalAssigned,
    #[serde(rename = "Meeting Scheduled")]
    #[strum(serialize = "Meeting Scheduled")]
    MeetingScheduled,
    #[serde(rename = "Arbitration Award Issued")]
    #[strum(serialize = "Arbitration Award Issued")]
    ArbitrationAwardIssued,
    #[serde(rename = "Mediation Report Issued")]
    #[strum(serialize = "Mediation Report Issued")]
    MediationReportIssued,
    #[serde(rename = "Closed")]
    #[strum(serialize = "Closed")]
    Closed,
}

/// Resolution track the applicant chose at filing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResolutionMethod {
    Arbitration,
    Mediation,
    Negotiation,
    Conciliation,
    LegalAid,
}

impl ResolutionMethod {
    /// Human-readable label printed on issued documents.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionMethod::Arbitration => "Arbitration",
            ResolutionMethod::Mediation => "Mediation",
            ResolutionMethod::Negotiation => "Negotiation",
            ResolutionMethod::Conciliation => "Conciliation",
            ResolutionMethod::LegalAid => "Legal Aid",
        }
    }
}

/// Kind of final document a professional can issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentType {
    ArbitrationAward,
    MediationReport,
}

impl DocumentType {
    /// Upper-case heading printed at the top of the rendered document.
    pub fn heading(&self) -> &'static str {
        match self {
            DocumentType::ArbitrationAward => "ARBITRATION AWARD",
            DocumentType::MediationReport => "MEDIATION REPORT",
        }
    }

    /// Human-readable name used in notifications and emails.
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::ArbitrationAward => "Arbitration Award",
            DocumentType::MediationReport => "Mediation Report",
        }
    }

    /// Case status entered once a document of this type is issued.
    pub fn issued_status(&self) -> DisputeStatus {
        match self {
            DocumentType::ArbitrationAward => DisputeStatus::ArbitrationAwardIssued,
            DocumentType::MediationReport => DisputeStatus::MediationReportIssued,
        }
    }
}

/// Contract category under dispute. Display strings match the filing form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
pub enum ContractType {
    #[serde(rename = "Loan Agreement")]
    #[strum(serialize = "Loan Agreement")]
    LoanAgreement,
    #[serde(rename = "Lease/Rental Agreement")]
    #[strum(serialize = "Lease/Rental Agreement")]
    LeaseRentalAgreement,
    #[serde(rename = "Employment Contract")]
    #[strum(serialize = "Employment Contract")]
    EmploymentContract,
    #[serde(rename = "Purchase Agreement")]
    #[strum(serialize = "Purchase Agreement")]
    PurchaseAgreement,
    #[serde(rename = "Service Contract")]
    #[strum(serialize = "Service Contract")]
    ServiceContract,
    #[serde(rename = "Insurance Policy")]
    #[strum(serialize = "Insurance Policy")]
    InsurancePolicy,
    #[serde(rename = "Other")]
    #[strum(serialize = "Other")]
    Other,
}

/// Contact details of the party that filed the dispute.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Applicant {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Annual income in rupees, used for the legal-aid eligibility check.
    pub annual_income: i64,
}

/// Contact details of the opposing party.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Respondent {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Advocate details supplied at issuance time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Advocate {
    pub name: String,
    pub phone: String,
}

/// Structured summary of the issued final document, kept on the case
/// alongside the pointer to the rendered PDF.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct FinalDocument {
    pub document_type: DocumentType,
    pub summary: String,
    pub outcome: String,
    pub terms: String,
    pub remarks: String,
    pub issued_at: DateTime<Utc>,
}

/// One entry in a case's public history timeline.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CaseUpdate {
    pub at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub status: DisputeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Dispute {
    pub id: Uuid,
    /// Public case code of the form `ODR/{year}/{serial}`.
    pub case_code: String,
    /// Citizen account that filed the dispute.
    pub user_id: Uuid,
    pub applicant: Applicant,
    pub respondent: Respondent,
    pub contract_type: ContractType,
    pub resolution_method: ResolutionMethod,
    pub description: String,
    pub status: DisputeStatus,
    pub legal_aid_eligible: bool,
    pub assigned_professional_id: Option<Uuid>,
    /// Denormalized display name of the assigned professional.
    pub assigned_professional_name: Option<String>,
    pub meeting_date: Option<DateTime<Utc>>,
    pub meeting_link: Option<String>,
    pub document_type: Option<DocumentType>,
    pub final_document: Option<FinalDocument>,
    /// Object-store key of the most recently issued document.
    pub award_object_key: Option<String>,
    pub applicant_advocate_name: Option<String>,
    pub applicant_advocate_phone: Option<String>,
    pub respondent_advocate_name: Option<String>,
    pub respondent_advocate_phone: Option<String>,
    pub filed_at: DateTime<Utc>,
    pub updates: Vec<CaseUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateDispute {
    pub user_id: Uuid,
    pub applicant: Applicant,
    pub respondent: Respondent,
    pub contract_type: ContractType,
    pub resolution_method: ResolutionMethod,
    pub description: String,
}

impl Dispute {
    pub fn new(data: CreateDispute, case_code: String, legal_aid_eligible: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            case_code,
            user_id: data.user_id,
            applicant: data.applicant,
            respondent: data.respondent,
            contract_type: data.contract_type,
            resolution_method: data.resolution_method,
            description: data.description,
            status: DisputeStatus::PendingReview,
            legal_aid_eligible,
            assigned_professional_id: None,
            assigned_professional_name: None,
            meeting_date: None,
            meeting_link: None,
            document_type: None,
            final_document: None,
            award_object_key: None,
            applicant_advocate_name: None,
            applicant_advocate_phone: None,
            respondent_advocate_name: None,
            respondent_advocate_phone: None,
            filed_at: Utc::now(),
            updates: Vec::new(),
        }
    }
}

/// Columns written when a final document is issued. All advocate fields are
/// written on every issuance, absent ones as null.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct FinalDocumentWrite {
    pub document_type: DocumentType,
    pub final_document: FinalDocument,
    pub award_object_key: String,
    pub applicant_advocate_name: Option<String>,
    pub applicant_advocate_phone: Option<String>,
    pub respondent_advocate_name: Option<String>,
    pub respondent_advocate_phone: Option<String>,
    pub status: DisputeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_tokens() {
        assert_eq!(DisputeStatus::PendingReview.to_string(), "Pending Review");
        assert_eq!(
            DisputeStatus::ArbitrationAwardIssued.to_string(),
            "Arbitration Award Issued"
        );
        let json = serde_json::to_string(&DisputeStatus::MeetingScheduled).unwrap();
        assert_eq!(json, "\"Meeting Scheduled\"");
    }

    #[test]
    fn status_round_trips_from_wire_token() {
        let parsed: DisputeStatus = "Mediation Report Issued".parse().unwrap();
        assert_eq!(parsed, DisputeStatus::MediationReportIssued);
    }

    #[test]
    fn document_type_wire_tokens() {
        assert_eq!(
            serde_json::to_string(&DocumentType::ArbitrationAward).unwrap(),
            "\"arbitration_award\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentType::MediationReport).unwrap(),
            "\"mediation_report\""
        );
    }

    #[test]
    fn document_type_mappings() {
        assert_eq!(DocumentType::ArbitrationAward.heading(), "ARBITRATION AWARD");
        assert_eq!(DocumentType::MediationReport.heading(), "MEDIATION REPORT");
        assert_eq!(
            DocumentType::ArbitrationAward.issued_status(),
            DisputeStatus::ArbitrationAwardIssued
        );
        assert_eq!(
            DocumentType::MediationReport.issued_status(),
            DisputeStatus::MediationReportIssued
        );
        assert_eq!(DocumentType::MediationReport.display_name(), "Mediation Report");
    }

    #[test]
    fn resolution_method_wire_tokens() {
        assert_eq!(ResolutionMethod::LegalAid.to_string(), "legal_aid");
        assert_eq!(
            serde_json::to_string(&ResolutionMethod::Arbitration).unwrap(),
            "\"arbitration\""
        );
    }
}
