use chrono::{DateTime, Utc};
use db::models::{
    dispute::{Advocate, DocumentType, ResolutionMethod},
    document::SubmittedDocument,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Everything the layout engine needs to render one issued document.
///
/// The aggregate is fully typed, so any value of this struct renders; input
/// validation (non-empty summary and so on) happens in the issuance workflow
/// before the aggregate is built.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct AwardDocument {
    pub case_code: String,
    pub applicant_name: String,
    pub respondent_name: String,
    pub resolution_method: ResolutionMethod,
    pub document_type: DocumentType,
    /// Assigned professional; printed in the role section and as signer.
    pub professional_name: String,
    pub meetings_count: u32,
    /// Single issuance timestamp, printed as both the final-hearing date and
    /// the signature date.
    pub issued_at: DateTime<Utc>,
    pub documents_submitted: Vec<DocumentEntry>,
    pub applicant_advocate: Option<Advocate>,
    pub respondent_advocate: Option<Advocate>,
    pub resolution_summary: String,
    pub outcomes: String,
    pub terms_and_conditions: String,
}

/// Descriptor of one evidence document listed on the award.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DocumentEntry {
    pub document_name: String,
    pub submitted_by: String,
    pub description: Option<String>,
}

impl From<SubmittedDocument> for DocumentEntry {
    fn from(document: SubmittedDocument) -> Self {
        Self {
            document_name: document.document_name,
            submitted_by: document.submitted_by,
            description: document.description,
        }
    }
}
