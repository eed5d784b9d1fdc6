use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProfessionalKind {
    Arbitrator,
    Mediator,
    LegalAidAdvocate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProfessionalStatus {
    #[default]
    Active,
    Inactive,
}

/// Neutral professional (arbitrator, mediator or legal-aid advocate) on the
/// panel roster.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Professional {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: ProfessionalKind,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub experience_years: i32,
    pub status: ProfessionalStatus,
    pub cases_handled: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProfessional {
    pub name: String,
    #[serde(rename = "type")]
    #[ts(rename = "type")]
    pub kind: ProfessionalKind,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub experience_years: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateProfessional {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<i32>,
    pub status: Option<ProfessionalStatus>,
}

impl Professional {
    pub fn new(data: CreateProfessional) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            kind: data.kind,
            email: data.email,
            phone: data.phone,
            specialization: data.specialization,
            experience_years: data.experience_years,
            status: ProfessionalStatus::Active,
            cases_handled: 0,
            created_at: Utc::now(),
        }
    }
}
