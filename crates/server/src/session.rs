//! Caller identity and role gating.
//!
//! Upstream authentication is out of scope; the session is taken from the
//! `x-user-id` and `x-user-role` headers a fronting proxy is expected to
//! set. Access decisions themselves are pure functions over the session so
//! they can be tested without a running server.

use axum::{extract::FromRequestParts, http::request::Parts};
use db::models::dispute::Dispute;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Citizen,
    Admin,
    Professional,
}

/// Handler groups a role can be granted access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    /// Filing new disputes and listing one's own.
    OwnCases,
    /// The full case list and professional assignment.
    CaseDirectory,
    /// A professional's assigned cases, scheduling and issuance.
    Caseload,
    /// Professional roster management.
    Roster,
    /// The caller's notification feed.
    Notifications,
}

/// Who is making the request. Built once per request and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl SessionContext {
    pub fn require(&self, resource: Resource) -> Result<(), ApiError> {
        if can_access(self.role, resource) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "{} sessions cannot access {}",
                self.role, resource
            )))
        }
    }
}

pub fn can_access(role: Role, resource: Resource) -> bool {
    match (role, resource) {
        (_, Resource::Notifications) => true,
        (Role::Citizen, Resource::OwnCases) => true,
        (Role::Admin, Resource::CaseDirectory | Resource::Roster) => true,
        (Role::Professional, Resource::Caseload) => true,
        _ => false,
    }
}

/// Case detail visibility: the filer, the assigned professional and admins.
pub fn can_view_case(session: &SessionContext, dispute: &Dispute) -> bool {
    match session.role {
        Role::Admin => true,
        Role::Citizen => dispute.user_id == session.user_id,
        Role::Professional => dispute.assigned_professional_id == Some(session.user_id),
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, "x-user-id")?
            .parse::<Uuid>()
            .map_err(|_| ApiError::Unauthorized("x-user-id is not a valid uuid".to_string()))?;
        let role = header_value(parts, "x-user-role")?
            .parse::<Role>()
            .map_err(|_| ApiError::Unauthorized("x-user-role is not a known role".to_string()))?;
        Ok(Self { user_id, role })
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {} header", name)))
}
