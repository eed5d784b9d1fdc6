//! Video-conference scheduling for assigned cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use db::{
    models::{
        dispute::{Dispute, DisputeStatus},
        meeting::{CreateMeeting, Meeting},
        notification::NotificationKind,
    },
    store::{CaseStore, MeetingStore, StoreError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use super::{
    email::{EmailSender, send_to_parties},
    notifications::NotificationService,
    workflow::{StepFailure, Workflow},
};

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct ScheduleMeetingRequest {
    pub meeting_date: DateTime<Utc>,
    pub meeting_link: String,
}

#[derive(Debug, Serialize, TS)]
pub struct ScheduleOutcome {
    pub dispute: Dispute,
    pub soft_failures: Vec<StepFailure>,
}

/// Schedules meetings: updates the case, appends to the meeting log and
/// notifies both parties. Only the case update is fatal; everything after
/// it is best-effort.
#[derive(Clone)]
pub struct SchedulingService {
    cases: Arc<dyn CaseStore>,
    meetings: Arc<dyn MeetingStore>,
    notifications: NotificationService,
    email: Arc<dyn EmailSender>,
}

impl SchedulingService {
    pub fn new(
        cases: Arc<dyn CaseStore>,
        meetings: Arc<dyn MeetingStore>,
        notifications: NotificationService,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            cases,
            meetings,
            notifications,
            email,
        }
    }

    pub async fn schedule(
        &self,
        case_id: Uuid,
        request: ScheduleMeetingRequest,
    ) -> Result<ScheduleOutcome, SchedulingError> {
        if request.meeting_link.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "meeting link is required".to_string(),
            ));
        }

        let mut flow = Workflow::new("schedule-meeting");

        let dispute = flow
            .fatal(
                "update-case",
                self.cases.set_meeting(
                    case_id,
                    request.meeting_date,
                    &request.meeting_link,
                    DisputeStatus::MeetingScheduled,
                ),
            )
            .await?;

        flow.best_effort(
            "record-meeting",
            self.meetings.insert(Meeting::new(CreateMeeting {
                dispute_id: case_id,
                meeting_date: request.meeting_date,
                meeting_link: request.meeting_link.clone(),
            })),
        )
        .await;

        let when = request.meeting_date.format("%d/%m/%Y %H:%M").to_string();
        flow.best_effort(
            "record-notification",
            self.notifications.record(
                dispute.user_id,
                dispute.id,
                NotificationKind::MeetingScheduled,
                "Meeting Scheduled",
                &format!(
                    "A video conference has been scheduled for case {} on {}",
                    dispute.case_code, when
                ),
            ),
        )
        .await;

        let (subject, body) = meeting_email(&dispute, &when, &request.meeting_link);
        send_to_parties(
            self.email.as_ref(),
            &mut flow,
            &dispute.applicant.email,
            &dispute.respondent.email,
            &subject,
            &body,
        )
        .await;

        info!(case_id = %dispute.id, case_code = %dispute.case_code, "meeting scheduled");
        Ok(ScheduleOutcome {
            dispute,
            soft_failures: flow.into_soft_failures(),
        })
    }
}

fn meeting_email(dispute: &Dispute, when: &str, link: &str) -> (String, String) {
    let subject = format!(
        "eNyaya Resolve - Meeting Scheduled for Case {}",
        dispute.case_code
    );
    let body = format!(
        "<p>Dear Participant,</p>\
         <p>A meeting has been scheduled for your dispute resolution case.</p>\
         <p>Case ID: {}<br>Resolution Method: {}<br>Applicant: {}<br>Respondent: {}</p>\
         <p>Scheduled Time: {}<br><a href=\"{}\">Join Meeting</a></p>\
         <p>This email is generated from eNyaya Resolve</p>",
        dispute.case_code,
        dispute.resolution_method.label(),
        dispute.applicant.name,
        dispute.respondent.name,
        when,
        link,
    );
    (subject, body)
}
