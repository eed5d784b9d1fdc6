//! Resend email client for party-facing notifications.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const FROM_ADDRESS: &str = "eNyaya Resolve <onboarding@resend.dev>";

#[derive(Debug, Clone, Error)]
pub enum EmailError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("missing api key: RESEND_API_KEY environment variable not set")]
    MissingApiKey,
}

/// Outbound mail dispatch. The issuance and scheduling flows treat every send
/// as best-effort, so implementations report failures without retrying.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), EmailError>;
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Email client backed by the hosted Resend API.
#[derive(Debug, Clone)]
pub struct ResendClient {
    http: Client,
    api_key: String,
}

impl ResendClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client using the RESEND_API_KEY environment variable.
    pub fn from_env() -> Result<Self, EmailError> {
        let api_key = std::env::var("RESEND_API_KEY").map_err(|_| EmailError::MissingApiKey)?;
        Self::new(api_key)
    }

    pub fn new(api_key: String) -> Result<Self, EmailError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("enyaya-resolve/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        Ok(Self { http, api_key })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), EmailError> {
        let request = SendEmailRequest {
            from: FROM_ADDRESS,
            to: [to],
            subject,
            html: html_body,
        };

        let res = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(EmailError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(EmailError::RateLimited),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(EmailError::Http { status, body })
            }
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> EmailError {
    if e.is_timeout() {
        EmailError::Timeout
    } else {
        EmailError::Transport(e.to_string())
    }
}

/// Send the same message to both parties of a case. The two sends run
/// concurrently and each failure is recorded on the flow independently, so
/// one bad address never blocks the other party's copy.
pub async fn send_to_parties(
    sender: &dyn EmailSender,
    flow: &mut super::workflow::Workflow,
    applicant_email: &str,
    respondent_email: &str,
    subject: &str,
    body: &str,
) {
    let (applicant, respondent) = tokio::join!(
        sender.send(applicant_email, subject, body),
        sender.send(respondent_email, subject, body),
    );
    if let Err(err) = applicant {
        flow.record_soft_failure("email-applicant", err);
    }
    if let Err(err) = respondent {
        flow.record_soft_failure("email-respondent", err);
    }
}

/// Sender used when no mail provider is configured: logs the send and drops
/// the message, so local runs behave like a successful dispatch.
pub struct NoopEmailSender;

#[async_trait]
impl EmailSender for NoopEmailSender {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<(), EmailError> {
        info!(to, subject, "email provider not configured, dropping message");
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Test sender that records successful sends and can be switched to fail.
#[cfg(test)]
#[derive(Default)]
pub struct MockEmailSender {
    pub sent: tokio::sync::Mutex<Vec<SentEmail>>,
    fail: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_sends(&self) {
        self.fail.store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), EmailError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(EmailError::Transport("mock send failure".to_string()));
        }
        self.sent.lock().await.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}
