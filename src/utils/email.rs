//! SMTP dispatch for exchange-request emails.
//!
//! Email is a collaborator, not a core concern: every call site treats
//! sending as fire-and-forget and logs failures instead of propagating them.

use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use slateboard_core::AppError;

use crate::config::email::EmailConfig;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Tell an approver a new exchange request awaits their decision.
    #[instrument(skip(self))]
    pub async fn send_approval_request(
        &self,
        to_email: &str,
        to_name: &str,
        requester_name: &str,
        summary: &str,
    ) -> Result<(), AppError> {
        let body = format!(
            "Hi {to_name},\n\n\
             {requester_name} has submitted a lesson exchange request that needs your decision:\n\n\
             {summary}\n\n\
             Please review it in Slateboard.\n\n\
             Slateboard",
        );

        self.send_email(to_email, "Lesson exchange request awaiting approval", &body)
            .await
    }

    /// Tell the requester their request was decided.
    #[instrument(skip(self))]
    pub async fn send_decision(
        &self,
        to_email: &str,
        to_name: &str,
        decision: &str,
        summary: &str,
    ) -> Result<(), AppError> {
        let body = format!(
            "Hi {to_name},\n\n\
             Your lesson exchange request has been {decision}:\n\n\
             {summary}\n\n\
             Slateboard",
        );

        self.send_email(to_email, &format!("Exchange request {decision}"), &body)
            .await
    }

    #[instrument(skip(self, body))]
    async fn send_email(&self, to_email: &str, subject: &str, body: &str) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::debug!(to = to_email, subject, "SMTP disabled, skipping email");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from email: {e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid to email: {e}")))?)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {e}")))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {e}")))?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Task join error: {e}")))?
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {e}")))?;

        Ok(())
    }
}
