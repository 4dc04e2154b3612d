//! Email service for operation notifications.
//!
//! Uses `lettre` for SMTP transport.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending notifications.
#[derive(Debug, Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port);

        if self.config.smtp_username.is_empty() {
            return Ok(transport.build());
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );
        Ok(transport.credentials(creds).build())
    }

    /// Builds the notification sent to management when a subscription is paid.
    #[must_use]
    pub fn subscription_notification(
        member_login: &str,
        member_name: &str,
        amount: &str,
        payment_mode: &str,
    ) -> (String, String) {
        let subject = format!("Cotisation enregistrée - {member_login}");
        let body = format!(
            r"Bonjour,

Une cotisation vient d'être enregistrée dans un bureau de change.

Adhérent : {member_login} - {member_name}
Montant : {amount}
Mode de paiement : {payment_mode}

Euskal Moneta"
        );
        (subject, body)
    }

    /// Sends a notification to the management inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn notify_management(&self, subject: &str, body: &str) -> Result<(), EmailError> {
        let to = self.config.notification_email.clone();
        self.send_email(&to, subject, body).await
    }

    /// Sends a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let email = self.build_message(to_email, subject, body)?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }

    fn build_message(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }
}
