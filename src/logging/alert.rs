//! Failure alerts by e-mail
//!
//! The HTTP trigger hands each failed run to an [`Alerter`]. The SMTP
//! implementation sends one plain text message through an unauthenticated
//! relay, the way the legacy deployment did.

use crate::config::AlertingConfig;
use crate::domain::{ExporterError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::{header, Mailbox, Message};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::sync::Arc;

/// What went wrong in a failed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureAlert {
    /// Top-level error message
    pub message: String,

    /// Chain of underlying causes, if any
    pub traceback: Option<String>,

    /// When the failure was reported
    pub occurred_at: DateTime<Utc>,
}

impl FailureAlert {
    /// Build an alert from an error
    pub fn from_error(error: &ExporterError) -> Self {
        Self {
            message: error.to_string(),
            traceback: error.source_chain(),
            occurred_at: Utc::now(),
        }
    }

    /// Plain text body of the alert
    pub fn body(&self) -> String {
        let mut body = format!(
            "The SharePoint catalog export failed at {}.\n\n{}\n",
            self.occurred_at.to_rfc3339(),
            self.message
        );
        if let Some(traceback) = &self.traceback {
            body.push_str("\nCaused by:\n");
            body.push_str(traceback);
            body.push('\n');
        }
        body
    }
}

/// Delivers failure alerts
#[async_trait]
pub trait Alerter: Send + Sync {
    /// Send one alert
    ///
    /// # Errors
    ///
    /// Returns [`ExporterError::Alert`] if the message cannot be built or
    /// delivered.
    async fn send(&self, alert: &FailureAlert) -> Result<()>;
}

/// Alerter sending through an SMTP relay
pub struct SmtpAlerter {
    config: AlertingConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

fn mailbox(address: &str, role: &str) -> Result<Mailbox> {
    address.parse().map_err(|e| {
        ExporterError::Alert(format!("Invalid {role} address \"{address}\": {e}"))
    })
}

impl SmtpAlerter {
    /// Create an alerter for the configured relay
    pub fn new(config: AlertingConfig) -> Self {
        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_server_name)
                .port(config.smtp_port)
                .build();
        Self { config, transport }
    }

    /// Build the e-mail for an alert
    pub fn compose(&self, alert: &FailureAlert) -> Result<Message> {
        let mut builder = Message::builder()
            .from(mailbox(&self.config.from, "From")?)
            .subject(&self.config.subject)
            .header(header::ContentType::TEXT_PLAIN);

        for address in &self.config.to {
            builder = builder.to(mailbox(address, "To")?);
        }

        builder
            .body(alert.body())
            .map_err(|e| ExporterError::Alert(format!("Failed to build alert message: {e}")))
    }
}

#[async_trait]
impl Alerter for SmtpAlerter {
    async fn send(&self, alert: &FailureAlert) -> Result<()> {
        let message = self.compose(alert)?;
        self.transport.send(message).await.map_err(|e| {
            ExporterError::Alert(format!(
                "Failed to send alert through {}:{}: {e}",
                self.config.smtp_server_name, self.config.smtp_port
            ))
        })?;

        tracing::info!(recipients = self.config.to.len(), "Failure alert sent");
        Ok(())
    }
}

/// Build the alerter described by the configuration, if alerts are enabled
pub fn create_alerter(config: &AlertingConfig) -> Option<Arc<dyn Alerter>> {
    if config.enabled {
        Some(Arc::new(SmtpAlerter::new(config.clone())))
    } else {
        None
    }
}
