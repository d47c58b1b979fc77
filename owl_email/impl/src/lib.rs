use std::time::Duration;

use anyhow::Context;
use lettre::{
    message::{header, Mailbox, MessageBuilder},
    Message,
};
use owl_di::Build;
use owl_email_contracts::{Email, EmailSendError, EmailService};
use owl_models::Sensitive;
use owl_utils::{trace_instrument, Apply};
use tracing::warn;

pub use security::SmtpSecurity;
pub use transport::{LettreSmtpTransport, SmtpConnection, SmtpTransportService};

mod security;
mod transport;

#[derive(Debug, Clone, Build)]
pub struct EmailServiceImpl<Transport> {
    transport: Transport,
    config: EmailServiceConfig,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Sensitive<String>,
    /// Address used in the `From` header.
    pub from: String,
    pub starttls: bool,
    pub timeout: Duration,
}

impl EmailServiceConfig {
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }

    pub fn security(&self) -> SmtpSecurity {
        SmtpSecurity::select(self.port, self.starttls)
    }
}

impl<Transport> EmailServiceImpl<Transport> {
    pub fn new(transport: Transport, config: EmailServiceConfig) -> Self {
        Self { transport, config }
    }
}

impl<Transport> EmailService for EmailServiceImpl<Transport>
where
    Transport: SmtpTransportService,
{
    #[trace_instrument(skip(self))]
    async fn send(&self, email: Email) -> Result<(), EmailSendError> {
        if !self.config.is_configured() {
            return Err(EmailSendError::NotConfigured);
        }

        let message = self.build_message(email)?;

        let connection = SmtpConnection {
            host: self.config.host.clone(),
            port: self.config.port,
            security: self.config.security(),
            username: self.config.username.clone(),
            password: self.config.password.clone(),
            timeout: self.config.timeout,
        };

        if !connection.security.is_encrypted() {
            warn!(
                host = %connection.host,
                port = connection.port,
                "sending email over an unencrypted connection"
            );
        }

        self.transport
            .send(connection, message)
            .await
            .map_err(Into::into)
    }
}

impl<Transport> EmailServiceImpl<Transport> {
    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let from = self
            .config
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid sender address {:?}", self.config.from))?;

        Message::builder()
            .from(from)
            .to(Mailbox::new(None, email.recipient.0))
            .apply_map(
                email.reply_to.map(|x| Mailbox::new(None, x.0)),
                MessageBuilder::reply_to,
            )
            .subject(email.subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(Into::into)
    }
}
