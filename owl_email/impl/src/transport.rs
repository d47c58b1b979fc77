use std::{future::Future, time::Duration};

use anyhow::Context;
use lettre::{
    transport::smtp::{
        authentication::Credentials,
        client::{Certificate, Tls, TlsParameters},
        AsyncSmtpTransportBuilder,
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use owl_di::{Build, Provider};
use owl_models::Sensitive;
use owl_utils::{trace_instrument, Apply};
use tracing::debug;

use crate::security::SmtpSecurity;

/// Performs the network exchange with the relay: connect, secure the
/// connection, authenticate and transmit.
#[cfg_attr(test, mockall::automock)]
pub trait SmtpTransportService: Send + Sync + 'static {
    fn send(
        &self,
        connection: SmtpConnection,
        message: Message,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConnection {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub username: String,
    pub password: Sensitive<String>,
    pub timeout: Duration,
}

/// Opens a fresh connection per message using lettre's async SMTP client.
#[derive(Debug, Clone, Default)]
pub struct LettreSmtpTransport {
    /// PEM encoded certificates trusted in addition to the built-in roots.
    root_certificates: Vec<String>,
}

impl LettreSmtpTransport {
    pub fn with_root_certificate(mut self, pem: impl Into<String>) -> Self {
        self.root_certificates.push(pem.into());
        self
    }

    fn tls_parameters(&self, host: &str) -> anyhow::Result<TlsParameters> {
        self.root_certificates
            .iter()
            .try_fold(TlsParameters::builder(host.into()), |builder, pem| {
                let certificate = Certificate::from_pem(pem.as_bytes())
                    .context("Invalid root certificate")?;
                anyhow::Ok(builder.add_root_certificate(certificate))
            })?
            .build()
            .map_err(Into::into)
    }
}

impl<P: Provider> Build<P> for LettreSmtpTransport {
    fn build(_provider: &mut P) -> Self {
        Self::default()
    }
}

impl SmtpTransportService for LettreSmtpTransport {
    #[trace_instrument(skip(self, message))]
    async fn send(&self, connection: SmtpConnection, message: Message) -> anyhow::Result<()> {
        let tls = match connection.security {
            SmtpSecurity::ImplicitTls => Some(Tls::Wrapper(self.tls_parameters(&connection.host)?)),
            SmtpSecurity::StartTls => Some(Tls::Required(self.tls_parameters(&connection.host)?)),
            SmtpSecurity::Plain => None,
        };

        // `builder_dangerous` starts without TLS; the match above decides the mode.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&connection.host)
            .port(connection.port)
            .timeout(Some(connection.timeout))
            .credentials(Credentials::new(connection.username, connection.password.0))
            .apply_map(tls, AsyncSmtpTransportBuilder::tls)
            .build();

        let response = transport.send(message).await?;
        debug!(code = %response.code(), "relay accepted message");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tls_parameters() {
        let sut = LettreSmtpTransport::default();

        let result = sut.tls_parameters("smtp.example.com").unwrap();

        assert_eq!(result.domain(), "smtp.example.com");
    }
}
