use std::{fmt::Write, sync::Arc};

use chrono::{DateTime, SecondsFormat, Utc};
use owl_core_lead_contracts::{LeadFeatureService, LeadSubmitError};
use owl_di::Build;
use owl_email_contracts::{Email, EmailSendError, EmailService};
use owl_models::{email_address::EmailAddress, lead::LeadSubmission};
use owl_shared_contracts::time::TimeService;
use tracing::{info, warn};

const MISSING: &str = "-";

#[derive(Debug, Clone, Build)]
pub struct LeadFeatureServiceImpl<Time, Email> {
    time: Time,
    email: Email,
    config: LeadFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct LeadFeatureConfig {
    /// Inbox that receives every lead.
    pub recipient: Arc<EmailAddress>,
}

impl<Time, EmailS> LeadFeatureService for LeadFeatureServiceImpl<Time, EmailS>
where
    Time: TimeService,
    EmailS: EmailService,
{
    async fn submit(&self, lead: LeadSubmission) -> Result<(), LeadSubmitError> {
        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!(
                "Nuevo lead OWL LATAM: {} {} - {}",
                *lead.first_name, *lead.last_name, *lead.company
            ),
            body: render_body(&lead, self.time.now()),
            reply_to: Some(lead.corporate_email),
        };

        match self.email.send(email).await {
            Ok(()) => {
                info!(company = %*lead.company, "lead forwarded");
                Ok(())
            }
            Err(EmailSendError::NotConfigured) => {
                warn!("cannot forward lead, SMTP is not configured");
                Err(LeadSubmitError::NotConfigured)
            }
            Err(EmailSendError::Other(err)) => Err(LeadSubmitError::Send(err)),
        }
    }
}

fn render_body(lead: &LeadSubmission, now: DateTime<Utc>) -> String {
    let mut body = String::from("Nuevo registro desde formulario OWL LATAM\n\n");

    for (label, value) in [
        ("Nombre", lead.first_name.as_str()),
        ("Apellido", lead.last_name.as_str()),
        ("Empresa", lead.company.as_str()),
        (
            "Pagina web",
            lead.website.as_deref().map_or(MISSING, String::as_str),
        ),
        ("Correo corporativo", lead.corporate_email.as_str()),
        ("Telefono", lead.phone.as_str()),
        ("WhatsApp", lead.whatsapp.as_str()),
    ] {
        // writing into a String cannot fail
        let _ = writeln!(body, "{label}: {value}");
    }

    let _ = writeln!(
        body,
        "Fecha UTC: {}",
        now.to_rfc3339_opts(SecondsFormat::Micros, false)
    );

    body
}
