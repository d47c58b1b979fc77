use clap::Subcommand;
use owl_config::Config;
use owl_di::Provide;
use owl_email_contracts::{Email, EmailService};
use owl_models::email_address::EmailAddress;

use crate::environment::{types, Provider};

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddress },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddress) -> anyhow::Result<()> {
    let email_service: types::Email = Provider::new(&config).provide();

    email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            reply_to: None,
        })
        .await?;

    println!("Test email sent");

    Ok(())
}
