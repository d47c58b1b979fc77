use owl_config::Config;
use owl_di::Provide;
use owl_email_impl::EmailServiceConfig;
use tracing::{info, warn};

use crate::environment::{types::RestServer, Provider};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let mut provider = Provider::new(&config);

    let email_config: EmailServiceConfig = provider.provide();
    if !email_config.is_configured() {
        warn!("SMTP is not configured, lead submissions will be rejected");
    } else if !email_config.security().is_encrypted() {
        warn!(
            host = %email_config.host,
            port = email_config.port,
            "SMTP relay is used without TLS, credentials are sent in plaintext"
        );
    } else {
        info!(
            host = %email_config.host,
            port = email_config.port,
            security = ?email_config.security(),
            "Using SMTP relay"
        );
    }

    let server: RestServer = provider.provide();
    server.serve().await
}
