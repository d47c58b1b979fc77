use std::sync::Arc;

use owl_api_rest::RestServerConfig;
use owl_config::Config;
use owl_core_lead_impl::LeadFeatureConfig;
use owl_di::provider;
use owl_email_impl::EmailServiceConfig;

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        // API
        rest_server_config: RestServerConfig,

        // Email
        email_service_config: EmailServiceConfig,

        // Core
        lead_feature_config: LeadFeatureConfig,
    }
}

impl Provider {
    pub fn new(config: &Config) -> Self {
        // API
        let rest_server_config = RestServerConfig {
            addr: config.http.address,
            pages_dir: config.http.pages_dir.as_path().into(),
            static_dir: config.http.static_dir.as_path().into(),
        };

        // Email
        let email_service_config = EmailServiceConfig {
            host: config.smtp.host.clone(),
            port: config.smtp.port,
            username: config.smtp.user.clone(),
            password: config.smtp.password.clone(),
            from: config.smtp.sender().to_owned(),
            starttls: *config.smtp.starttls,
            timeout: config.smtp.timeout.into(),
        };

        // Core
        let lead_feature_config = LeadFeatureConfig {
            recipient: Arc::new(config.lead.recipient.clone()),
        };

        Self {
            _cache: Default::default(),

            // API
            rest_server_config,

            // Email
            email_service_config,

            // Core
            lead_feature_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use owl_di::Provide;
    use types::RestServer;

    use super::*;

    #[test]
    fn provide_rest_server() {
        let config = owl_config::load_from(&[] as &[&str], |_| None).unwrap();
        let mut provider = Provider::new(&config);
        let _: RestServer = provider.provide();
    }

    #[test]
    fn email_config_from_smtp_settings() {
        let config = owl_config::load_from(&[] as &[&str], |key| match key {
            "SMTP_HOST" => Some("smtp.acme.com".into()),
            "SMTP_PORT" => Some("465".into()),
            "SMTP_USER" => Some("relay-user".into()),
            "SMTP_PASSWORD" => Some("relay-password".into()),
            "SMTP_STARTTLS" => Some("no".into()),
            _ => None,
        })
        .unwrap();
        let mut provider = Provider::new(&config);

        let email_config: EmailServiceConfig = provider.provide();

        assert!(email_config.is_configured());
        assert_eq!(email_config.from, "relay-user");
        assert_eq!(email_config.security(), owl_email_impl::SmtpSecurity::ImplicitTls);
        assert_eq!(email_config.timeout.as_secs(), 20);
    }
}
