use owl_core_lead_impl::LeadFeatureServiceImpl;
use owl_email_impl::{EmailServiceImpl, LettreSmtpTransport};
use owl_shared_impl::time::TimeServiceImpl;

// API
pub type RestServer = owl_api_rest::RestServer<LeadFeature>;

// Core
pub type LeadFeature = LeadFeatureServiceImpl<Time, Email>;

// Email
pub type Email = EmailServiceImpl<SmtpTransport>;
pub type SmtpTransport = LettreSmtpTransport;

// Shared
pub type Time = TimeServiceImpl;
