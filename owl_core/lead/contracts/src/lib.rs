use std::future::Future;

use owl_models::lead::LeadSubmission;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait LeadFeatureService: Send + Sync + 'static {
    /// Forwards a lead to the sales inbox by email.
    fn submit(
        &self,
        lead: LeadSubmission,
    ) -> impl Future<Output = Result<(), LeadSubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum LeadSubmitError {
    #[error("SMTP is not configured")]
    NotConfigured,
    #[error("Email send failed: {0:#}")]
    Send(anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockLeadFeatureService {
    pub fn with_submit(mut self, lead: LeadSubmission, result: Result<(), LeadSubmitError>) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(lead))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
