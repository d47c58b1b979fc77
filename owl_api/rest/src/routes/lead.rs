use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use owl_core_lead_contracts::{LeadFeatureService, LeadSubmitError};

use super::error;
use crate::{
    extractors::form::LeadForm,
    models::{lead::ApiLeadForm, ApiOk},
};

pub const SUCCESS_MESSAGE: &str = "Registro enviado correctamente.";

pub fn router(service: Arc<impl LeadFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/owl-latam/lead", routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl LeadFeatureService>>,
    LeadForm(form): LeadForm<ApiLeadForm>,
) -> Response {
    match service.submit(form.into()).await {
        Ok(()) => Json(ApiOk::with_message(SUCCESS_MESSAGE)).into_response(),
        Err(err @ LeadSubmitError::NotConfigured) => {
            error(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        Err(err @ LeadSubmitError::Send(_)) => {
            tracing::error!("{err}");
            error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
