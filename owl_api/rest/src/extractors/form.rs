use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::Response,
    Form,
};
use serde::de::{value::MapDeserializer, DeserializeOwned};

use crate::routes::error;

/// Decode a form submitted either as `application/x-www-form-urlencoded` or
/// as `multipart/form-data`.
///
/// Every rejection (wrong content type, missing or invalid fields) is
/// answered with `422 Unprocessable Entity`.
pub struct LeadForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for LeadForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&request) {
            return Form::<T>::from_request(request, state)
                .await
                .map(|Form(value)| Self(value))
                .map_err(|rejection| unprocessable(rejection.body_text()));
        }

        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|rejection| unprocessable(rejection.body_text()))?;

        let mut fields = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| unprocessable(err.body_text()))?
        {
            let Some(name) = field.name().map(ToOwned::to_owned) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|err| unprocessable(err.body_text()))?;
            fields.push((name, value));
        }

        T::deserialize(MapDeserializer::<_, serde::de::value::Error>::new(
            fields.into_iter(),
        ))
        .map(Self)
        .map_err(|err| {
            unprocessable(format!("Failed to deserialize multipart form: {err}"))
        })
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn unprocessable(detail: String) -> Response {
    error(StatusCode::UNPROCESSABLE_ENTITY, detail)
}
