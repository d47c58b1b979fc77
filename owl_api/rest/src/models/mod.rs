use serde::Serialize;

pub mod lead;

#[derive(Serialize)]
pub struct ApiError<D> {
    pub detail: D,
}

#[derive(Debug, Serialize)]
pub struct ApiOk {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl ApiOk {
    pub fn new() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    pub fn with_message(message: &'static str) -> Self {
        Self {
            ok: true,
            message: Some(message),
        }
    }
}
