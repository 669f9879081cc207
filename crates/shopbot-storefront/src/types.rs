use serde::Deserialize;
use serde_json::Value;
use shopbot_core::FieldError;

/// Takes the payload out of a `{"data": ..., "meta": {...}}` envelope.
/// Bodies without a `data` key are already the payload.
pub(crate) fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Failure body in any of the shapes shop backends answer with:
/// `{"error": {"code", "message", "details"?}}`, `{"error": "..."}` or
/// `{"message": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorEnvelope {
    Error { error: ErrorPayload },
    Message { message: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorPayload {
    Structured(ErrorBody),
    Plain(String),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Vec<FieldError>,
}

impl ErrorEnvelope {
    /// Splits into `(code, message, details)`. Plain messages get code `error`.
    pub(crate) fn into_parts(self) -> (String, String, Vec<FieldError>) {
        match self {
            Self::Error {
                error: ErrorPayload::Structured(body),
            } => (body.code, body.message, body.details),
            Self::Error {
                error: ErrorPayload::Plain(message),
            }
            | Self::Message { message } => ("error".to_owned(), message, Vec::new()),
        }
    }
}
