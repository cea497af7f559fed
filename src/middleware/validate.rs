use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{header, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, FieldErrors};

/// JSON body that has been deserialized and passed its `Validate` rules.
///
/// Malformed JSON is a 400 `InvalidJson`; rule failures are a 400
/// `ValidationError` listing every offending field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::invalid_json(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::validation_error("Invalid input", Some(field_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

/// [`ValidatedJson`] for endpoints whose body may be omitted.
///
/// A request that carries no body yields `T::default()`. Any body that is
/// sent goes through [`ValidatedJson`] and its rejection is returned as is.
#[derive(Debug, Clone)]
pub struct OptionalValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalValidatedJson<T>
where
    T: DeserializeOwned + Validate + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if carries_no_body(req.headers()) {
            return Ok(OptionalValidatedJson(T::default()));
        }

        let ValidatedJson(value) = ValidatedJson::<T>::from_request(req, state).await?;
        Ok(OptionalValidatedJson(value))
    }
}

/// `Content-Length: 0`, or no length, type or transfer coding at all
fn carries_no_body(headers: &HeaderMap) -> bool {
    match headers.get(header::CONTENT_LENGTH) {
        Some(length) => length.to_str().map(|v| v.trim() == "0").unwrap_or(false),
        None => {
            !headers.contains_key(header::CONTENT_TYPE)
                && !headers.contains_key(header::TRANSFER_ENCODING)
        }
    }
}

/// Flatten validator output to one message per field
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid ({})", field, err.code),
                })
                .unwrap_or_else(|| format!("{} is invalid", field));
            (field.to_string(), message)
        })
        .collect()
}
