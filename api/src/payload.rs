//! Request body schemas and the checks shared by every create handler.
//!
//! Each endpoint deserializes into its own payload struct whose fields are all
//! optional, then converts it into a service record. A field that is absent or
//! `null` counts as missing.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;
use vet_clinic_service::views::TIMESTAMP_FORMAT;

use crate::error::ApiError;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A request body that turns into a service record once its required fields are in.
pub(crate) trait Payload {
    /// Names reported when a required field is missing, in the order clients send them.
    const REQUIRED: &'static [&'static str];

    type Record;

    fn into_record(self) -> Result<Self::Record, ApiError>;
}

/// Error for a payload that lacks any of `required`.
pub(crate) fn missing_fields(required: &[&str]) -> ApiError {
    ApiError::BadRequest(format!(
        "Faltan datos obligatorios ({})",
        required.join(", ")
    ))
}

/// Unwraps the JSON body and validates it into a service record.
pub(crate) fn extract<P: Payload>(
    body: Result<Json<P>, JsonRejection>,
) -> Result<P::Record, ApiError> {
    let Json(payload) = body.map_err(|rejection| {
        warn!(%rejection, "unreadable request body");
        match rejection {
            JsonRejection::MissingJsonContentType(_) => missing_fields(P::REQUIRED),
            other => ApiError::BadRequest(format!("Datos invalidos: {}", other.body_text())),
        }
    })?;

    payload.into_record().inspect_err(|err| warn!(%err, "rejected payload"))
}

/// Parses a `YYYY-MM-DD` query bound into midnight of that day.
pub(crate) fn parse_day(value: &str) -> Result<NaiveDateTime, ApiError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            ApiError::BadRequest("Formato de fecha incorrecto. Usa YYYY-MM-DD".to_owned())
        })
}

pub(crate) fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ApiError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        ApiError::BadRequest("Formato de fecha incorrecto. Usa YYYY-MM-DD HH:MM:SS".to_owned())
    })
}
