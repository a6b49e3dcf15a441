use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use vet_clinic_service::views::PrescriptionView;
use vet_clinic_service::{
    Mutation as MutationCore, NewPrescription, PrescriptionRange, Query as QueryCore,
};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::payload::{self, Payload, missing_fields};

/// Optional `YYYY-MM-DD` bounds; an empty value is the same as no value.
#[derive(Debug, Default)]
pub struct RangeParams {
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
}

impl RangeParams {
    /// Keeps the first value of a repeated key and ignores unknown keys.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "fecha_inicio" => &mut params.fecha_inicio,
                "fecha_fin" => &mut params.fecha_fin,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        params
    }

    fn into_range(self) -> ApiResult<PrescriptionRange> {
        Ok(PrescriptionRange {
            from: day_bound(self.fecha_inicio)?,
            to: day_bound(self.fecha_fin)?,
        })
    }
}

fn day_bound(raw: Option<String>) -> ApiResult<Option<NaiveDateTime>> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| payload::parse_day(&value))
        .transpose()
}

#[derive(Debug, Default, Deserialize)]
pub struct PrescriptionPayload {
    pub diagnostico: Option<String>,
    pub tratamiento: Option<String>,
    pub id_usuario: Option<i32>,
    pub id_veterinario: Option<i32>,
    pub id_mascota: Option<i32>,
    pub fecha: Option<String>,
}

impl Payload for PrescriptionPayload {
    const REQUIRED: &'static [&'static str] = &[
        "diagnostico",
        "tratamiento",
        "id_usuario",
        "id_veterinario",
        "id_mascota",
    ];

    type Record = NewPrescription;

    fn into_record(self) -> Result<NewPrescription, ApiError> {
        let Self {
            diagnostico,
            tratamiento,
            id_usuario,
            id_veterinario,
            id_mascota,
            fecha,
        } = self;
        let (
            Some(diagnosis),
            Some(treatment),
            Some(user_id),
            Some(veterinarian_id),
            Some(pet_id),
        ) = (diagnostico, tratamiento, id_usuario, id_veterinario, id_mascota)
        else {
            return Err(missing_fields(Self::REQUIRED));
        };

        let issued_at = match fecha.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => payload::parse_timestamp(raw)?,
            _ => Utc::now().naive_utc(),
        };

        Ok(NewPrescription {
            issued_at,
            diagnosis,
            treatment,
            user_id,
            veterinarian_id,
            pet_id,
        })
    }
}

pub async fn list(
    state: State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<Vec<PrescriptionView>>> {
    let Query(pairs) = query.map_err(|rejection| {
        warn!(%rejection, "unreadable query string");
        ApiError::BadRequest(format!("Parametros invalidos: {}", rejection.body_text()))
    })?;
    let range = RangeParams::from_pairs(pairs)
        .into_range()
        .inspect_err(|err| warn!(%err, "bad date range"))?;
    let prescriptions = QueryCore::list_prescriptions(&state.conn, range).await?;

    Ok(Json(prescriptions))
}

pub async fn create(
    state: State<AppState>,
    body: Result<Json<PrescriptionPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PrescriptionView>)> {
    let form = payload::extract(body)?;
    ensure_references(&state, &form).await?;

    let prescription = MutationCore::create_prescription(&state.conn, form).await?;
    let view = QueryCore::prescription_view(&state.conn, prescription).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Owner, veterinarian and pet must all exist before the prescription is written,
/// matching the owner check on pet creation.
async fn ensure_references(state: &AppState, form: &NewPrescription) -> ApiResult<()> {
    let conn = &state.conn;

    if QueryCore::find_user_by_id(conn, form.user_id).await?.is_none() {
        warn!(user_id = form.user_id, "prescription user not found");
        return Err(ApiError::NotFound("El usuario no existe".to_owned()));
    }
    if QueryCore::find_veterinarian_by_id(conn, form.veterinarian_id)
        .await?
        .is_none()
    {
        warn!(
            veterinarian_id = form.veterinarian_id,
            "prescription veterinarian not found"
        );
        return Err(ApiError::NotFound("El veterinario no existe".to_owned()));
    }
    if QueryCore::find_pet_by_id(conn, form.pet_id).await?.is_none() {
        warn!(pet_id = form.pet_id, "prescription pet not found");
        return Err(ApiError::NotFound("La mascota no existe".to_owned()));
    }

    Ok(())
}
