use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::warn;
use vet_clinic_service::views::VeterinarianView;
use vet_clinic_service::{Mutation as MutationCore, NewVeterinarian, Query as QueryCore};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::payload::{self, Payload, missing_fields};

#[derive(Debug, Default, Deserialize)]
pub struct VeterinarianPayload {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
}

impl Payload for VeterinarianPayload {
    const REQUIRED: &'static [&'static str] = &["nombre", "email"];

    type Record = NewVeterinarian;

    fn into_record(self) -> Result<NewVeterinarian, ApiError> {
        let (Some(name), Some(email)) = (self.nombre, self.email) else {
            return Err(missing_fields(Self::REQUIRED));
        };

        Ok(NewVeterinarian {
            name,
            email,
            phone: self.telefono,
        })
    }
}

pub async fn list(state: State<AppState>) -> ApiResult<Json<Vec<VeterinarianView>>> {
    let veterinarians = QueryCore::list_veterinarians(&state.conn).await?;

    Ok(Json(veterinarians))
}

pub async fn create(
    state: State<AppState>,
    body: Result<Json<VeterinarianPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<VeterinarianView>)> {
    let form = payload::extract(body)?;

    // Checked ahead of the insert so the client gets the clinic's own message.
    if QueryCore::find_veterinarian_by_email(&state.conn, &form.email)
        .await?
        .is_some()
    {
        warn!("veterinarian email already registered");
        return Err(ApiError::Conflict("El email ya esta registrado".to_owned()));
    }

    let veterinarian = MutationCore::create_veterinarian(&state.conn, form).await?;
    let view = QueryCore::veterinarian_view(&state.conn, veterinarian).await?;

    Ok((StatusCode::CREATED, Json(view)))
}
