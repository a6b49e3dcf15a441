use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::warn;
use vet_clinic_service::views::PetView;
use vet_clinic_service::{Mutation as MutationCore, NewPet, Query as QueryCore};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::payload::{self, Payload, missing_fields};

#[derive(Debug, Default, Deserialize)]
pub struct PetPayload {
    pub nombre: Option<String>,
    pub especie: Option<String>,
    pub propietario_id: Option<i32>,
    pub raza: Option<String>,
    pub edad: Option<i32>,
    pub peso: Option<i32>,
    pub sexo: Option<String>,
}

impl Payload for PetPayload {
    const REQUIRED: &'static [&'static str] = &["nombre", "especie", "propietario_id"];

    type Record = NewPet;

    fn into_record(self) -> Result<NewPet, ApiError> {
        let (Some(name), Some(species), Some(owner_id)) =
            (self.nombre, self.especie, self.propietario_id)
        else {
            return Err(missing_fields(Self::REQUIRED));
        };

        Ok(NewPet {
            name,
            species,
            breed: self.raza,
            age: self.edad,
            weight: self.peso,
            sex: self.sexo,
            owner_id,
        })
    }
}

pub async fn list(state: State<AppState>) -> ApiResult<Json<Vec<PetView>>> {
    let pets = QueryCore::list_pets(&state.conn).await?;

    Ok(Json(pets))
}

pub async fn create(
    state: State<AppState>,
    body: Result<Json<PetPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PetView>)> {
    let form = payload::extract(body)?;

    if QueryCore::find_user_by_id(&state.conn, form.owner_id)
        .await?
        .is_none()
    {
        warn!(owner_id = form.owner_id, "pet owner not found");
        return Err(ApiError::NotFound("El propietario no existe".to_owned()));
    }

    let pet = MutationCore::create_pet(&state.conn, form).await?;
    let view = QueryCore::pet_view(&state.conn, pet).await?;

    Ok((StatusCode::CREATED, Json(view)))
}
