use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::warn;
use vet_clinic_service::views::UserView;
use vet_clinic_service::{Mutation as MutationCore, NewUser, Query as QueryCore};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::payload::{self, Payload, missing_fields};

#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

impl Payload for UserPayload {
    const REQUIRED: &'static [&'static str] = &["nombre", "email", "password"];

    type Record = NewUser;

    fn into_record(self) -> Result<NewUser, ApiError> {
        let (Some(name), Some(email), Some(password)) = (self.nombre, self.email, self.password)
        else {
            return Err(missing_fields(Self::REQUIRED));
        };

        Ok(NewUser {
            name,
            email,
            password,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

pub async fn list(state: State<AppState>) -> ApiResult<Json<Vec<UserView>>> {
    let users = QueryCore::list_users(&state.conn).await?;

    Ok(Json(users))
}

pub async fn create(
    state: State<AppState>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let form = payload::extract(body)?;

    if QueryCore::find_user_by_email(&state.conn, &form.email)
        .await?
        .is_some()
    {
        warn!("user email already registered");
        return Err(ApiError::Conflict("El email ya esta registrado".to_owned()));
    }

    let user = MutationCore::create_user(&state.conn, form).await?;
    let view = QueryCore::user_view(&state.conn, user).await?;

    Ok((StatusCode::CREATED, Json(view)))
}
