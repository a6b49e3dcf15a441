mod config;
mod error;
mod handlers;
mod payload;

use axum::extract::Request;
use axum::routing::get;
use axum::{Router, ServiceExt};
use handlers::{pets, prescriptions, users, veterinarians};
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePath;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vet_clinic_service::sea_orm::{Database, DatabaseConnection};

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult};

/// The clinic router behind trailing-slash trimming, so `/api/users/` routes like
/// `/api/users`.
pub type ClinicService = NormalizePath<Router>;

#[derive(Clone)]
pub struct AppState {
    pub conn: DatabaseConnection,
}

/// Builds the clinic API: four collections under `config.api_prefix`, with either the
/// static front end or a JSON 404 for everything else.
pub fn router(state: AppState, config: &AppConfig) -> ClinicService {
    let api = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/veterinarios",
            get(veterinarians::list).post(veterinarians::create),
        )
        .route("/mascotas", get(pets::list).post(pets::create))
        .route(
            "/recetas",
            get(prescriptions::list).post(prescriptions::create),
        );

    let app = if config.api_prefix.is_empty() {
        Router::new().merge(api)
    } else {
        // Unknown API paths answer in JSON even when a front end is mounted.
        Router::new().nest(&config.api_prefix, api.fallback(not_found))
    };

    let app = match &config.static_dir {
        Some(dir) => app.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => app.fallback(not_found),
    };

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Wraps the whole router: a layer added with `Router::layer` runs after routing.
    NormalizePath::trim_trailing_slash(app)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Recurso no encontrado".to_owned())
}

#[tokio::main]
async fn start() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let conn = Database::connect(config.database_url.as_str()).await?;
    Migrator::up(&conn, None).await?;

    let app = router(AppState { conn }, &config);
    let listener = tokio::net::TcpListener::bind(config.server_url()).await?;
    info!(
        addr = %listener.local_addr()?,
        prefix = %config.api_prefix,
        "clinic api listening"
    );
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}

pub fn main() {
    if let Err(err) = start() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
