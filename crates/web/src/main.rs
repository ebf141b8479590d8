use std::sync::Arc;

use anyhow::Context;
use storage::{Database, repository::Repositories};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod auth;
mod config;
mod error;
mod features;
mod middleware;
mod realtime;
mod routes;
mod state;

use auth::JwtVerifier;
use config::Config;
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::competitions::handlers::list_competitions,
        features::competitions::handlers::get_competition,
        features::competitions::handlers::start_competition,
        features::competitions::handlers::stop_competition,
        features::teams::handlers::list_teams,
        features::teams::handlers::list_my_teams,
        features::timing::handlers::submit_times,
    ),
    components(
        schemas(
            storage::dto::competition::CompetitionResponse,
            storage::dto::time_record::SubmitTimesRequest,
            storage::dto::time_record::SubmitTimesResponse,
            storage::dto::time_record::TimedEntry,
            storage::dto::time_record::TimeRecordResponse,
            storage::models::Competition,
            storage::models::CompetitionCategory,
            storage::models::CompetitionStatus,
            storage::models::Team,
        )
    ),
    tags(
        (name = "competitions", description = "Competition listing and start/stop control"),
        (name = "teams", description = "Team listing"),
        (name = "timing", description = "Arrival time submission"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "judge_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting race timing API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let repos = Repositories::postgres(&db);
    let verifier = Arc::new(JwtVerifier::new(
        config.jwt_secret.as_bytes(),
        repos.judges.clone(),
    ));
    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    let state = AppState::new(repos, verifier, api_keys, config.ws_channel_capacity);

    let app = routes::router(state).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );
    tracing::info!("Judge sessions at ws://{}/ws/juez/{{judge_id}}?token=...", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
