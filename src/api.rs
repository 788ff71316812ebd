use std::sync::Arc;

use anyhow::{Error, Result};
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::{
    clients::health::HealthChecker,
    config::Config,
    generator::NotificationGenerator,
    models::{
        activity::LearnerActivitySnapshot, health::HealthStatus, response::ErrorResponse,
        validation::validate_snapshot,
    },
};

pub struct AppState {
    generator: NotificationGenerator,
    health_checker: HealthChecker,
}

impl AppState {
    pub fn new(generator: NotificationGenerator) -> Self {
        let health_checker = HealthChecker::new(&generator);

        Self {
            generator,
            health_checker,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/generate_notifications", post(generate_notifications))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(config: Config, generator: NotificationGenerator) -> Result<(), Error> {
    let state = Arc::new(AppState::new(generator));
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Notification service started");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn generate_notifications(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LearnerActivitySnapshot>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("generate_notifications", %request_id);

    async move {
        let Json(snapshot) = match payload {
            Ok(payload) => payload,
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "Rejected malformed snapshot");
                let body = ErrorResponse::new("invalid_request", rejection.body_text());
                return (rejection.status(), Json(body)).into_response();
            }
        };

        if let Err(e) = validate_snapshot(&snapshot) {
            warn!(error = %e, "Rejected out-of-range snapshot");
            let body = ErrorResponse::new("invalid_request", e.to_string());
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
        }

        match state.generator.generate(&snapshot).await {
            Ok(drafts) => (StatusCode::OK, Json(drafts)).into_response(),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Notification generation failed");
                let body = ErrorResponse::new(e.kind(), e.to_string());
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check_all().await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}
