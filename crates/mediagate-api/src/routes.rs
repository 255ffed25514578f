use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use mediagate_core::db::SqliteAssetStore;
use mediagate_core::{
    AccessHooks, AssetStore, ConditionalRequest, FileResponder, FileResponse, GateOutcome,
    MediaGate, MediaResolver, RequestContext, RewriteRule, ServedFile,
};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::metrics::{GateMetrics, GateMetricsSnapshot};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    gate: Arc<MediaGate>,
    rewrite: Arc<RewriteRule>,
    metrics: Arc<GateMetrics>,
}

impl AppState {
    /// Open the SQLite asset store and register the configured access policy.
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self, AppError> {
        let store = SqliteAssetStore::open(&config.db_path).map_err(|error| {
            AppError::Config(format!(
                "cannot open asset database {}: {error}",
                config.db_path.display()
            ))
        })?;
        Self::with_store(config, Arc::new(store), AccessHooks::new())
    }

    /// Build state around an existing store. `hooks` run before the policy.
    pub fn with_store(
        config: Arc<AppConfig>,
        store: Arc<dyn AssetStore>,
        mut hooks: AccessHooks,
    ) -> Result<Self, AppError> {
        hooks.on_asset_access(config.access_policy);
        let rewrite = RewriteRule::new(&config.uploads_prefix)
            .map_err(|error| AppError::Config(error.to_string()))?;
        let gate = MediaGate::new(
            MediaResolver::new(config.uploads.clone(), store, hooks),
            FileResponder::new(config.cache_max_age),
        );
        Ok(Self {
            config,
            gate: Arc::new(gate),
            rewrite: Arc::new(rewrite),
            metrics: Arc::new(GateMetrics::default()),
        })
    }
}

pub fn app_router(state: AppState) -> Router {
    let rewrite_route = format!("/{}/{{*path}}", state.rewrite.prefix());

    Router::new()
        .route("/", get(gate_query))
        .route("/healthz", get(healthz))
        .route(&rewrite_route, get(gate_rewrite))
        .fallback(gate_query)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    access_policy: &'static str,
    requests: GateMetricsSnapshot,
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
        access_policy: state.config.access_policy.as_str(),
        requests: state.metrics.snapshot(),
    })
}

#[derive(Debug, Deserialize)]
struct GateQuery {
    protected_media_file: Option<String>,
}

async fn gate_query(
    State(state): State<AppState>,
    Query(query): Query<GateQuery>,
    headers: HeaderMap,
) -> Response {
    run_gate(state, query.protected_media_file, &headers).await
}

async fn gate_rewrite(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    let request_path = format!("{}/{path}", state.rewrite.prefix());
    let Some(media_file) = state.rewrite.apply(&request_path) else {
        return AppError::NotFound.into_response();
    };
    run_gate(state, Some(media_file), &headers).await
}

async fn run_gate(state: AppState, media_file: Option<String>, headers: &HeaderMap) -> Response {
    let conditional = ConditionalRequest::new(
        header_text(headers, &header::IF_NONE_MATCH),
        header_text(headers, &header::IF_MODIFIED_SINCE),
    );
    let mut context = RequestContext::new(media_file, conditional);

    let gate = Arc::clone(&state.gate);
    let joined = tokio::task::spawn_blocking(move || {
        let outcome = gate.handle(&mut context);
        (context, outcome)
    })
    .await;
    let (context, outcome) = match joined {
        Ok(result) => result,
        Err(error) => {
            state.metrics.record_failure();
            return AppError::internal(format!("gate task failed: {error}")).into_response();
        }
    };

    let mut response = match outcome {
        Ok(outcome) => {
            state.metrics.record(&outcome);
            outcome_response(outcome).unwrap_or_else(IntoResponse::into_response)
        }
        Err(error) => {
            state.metrics.record_failure();
            AppError::from(error).into_response()
        }
    };

    if context.cache_bypass.any() {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-accel-expires"), HeaderValue::from_static("0"));
    }
    response
}

fn outcome_response(outcome: GateOutcome) -> Result<Response, AppError> {
    match outcome {
        GateOutcome::File(FileResponse::Full(served)) => file_response(served),
        GateOutcome::File(FileResponse::NotModified) => Ok(StatusCode::NOT_MODIFIED.into_response()),
        GateOutcome::Redirect(location) => {
            let location = HeaderValue::try_from(location)
                .map_err(|_| AppError::internal("redirect location is not a valid header"))?;
            Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
        }
        GateOutcome::Denied => Err(AppError::Forbidden),
        GateOutcome::NotFound | GateOutcome::Skipped => Err(AppError::NotFound),
    }
}

fn file_response(served: ServedFile) -> Result<Response, AppError> {
    let headers = served.headers();
    let file = tokio::fs::File::from_std(served.into_file());

    let mut builder = Response::builder().status(StatusCode::OK);
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|error| AppError::internal(format!("failed to build file response: {error}")))
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
