//! HTTP routes for the fractal store.
//!
//! - `GET /`     -> one stored fractal picked at random
//! - `GET /all`  -> every stored fractal
//! - `POST /add` -> form fields `name` + `state` (urlencoded or multipart); `ok` or 418

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use burrito_core::{
    Fractal, FractalService, FractalStore, RepoError, RepoResult, SqliteFractalRepository,
};
use log::{debug, error};
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};

use crate::form::FormFields;

type SessionService<'conn> = FractalService<SqliteFractalRepository<'conn>>;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<FractalStore>,
    debug: bool,
}

impl AppState {
    pub fn new(store: Arc<FractalStore>, debug: bool) -> Self {
        Self { store, debug }
    }

    /// Runs `f` on a blocking worker with a fresh session-scoped service.
    async fn with_service<T, F>(&self, f: F) -> Result<T, ErrorResponse>
    where
        T: Send + 'static,
        F: for<'conn> FnOnce(&SessionService<'conn>) -> RepoResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let outcome = tokio::task::spawn_blocking(move || {
            store.with_session(|conn| f(&FractalService::new(SqliteFractalRepository::new(conn))))
        })
        .await;

        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(self.fail(ApiError::Store(err))),
            Err(err) => Err(self.fail(ApiError::Worker(err))),
        }
    }

    fn fail(&self, error: ApiError) -> ErrorResponse {
        ErrorResponse {
            error,
            expose_detail: self.debug,
        }
    }
}

/// Create the router with all endpoints and permissive CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(get_random))
        .route("/all", get(get_all))
        .route("/add", post(post_fractal))
        .layer(cors)
        .with_state(state)
}

async fn get_random(State(state): State<AppState>) -> Result<Json<Fractal>, ErrorResponse> {
    debug!("event=http_request module=http route=random");
    let picked = state
        .with_service(|service| service.random_fractal())
        .await?;

    picked
        .map(Json)
        .ok_or_else(|| state.fail(ApiError::EmptyStore))
}

async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Fractal>>, ErrorResponse> {
    debug!("event=http_request module=http route=all");
    let fractals = state
        .with_service(|service| service.list_fractals())
        .await?;
    Ok(Json(fractals))
}

async fn post_fractal(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, ErrorResponse> {
    let name = fields.first_non_empty("name").map(str::to_owned);
    let fractal_state = fields.first_non_empty("state").map(str::to_owned);
    debug!(
        "event=http_request module=http route=add name_present={} state_present={}",
        name.is_some(),
        fractal_state.is_some()
    );

    let (Some(name), Some(fractal_state)) = (name, fractal_state) else {
        return Ok(StatusCode::IM_A_TEAPOT.into_response());
    };

    state
        .with_service(move |service| service.add_fractal(name, fractal_state))
        .await?;
    Ok("ok".into_response())
}

/// Failures that surface as a generic server error.
#[derive(Debug)]
pub enum ApiError {
    Store(RepoError),
    /// Random pick requested while nothing is stored.
    EmptyStore,
    /// The blocking worker panicked or was cancelled.
    Worker(JoinError),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "store error: {err}"),
            Self::EmptyStore => write!(f, "no fractals stored"),
            Self::Worker(err) => write!(f, "store worker failed: {err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::EmptyStore => None,
            Self::Worker(err) => Some(err),
        }
    }
}

/// 500 response; carries the error text only in debug mode.
#[derive(Debug)]
pub struct ErrorResponse {
    error: ApiError,
    expose_detail: bool,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        error!(
            "event=http_request module=http status=error error={}",
            self.error
        );

        if self.expose_detail {
            (StatusCode::INTERNAL_SERVER_ERROR, self.error.to_string()).into_response()
        } else {
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
