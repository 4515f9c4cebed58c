//! HTTP transport implementation.
//!
//! Routes the REST surface onto the domain services, serves lesson images
//! from disk, and converts every failure into a JSON error body.

use axum::{
    Json, Router,
    extract::{
        FromRequestParts, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, Method, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::error::{Error, ErrorKind};
use crate::core::server::ApiServer;
use crate::domains::lessons::{
    Origin, SearchParams, StatusResponse, UpdateSpacesRequest, parse_lesson_id,
};
use crate::domains::store::{Document, InsertOutcome, UpdateOutcome};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Run the HTTP transport until Ctrl+C / SIGTERM, then close the store.
    pub async fn run(self, server: ApiServer) -> TransportResult<()> {
        let addr = self.address();
        let app = build_router(server.clone());

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Lessons:     GET /lessons, GET /search?q=, PUT /lessons/{{id}}");
        info!("  → Orders:      POST /orders");
        info!("  → Collections: GET|POST /collection/{{name}}, PUT /collection/{{name}}/{{id}}");
        info!("  → Images:      GET /images/*");
        info!("  → Health:      GET /health");

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(TransportError::from);

        server.shutdown().await;
        served
    }
}

/// Build the application router for `server`.
pub fn build_router(server: ApiServer) -> Router {
    let config = server.config().clone();

    let images_dir = &config.images.dir;
    let placeholder = ServeFile::new(images_dir.join(&config.images.placeholder));
    let images = ServeDir::new(images_dir).fallback(placeholder);

    let mut app = Router::new()
        .route("/lessons", get(list_lessons))
        .route("/lessons/{id}", put(update_lesson_spaces))
        .route("/search", get(search_lessons))
        .route("/orders", post(create_order))
        .route(
            "/collection/{name}",
            get(list_collection).post(insert_into_collection),
        )
        .route(
            "/collection/{name}/{id}",
            put(update_in_collection),
        )
        .route("/health", get(health_check))
        .nest_service("/images", images)
        .with_state(server);

    if config.transport.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]);
        app = app.layer(cors);
    }

    app.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// Resolve once Ctrl+C or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

// ============================================================================
// Error responses
// ============================================================================

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::MalformedIdentifier | ErrorKind::BadInput => StatusCode::BAD_REQUEST,
        ErrorKind::CollectionNotAllowed => StatusCode::NOT_FOUND,
        ErrorKind::StoreOperationFailure | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = status_for(kind);

        if status.is_server_error() {
            error!("Request failed ({}): {}", kind.as_str(), self);
        } else {
            warn!("Request rejected ({}): {}", kind.as_str(), self);
        }

        let body = serde_json::json!({
            "success": false,
            "error": kind.as_str(),
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::bad_input(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::bad_input(rejection.body_text())
    }
}

// ============================================================================
// Request origin
// ============================================================================

/// Origin (scheme + host) of the request being served.
///
/// Uses the configured public origin when set, otherwise the
/// `X-Forwarded-Proto`/`X-Forwarded-Host` headers, then `Host`.
pub struct RequestOrigin(pub Origin);

impl FromRequestParts<ApiServer> for RequestOrigin {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        server: &ApiServer,
    ) -> Result<Self, Self::Rejection> {
        if let Some(public) = &server.config().transport.public_origin {
            return Ok(Self(Origin::parse(public)?));
        }

        let scheme = first_header_value(&parts.headers, "x-forwarded-proto")
            .map(|scheme| scheme.to_ascii_lowercase())
            .filter(|scheme| scheme == "http" || scheme == "https")
            .unwrap_or_else(|| "http".to_string());
        let host = first_header_value(&parts.headers, "x-forwarded-host")
            .or_else(|| first_header_value(&parts.headers, header::HOST.as_str()))
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        Ok(Self(Origin::from_parts(&scheme, &host)?))
    }
}

fn first_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health_check(State(server): State<ApiServer>) -> impl IntoResponse {
    let (available, body) = server.health().await;
    let status = if available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

/// `GET /lessons`
#[instrument(skip_all)]
async fn list_lessons(
    State(server): State<ApiServer>,
    RequestOrigin(origin): RequestOrigin,
) -> Result<Json<Vec<Document>>, Error> {
    Ok(Json(server.lessons().list(&origin).await?))
}

/// `GET /search?q=`
#[instrument(skip_all)]
async fn search_lessons(
    State(server): State<ApiServer>,
    RequestOrigin(origin): RequestOrigin,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Document>>, Error> {
    let Query(params) = params?;
    let found = server
        .lessons()
        .search(params.q.as_deref(), &origin)
        .await?;
    Ok(Json(found))
}

/// `PUT /lessons/{id}`
#[instrument(skip_all, fields(id = %id))]
async fn update_lesson_spaces(
    State(server): State<ApiServer>,
    Path(id): Path<String>,
    body: Result<Json<UpdateSpacesRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, Error> {
    let lesson_id = parse_lesson_id(&id)?;
    let Json(request) = body?;

    let update = server
        .lessons()
        .update_spaces(lesson_id, request.spaces)
        .await?;
    Ok(Json(StatusResponse::from(update)))
}

/// `POST /orders`
#[instrument(skip_all)]
async fn create_order(
    State(server): State<ApiServer>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(order) = body?;
    let receipt = server.orders().create(order).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// `GET /collection/{name}`
#[instrument(skip_all, fields(collection = %name))]
async fn list_collection(
    State(server): State<ApiServer>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Document>>, Error> {
    Ok(Json(server.collections().list(&name).await?))
}

/// `POST /collection/{name}`
#[instrument(skip_all, fields(collection = %name))]
async fn insert_into_collection(
    State(server): State<ApiServer>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<InsertOutcome>), Error> {
    let Json(document) = body?;
    let outcome = server.collections().insert(&name, document).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// `PUT /collection/{name}/{id}`
#[instrument(skip_all, fields(collection = %name, id = %id))]
async fn update_in_collection(
    State(server): State<ApiServer>,
    Path((name, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateOutcome>, Error> {
    let Json(changes) = body?;
    Ok(Json(server.collections().update(&name, &id, changes).await?))
}
