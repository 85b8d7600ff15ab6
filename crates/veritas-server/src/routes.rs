//! HTTP routes and handlers

use axum::{
    async_trait,
    extract::{
        multipart::MultipartError,
        rejection::{FormRejection, JsonRejection},
        DefaultBodyLimit, FromRequest, Multipart, Request, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tokio::task::JoinError;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use veritas_core::{confidence_display, Error, Label};

use crate::config::CorsConfig;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);
    let body_limit = match state.config.max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/test", get(test_form))
        .route("/predict", post(predict))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn home() -> Html<&'static str> {
    Html(
        r#"<h1>Veritas Fake News Detection API</h1>
<p>Server is running successfully.</p>
<p>Use POST /predict to get predictions.</p>
<p>Or visit <a href="/test">/test</a> for quick testing.</p>
"#,
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub vectorizer_loaded: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let artifacts = state.artifacts();
    Json(HealthResponse {
        status: "running".to_string(),
        model_loaded: artifacts.model_loaded(),
        vectorizer_loaded: artifacts.vectorizer_loaded(),
    })
}

async fn test_form() -> Html<&'static str> {
    Html(
        r#"<h2>Quick Test</h2>
<form action="/predict" method="post">
    <textarea name="text" rows="6" cols="60"
    placeholder="Enter news text here..."></textarea><br><br>
    <input type="submit" value="Analyze News"
    style="padding:10px 20px;font-size:16px;">
</form>
"#,
    )
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// `text` field of a JSON or urlencoded form body
#[derive(Debug, Default, Deserialize)]
struct PredictPayload {
    #[serde(default)]
    text: Option<String>,
}

/// Text extracted from a `/predict` request.
///
/// JSON is read when the content type says JSON, multipart form data when it
/// says `multipart/form-data`, the urlencoded form otherwise. A body that
/// parses but carries no string `text` field yields no text. A body that
/// cannot be read at all (too large, connection dropped) is rejected.
pub struct PredictText(pub Option<String>);

#[async_trait]
impl<S> FromRequest<S> for PredictText
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(req.headers()) {
            BodyKind::Json => match Json::<PredictPayload>::from_request(req, state).await {
                Ok(Json(payload)) => Ok(Self(payload.text)),
                Err(JsonRejection::BytesRejection(e)) => Err(ApiError::body(e.status(), e.body_text())),
                Err(e) => {
                    debug!("Unreadable JSON predict body: {}", e.body_text());
                    Ok(Self(None))
                }
            },
            BodyKind::Multipart => match Multipart::from_request(req, state).await {
                Ok(multipart) => multipart_text(multipart).await.map(Self),
                Err(e) => {
                    debug!("Unreadable multipart predict body: {}", e.body_text());
                    Ok(Self(None))
                }
            },
            BodyKind::Form => match Form::<PredictPayload>::from_request(req, state).await {
                Ok(Form(payload)) => Ok(Self(payload.text)),
                Err(FormRejection::BytesRejection(e)) => Err(ApiError::body(e.status(), e.body_text())),
                Err(e) => {
                    debug!("Unreadable form predict body: {}", e.body_text());
                    Ok(Self(None))
                }
            },
        }
    }
}

/// First `text` field of a multipart body
async fn multipart_text(mut multipart: Multipart) -> Result<Option<String>, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return multipart_failure(e),
        };
        if field.name() != Some("text") {
            continue;
        }
        return match field.text().await {
            Ok(text) => Ok(Some(text)),
            Err(e) => multipart_failure(e),
        };
    }
}

/// Oversized bodies are errors; malformed multipart framing means no text
fn multipart_failure(err: MultipartError) -> Result<Option<String>, ApiError> {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Err(ApiError::body(err.status(), err.body_text()));
    }
    debug!("Unreadable multipart predict body: {}", err.body_text());
    Ok(None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Multipart,
    Form,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return BodyKind::Form;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json")) {
        BodyKind::Json
    } else if mime == "multipart/form-data" {
        BodyKind::Multipart
    } else {
        BodyKind::Form
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Label,
    pub confidence: String,
    pub input_preview: String,
}

/// Main prediction handler
async fn predict(
    State(state): State<AppState>,
    PredictText(text): PredictText,
) -> Result<Json<PredictResponse>, ApiError> {
    metrics::counter!("veritas_requests_total", "endpoint" => "predict").increment(1);

    let predictor = state.predictor.clone();
    let start = Instant::now();

    // Inference is CPU-bound; a panic inside it surfaces as a JoinError
    let prediction = tokio::task::spawn_blocking(move || predictor.predict(text.as_deref()))
        .await
        .map_err(|e| Error::prediction_failed(join_error_cause(e)))??;

    let label = prediction.result.label;
    metrics::histogram!("veritas_inference_latency_us").record(start.elapsed().as_micros() as f64);
    metrics::counter!("veritas_predictions_total", "label" => label.as_str()).increment(1);
    info!(label = %label, "Prediction served");

    Ok(Json(PredictResponse {
        prediction: label,
        confidence: confidence_display(prediction.result.confidence),
        input_preview: prediction.input_preview,
    }))
}

fn join_error_cause(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let panic = err.into_panic();
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "inference panicked".to_string()
    }
}

async fn fallback() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Error handling
#[derive(Debug)]
pub enum ApiError {
    /// Prediction pipeline error
    Predict(Error),

    /// The request body could not be read
    Body { status: StatusCode, message: String },
}

impl ApiError {
    fn body(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Body {
            status,
            message: message.into(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Predict(err) => err.kind(),
            Self::Body { .. } => "body",
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Predict(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        metrics::counter!("veritas_errors_total", "kind" => self.kind()).increment(1);

        let (status, message) = match self {
            ApiError::Body { status, message } => {
                warn!("Rejected predict body: {}", message);
                (status, format!("Failed to read request body: {}", message))
            }
            ApiError::Predict(Error::InvalidInput) => {
                (StatusCode::BAD_REQUEST, "No text provided".to_string())
            }
            ApiError::Predict(Error::ServiceUnavailable) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Model not loaded properly.".to_string(),
            ),
            ApiError::Predict(Error::PredictionFailed(cause)) => {
                error!("Prediction failed: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Prediction failed: {}", cause),
                )
            }
            ApiError::Predict(other) => {
                error!("Prediction failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Prediction failed: {}", other),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
