//! Web server for the single-page podcast tool.
//!
//! `GET /` serves the page; the page calls `POST /script` with the uploaded
//! PDF and chosen duration, then `POST /speech` with the returned script.

use crate::cli::Output;
use crate::config::Settings;
use crate::document::Document;
use crate::error::EduAidError;
use crate::orchestrator::{Orchestrator, PodcastScript};
use crate::session::{Event, Session};
use crate::speech::{AUDIO_MIME, DOWNLOAD_FILE_NAME};
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// Shared application state.
struct AppState {
    orchestrator: Arc<Orchestrator>,
}

/// Build the application router around an orchestrator.
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    let max_upload = orchestrator.settings().server.max_upload_bytes;
    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/script", post(script))
        .route("/speech", post(speech))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(RequestBodyLimitLayer::new(max_upload))
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let app = router(orchestrator);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("EduAid");
    println!();
    Output::success(&format!("Open http://{} in your browser", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Page", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Script", "POST /script (multipart: file, minutes)");
    Output::kv("Speech", "POST /speech");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct SpeechRequest {
    script: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error returned from a handler, rendered as JSON.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<EduAidError> for ApiError {
    fn from(e: EduAidError) -> Self {
        let status = match &e {
            EduAidError::InvalidInput(_)
            | EduAidError::Pdf(_)
            | EduAidError::EmptyDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EduAidError::InvalidState(_) => StatusCode::CONFLICT,
            EduAidError::AllChunksFailed { .. }
            | EduAidError::Summarization(_)
            | EduAidError::Speech(_)
            | EduAidError::OpenAI(_)
            | EduAidError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", e);
        }
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

// === Handlers ===

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Extract and summarize an uploaded PDF.
async fn script(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PodcastScript>, ApiError> {
    let mut document = None;
    let mut minutes = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field.bytes().await?;
                document = Some(Document::new(file_name, data));
            }
            Some("minutes") => {
                let text = field.text().await?;
                let value = text
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ApiError::bad_request(format!("Invalid minutes: {:?}", text)))?;
                minutes = Some(value);
            }
            _ => {}
        }
    }

    let document = document.ok_or_else(|| ApiError::bad_request("Missing 'file' field"))?;
    info!("Received {} ({} bytes)", document.name, document.len());

    let mut session = Session::new(state.orchestrator.clone());
    if let Some(minutes) = minutes {
        session.handle(Event::DurationChanged(minutes)).await?;
    }
    let state = session.handle(Event::FileSelected(document)).await?;

    let script = state.script().cloned().ok_or_else(|| {
        ApiError::from(EduAidError::InvalidState(format!(
            "summarization did not complete (session is {})",
            state.stage()
        )))
    })?;
    Ok(Json(script))
}

/// Synthesize a script into a downloadable MP3.
async fn speech(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeechRequest>,
) -> Result<Response, ApiError> {
    let audio = state.orchestrator.synthesize(&req.script).await?;

    Ok((
        [
            (header::CONTENT_TYPE, AUDIO_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
            ),
        ],
        audio.bytes,
    )
        .into_response())
}
