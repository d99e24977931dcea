//! HTTP service: the generation pipeline behind an axum router.
//!
//! Three routes: `GET /` and `GET /health` for liveness, and
//! `POST /generate?output={markdown|html|pdf}` running the same
//! [`crate::generate::produce`] pipeline the CLI uses. Requests are
//! stateless and independent; the only shared state is the read-only
//! [`AppState`] built once at startup.
//!
//! Error policy at this boundary: caller mistakes (unknown format tags) map
//! to 400 with the supported values listed, everything else to 500 with a
//! one-line description — the `Display` of the typed error, never a
//! backtrace. The full error is logged server-side before mapping.

use crate::credentials::Credentials;
use crate::error::DsegenError;
use crate::generate::{produce, Artifact, InputFormat, OutputKind};
use crate::pipeline::llm::{ContentGenerator, OpenRouterClient, UnconfiguredGenerator};
use crate::pipeline::pdf::{ChromiumExporter, PdfExporter};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// Filename sent in the `Content-Disposition` header for PDF responses.
const PDF_ATTACHMENT: &str = "attachment; filename=speaking_paper.pdf";

/// Read-only per-process state: the pipeline's two external seams.
pub struct AppState {
    pub generator: Arc<dyn ContentGenerator>,
    pub exporter: Arc<dyn PdfExporter>,
}

impl AppState {
    pub fn new(generator: Arc<dyn ContentGenerator>, exporter: Arc<dyn PdfExporter>) -> Self {
        Self {
            generator,
            exporter,
        }
    }

    /// Production wiring. A missing credential pair is not a startup error —
    /// the service comes up and only `format=plain` requests fail, when the
    /// generation is actually attempted.
    pub fn from_credentials(credentials: Option<Credentials>) -> Self {
        let generator: Arc<dyn ContentGenerator> = match credentials {
            Some(creds) => Arc::new(OpenRouterClient::new(creds)),
            None => Arc::new(UnconfiguredGenerator),
        };
        Self::new(generator, Arc::new(ChromiumExporter::new()))
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/health", get(status))
        .route("/generate", post(generate))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<(), DsegenError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DsegenError::Internal(format!("Failed to bind {addr}: {e}")))?;
    info!("Listening on http://{addr}");
    axum::serve(listener, router(state))
        .await
        .map_err(|e| DsegenError::Internal(format!("Server error: {e}")))
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn status() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Input format tag: `plain`, `markdown`, or `html`.
    pub format: String,
    /// Topic text or pre-rendered content, per `format`.
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    /// Output format for the generated paper.
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_output() -> String {
    "pdf".to_string()
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GenerateQuery>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    match handle_generate(&state, &query, &request).await {
        Ok(response) => response,
        Err(e) => error_response(e),
    }
}

async fn handle_generate(
    state: &AppState,
    query: &GenerateQuery,
    request: &GenerateRequest,
) -> Result<Response, DsegenError> {
    let input: InputFormat = request.format.parse()?;
    let output: OutputKind = query.output.parse()?;

    let artifact = produce(
        state.generator.as_ref(),
        state.exporter.as_ref(),
        input,
        &request.content,
        output,
    )
    .await?;

    Ok(match artifact {
        Artifact::Markdown(content) => Json(json!({"content": content})).into_response(),
        Artifact::Html(html) => Html(html).into_response(),
        Artifact::Pdf(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, PDF_ATTACHMENT),
            ],
            bytes,
        )
            .into_response(),
    })
}

/// Map a pipeline error onto the wire: 400 for caller mistakes, 500 with a
/// short description for everything else.
fn error_response(e: DsegenError) -> Response {
    if e.is_client_error() {
        (StatusCode::BAD_REQUEST, Json(json!({"detail": e.to_string()}))).into_response()
    } else {
        error!("Error generating content: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": format!("Error generating content: {e}")})),
        )
            .into_response()
    }
}
