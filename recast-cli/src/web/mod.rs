// ============================================================================
// recast-cli/src/web/mod.rs
// ============================================================================
//
// BROWSER UI: axum server for `recast serve`
//
// Routes:
// - GET  /         converter page
// - POST /convert  multipart form, answers with the converted file
// - GET  /healthz  JSON status including ffmpeg availability
//
// Each conversion runs on tokio's blocking pool. Requests share nothing but
// the read-only configuration; every request gets its own temp files.

pub mod form;
pub mod page;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use axum::extract::multipart::MultipartError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use recast_core::external::{FfmpegSpawner, ffmpeg_binary};
use recast_core::{CoreConfig, CoreError, PlatformExtractor, check_dependency};
use serde::Serialize;

use crate::error::CliResult;

/// Room for the non-file form fields on top of the upload limit.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Shared, read-only state handed to every request.
pub struct AppState<S, E> {
    pub config: Arc<CoreConfig>,
    pub spawner: S,
    pub extractor: E,
}

impl<S: Clone, E: Clone> Clone for AppState<S, E> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            spawner: self.spawner.clone(),
            extractor: self.extractor.clone(),
        }
    }
}

impl<S, E> AppState<S, E> {
    pub fn new(config: CoreConfig, spawner: S, extractor: E) -> Self {
        Self {
            config: Arc::new(config),
            spawner,
            extractor,
        }
    }
}

/// A failed request, rendered as an HTML error page.
#[derive(Debug)]
pub struct WebError {
    status: StatusCode,
    title: &'static str,
    message: String,
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn from_multipart(err: MultipartError) -> Self {
        let status = err.status();
        Self {
            status,
            title: if status == StatusCode::PAYLOAD_TOO_LARGE {
                "Upload too large"
            } else {
                "Invalid form"
            },
            message: err.body_text(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            title: "Internal error",
            message: message.into(),
        }
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        let (status, title) = if err.is_user_error() {
            (StatusCode::BAD_REQUEST, "Invalid request")
        } else {
            match &err {
                CoreError::Download(_) => (StatusCode::BAD_GATEWAY, "Download failed"),
                CoreError::EncoderFailed { .. } => (StatusCode::BAD_GATEWAY, "Conversion failed"),
                CoreError::ExternalTool(_) => (StatusCode::BAD_GATEWAY, "External tool failed"),
                CoreError::DependencyNotFound(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "Missing dependency")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
            }
        };
        Self {
            status,
            title,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{}: {}", self.title, self.message);
        } else {
            log::warn!("{}: {}", self.title, self.message);
        }
        (self.status, Html(page::error_page(self.title, &self.message))).into_response()
    }
}

/// A converted file ready to be sent to the browser.
struct Download {
    file_name: String,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

/// `Content-Disposition` value for `file_name`, with an ASCII fallback and
/// the RFC 5987 encoded original.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded = utf8_percent_encode(file_name, ATTR_CHAR);
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Builds the router for the browser UI.
pub fn router<S, E>(state: AppState<S, E>) -> Router
where
    S: FfmpegSpawner + Clone + Send + Sync + 'static,
    E: PlatformExtractor + Clone + Send + Sync + 'static,
{
    let body_limit = state.config.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES);
    Router::new()
        .route("/", get(index::<S, E>))
        .route("/convert", post(convert::<S, E>))
        .route("/healthz", get(healthz::<S, E>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn index<S, E>(State(state): State<AppState<S, E>>) -> Html<String> {
    Html(page::index_page(
        state.config.allow_platform_sources,
        state.config.max_upload_bytes,
    ))
}

/// Body of `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub ffmpeg: bool,
}

async fn healthz<S, E>(State(state): State<AppState<S, E>>) -> Json<Health> {
    let binary = ffmpeg_binary(&state.config);
    let ffmpeg = tokio::task::spawn_blocking(move || check_dependency(&binary, "-version").is_ok())
        .await
        .unwrap_or(false);
    Json(Health {
        status: "ok",
        ffmpeg,
    })
}

async fn convert<S, E>(
    State(state): State<AppState<S, E>>,
    multipart: Multipart,
) -> Result<Response, WebError>
where
    S: FfmpegSpawner + Clone + Send + Sync + 'static,
    E: PlatformExtractor + Clone + Send + Sync + 'static,
{
    let mut form = form::read_form(multipart).await?;
    let target = form.target()?;
    let source = form.take_input_source()?;
    if let recast_core::InputSource::Upload { bytes, .. } = &source {
        if bytes.len() > state.config.max_upload_bytes {
            return Err(WebError {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                title: "Upload too large",
                message: format!(
                    "The upload is {}; the limit is {}",
                    recast_core::format_bytes(bytes.len() as u64),
                    recast_core::format_bytes(state.config.max_upload_bytes as u64)
                ),
            });
        }
    }

    let AppState {
        config,
        spawner,
        extractor,
    } = state;
    let download = tokio::task::spawn_blocking(move || -> Result<Download, CoreError> {
        let media = recast_core::acquire(&config, &extractor, source)?;
        let output = recast_core::convert(&spawner, &config, &media, &target)?;
        let file_name = output.file_name().to_string();
        let mime_type = output.mime_type();
        let bytes = output.read_bytes()?;
        Ok(Download {
            file_name,
            mime_type,
            bytes,
        })
    })
    .await
    .map_err(|e| WebError::internal(format!("conversion task failed: {e}")))??;

    log::info!(
        "Sending {} ({})",
        download.file_name,
        recast_core::format_bytes(download.bytes.len() as u64)
    );
    let disposition = HeaderValue::from_str(&content_disposition(&download.file_name))
        .map_err(|e| WebError::internal(format!("bad file name header: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(download.mime_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(download.bytes),
    )
        .into_response())
}

/// Serves the router on `addr` until Ctrl+C.
pub async fn serve<S, E>(addr: SocketAddr, state: AppState<S, E>) -> CliResult<()>
where
    S: FfmpegSpawner + Clone + Send + Sync + 'static,
    E: PlatformExtractor + Clone + Send + Sync + 'static,
{
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Browser UI listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install Ctrl+C handler: {err}");
    }
}
