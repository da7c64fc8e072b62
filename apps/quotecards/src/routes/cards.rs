use std::path::Path;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::info;

use crate::driver::{render_pdf, OUTPUT_EXTENSION};
use crate::errors::AppError;
use crate::render::jig::render_jig;
use crate::state::AppState;

/// Multipart field carrying the CSV deck.
pub const UPLOAD_FIELD: &str = "file";
/// Download name when the upload did not carry a usable file name.
pub const FALLBACK_DOWNLOAD_NAME: &str = "cards.pdf";

const UPLOAD_FORM: &str = r#"<!doctype html>
<title>Quote cards</title>
<h1>Upload a deck</h1>
<p>CSV with a header row: quote, attribution, marker. Rows with a marker are skipped.</p>
<form method=post enctype=multipart/form-data>
    <input type=file name=file accept=".csv,text/csv">
    <input type=submit value=Upload>
</form>
<p><a href="/template.pdf">Cutting template</a></p>
"#;

/// One uploaded deck, read fully into memory.
#[derive(Debug)]
struct Upload {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn form_handler() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

/// POST /
///
/// Renders the uploaded CSV and returns the PDF as a download. Rendering is
/// CPU-bound and runs on the blocking pool.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation(format!("missing '{UPLOAD_FIELD}' field")))?;
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    let download_name = download_name(upload.file_name.as_deref());
    let title = download_name.clone();
    let options = state.options.clone();
    let rendered = tokio::task::spawn_blocking(move || render_pdf(&upload.bytes, &title, &options))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let (pdf, summary) = rendered?;

    info!(
        download = %download_name,
        accepted = summary.accepted,
        pages = summary.pages,
        "served upload"
    );
    Ok(pdf_response(pdf, "attachment", &download_name))
}

/// GET /template.pdf
pub async fn template_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let grid = state.options.grid.clone();
    let pdf = tokio::task::spawn_blocking(move || render_jig(&grid))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(pdf_response(pdf, "inline", "template.pdf"))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Returns the first `file` field; other fields are skipped.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some(Upload {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

/// The uploaded name with its extension swapped for `.pdf`.
///
/// Directory components sent by some browsers are dropped, and characters
/// that cannot appear in a quoted header parameter are replaced.
pub fn download_name(uploaded: Option<&str>) -> String {
    let stem = uploaded
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name))
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty());

    match stem {
        Some(stem) => {
            let safe: String = stem
                .chars()
                .map(|c| match c {
                    '"' | '\\' => '_',
                    c if c.is_ascii_graphic() || c == ' ' => c,
                    _ => '_',
                })
                .collect();
            format!("{safe}.{OUTPUT_EXTENSION}")
        }
        None => FALLBACK_DOWNLOAD_NAME.to_string(),
    }
}

fn pdf_response(pdf: Vec<u8>, disposition: &str, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("{disposition}; filename=\"{file_name}\""),
            ),
        ],
        pdf,
    )
        .into_response()
}
