//! Upload handling: receive a multipart file, run the analysis pipeline, and
//! answer as JSON (ajax) or a redirect to the result page.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Redirect, Response};
use bytes::Bytes;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AjaxResponse {
    pub status: &'static str,
    pub msg: String,
}

impl AjaxResponse {
    fn ok(msg: String) -> Self {
        Self { status: "ok", msg }
    }
}

struct UploadForm {
    filename: String,
    bytes: Bytes,
    is_ajax: bool,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut is_ajax = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;
                file = Some((filename, bytes));
            }
            Some("__ajax") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read form field: {e}")))?;
                is_ajax = value == "true";
            }
            other => {
                warn!("ignoring unexpected form field {other:?}");
            }
        }
    }

    let (filename, bytes) = file.ok_or_else(|| AppError::BadRequest("no file uploaded".into()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("uploaded file is empty".into()));
    }

    Ok(UploadForm {
        filename,
        bytes,
        is_ajax,
    })
}

/// `POST /upload` — multipart `file` plus optional `__ajax` flag.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_form(multipart).await?;
    info!(
        "received upload {:?} ({} bytes, ajax: {})",
        form.filename,
        form.bytes.len(),
        form.is_ajax
    );

    let results = state
        .pipeline
        .classify_and_dispatch(&form.filename, form.bytes)
        .await?;

    if form.is_ajax {
        Ok(Json(AjaxResponse::ok(results)).into_response())
    } else {
        let encoded = utf8_percent_encode(&results, NON_ALPHANUMERIC).to_string();
        Ok(Redirect::to(&format!("/result/{encoded}")).into_response())
    }
}
