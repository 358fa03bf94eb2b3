//! Attestation upload endpoint.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::messages::{self, Label};
use crate::pipeline::{AttestationResult, Detail};

#[derive(Deserialize)]
pub struct UploadQuery {
    pub lang: Option<String>,
}

/// Response body: the workflow result plus the moment the response was built.
#[derive(Serialize)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub result: AttestationResult,
    pub timestamp: DateTime<Utc>,
}

/// `POST /api/attestations?lang=` — run the validation workflow on one
/// uploaded document.
///
/// Expects a multipart body with a `file` part. The response status code
/// comes from the workflow itself: 200 for a decided document, 502/504
/// when a downstream service failed.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let lang = query
        .lang
        .as_deref()
        .map(|code| code.parse().unwrap_or_default())
        .unwrap_or(ctx.default_lang);

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("document").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            file = Some((name, bytes.to_vec()));
        }
    }

    let (file_name, file_bytes) = match file {
        Some(f) if !f.1.is_empty() => f,
        _ => {
            return Err(ApiError::BadRequest(
                messages::no_file_uploaded(lang).to_string(),
            ))
        }
    };

    let file_size = file_bytes.len();
    tracing::info!(file = %file_name, size = file_size, "attestation received");

    // The processor blocks on outbound HTTP and SQLite work.
    let processor = ctx.processor.clone();
    let mut result = tokio::task::spawn_blocking(move || {
        processor.process(&file_bytes, &file_name, lang)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("processing task failed: {e}")))?;

    result.details.push(Detail {
        label: messages::label(Label::FileSize, lang).to_string(),
        value: format!("{:.2} KB", file_size as f64 / 1024.0),
    });

    let status =
        StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = UploadResponse {
        result,
        timestamp: Utc::now(),
    };
    Ok((status, Json(body)).into_response())
}
