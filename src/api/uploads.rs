use axum::extract::{Multipart, State};

use crate::api::errors::ApiError;
use crate::api::validation::validate_upload_filename;
use crate::core::state::AppState;

pub(crate) async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, ApiError> {
    let storage = state.storage().ok_or_else(|| {
        ApiError::ServiceUnavailable("File uploads are not configured".to_string())
    })?;

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let max_bytes = state.settings().storage().max_upload_size_mb * 1024 * 1024;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        filename = field.file_name().map(|name| name.to_string());
        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
        {
            let next_size = bytes.len() as u64 + chunk.len() as u64;
            if next_size > max_bytes {
                return Err(ApiError::BadRequest(format!(
                    "File size exceeds {}MB limit",
                    state.settings().storage().max_upload_size_mb
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        file_bytes = Some(bytes);
    }

    let file_bytes =
        file_bytes.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;
    let filename =
        filename.ok_or_else(|| ApiError::BadRequest("Filename is required".to_string()))?;

    validate_upload_filename(&filename, &state.settings().storage().allowed_upload_extensions)?;

    // Storage failures still answer with the helper's message; the route only
    // reports what the upload attempt produced.
    let message = match storage.store(&filename, file_bytes).await {
        Ok(stored) => {
            tracing::info!(key = %stored.key, size = stored.size, sha256 = %stored.sha256, "File uploaded");
            metrics::counter!("uploads_total", "outcome" => "ok").increment(1);
            format!("succeeded: {}", stored.key)
        }
        Err(err) => {
            tracing::error!(error = %err, "File upload failed");
            metrics::counter!("uploads_total", "outcome" => "failed").increment(1);
            "failed".to_string()
        }
    };

    Ok(format!("Upload {message}!"))
}
