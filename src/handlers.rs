use crate::{
    error::{self, ApiError},
    models::{AppState, VideoRecord},
    naming, storage,
};
use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::header::CONTENT_TYPE,
    response::{Html, Json},
};
use chrono::{DateTime, Utc};
use multer::{Constraints, Multipart, SizeLimit};
use std::sync::Arc;
use tracing::info;

const FILE_FIELD: &str = "video";
const TITLE_FIELD: &str = "title";

/// Upload page with the form, progress bar, and playback list.
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Accept a single video upload and append it to the catalog.
///
/// Terminal states only: any filter or I/O failure short-circuits, and the
/// catalog is appended to only after the bytes are fully on disk.
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Json<VideoRecord>, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidRequest("missing Content-Type header".to_string()))?;

    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid multipart request: {}", e)))?;

    // Stream the body through multer; the size ceiling aborts the parse
    // before oversized uploads are fully received.
    let constraints = Constraints::new()
        .size_limit(SizeLimit::new().for_field(FILE_FIELD, state.config.max_file_size));
    let mut multipart = Multipart::with_constraints(
        request.into_body().into_data_stream(),
        boundary,
        constraints,
    );

    let max_file_size = state.config.max_file_size;
    let map_err = |e: multer::Error| error::from_multipart(e, max_file_size);

    let mut title: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(map_err)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            TITLE_FIELD => {
                let text = field.text().await.map_err(map_err)?;
                let text = text.trim();
                if !text.is_empty() {
                    title = Some(text.to_string());
                }
            }
            FILE_FIELD => {
                let declared = field
                    .content_type()
                    .map(|m| m.essence_str().to_string())
                    .unwrap_or_default();
                if !declared.starts_with("video/") {
                    return Err(ApiError::UnsupportedMediaType {
                        got: if declared.is_empty() {
                            "no content type".to_string()
                        } else {
                            declared
                        },
                    });
                }

                let original_name = field.file_name().unwrap_or("video.mp4").to_string();
                let mut data = Vec::new();
                while let Some(chunk) = field.chunk().await.map_err(map_err)? {
                    data.extend_from_slice(&chunk);
                }
                file = Some((original_name, data));
            }
            _ => {
                // Drain unknown fields so the parser can advance
                while field.chunk().await.map_err(map_err)?.is_some() {}
            }
        }
    }

    let (original_name, bytes) = file.ok_or(ApiError::MissingFile)?;

    let stored_filename = state.assigner.assign(title.as_deref(), &original_name);
    storage::ensure_ready(&state.config.upload_dir).await?;
    let size_bytes = storage::write_file(
        &state.config.upload_dir.join(&stored_filename),
        &bytes,
    )
    .await?;

    let record = VideoRecord {
        id: state.ids.next(),
        title: title.unwrap_or_else(|| naming::file_stem(&original_name)),
        relative_path: format!("/uploads/{}", stored_filename),
        stored_filename,
        size_bytes,
        uploaded_at: DateTime::<Utc>::from_timestamp_millis(state.clock.now_millis() as i64)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    };
    state.catalog.append(record.clone()).await;

    info!(
        "[POST /upload] 📁 {} -> {} ({} bytes)",
        original_name, record.stored_filename, record.size_bytes
    );

    Ok(Json(record))
}

/// List every cataloged video in upload order.
pub async fn list_videos_handler(State(state): State<Arc<AppState>>) -> Json<Vec<VideoRecord>> {
    Json(state.catalog.list_all().await)
}

/// Look up a single record by id.
pub async fn get_video_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<VideoRecord>, ApiError> {
    state
        .catalog
        .find_by_id(&id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}
