//! Spreadsheet upload passthrough.
//!
//! The browser posts the same multipart form the upstream ingestion endpoint
//! expects (`dataType`, `file`, `fileName`); this handler relays it and
//! translates the outcome. No spreadsheet parsing happens here.

use axum::extract::{Multipart, State};
use axum::response::Json;

use crate::state::AppState;
use crate::upstream::UploadKind;
use crate::view::upload::UploadReport;
use crate::web::error::{ApiError, upstream_error};

/// `POST /api/upload`
pub(super) async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadReport>, ApiError> {
    let mut kind: Option<UploadKind> = None;
    let mut explicit_name: Option<String> = None;
    let mut file: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("dataType") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("unreadable dataType: {e}")))?;
                kind = Some(match raw.as_str() {
                    "schedule" => UploadKind::Schedule,
                    "classroom" => UploadKind::Classroom,
                    other => {
                        return Err(ApiError::bad_request(format!(
                            "unknown dataType {other:?}, expected schedule or classroom"
                        )));
                    }
                });
            }
            Some("fileName") => {
                explicit_name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("unreadable fileName: {e}")))?,
                );
            }
            Some("file") => {
                let name = field.file_name().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("unreadable file: {e}")))?;
                file = Some((name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| ApiError::bad_request("missing dataType field"))?;
    let (part_name, bytes) = file.ok_or_else(|| ApiError::bad_request("missing file field"))?;
    let file_name = explicit_name
        .or(part_name)
        .unwrap_or_else(|| "upload.xlsx".to_owned());

    let outcome = state
        .upstream
        .upload(kind, &file_name, bytes)
        .await
        .map_err(|e| upstream_error("Upload relay", e))?;

    Ok(Json(UploadReport::from(outcome)))
}
