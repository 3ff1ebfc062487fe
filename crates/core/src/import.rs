//! Spreadsheet-import rules shared by the pipeline and its UI.
//!
//! The heavy lifting (parsing, type inference) happens server-side; this
//! module owns the client's half: the pre-upload gate, the wire shapes
//! of the two import endpoints, and the captions the review screen
//! shows. Caption wording is load-bearing; tests pin it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::RecordData;
use crate::schema::Schema;
use crate::types::EntityId;

/// File extensions the import endpoints accept, lowercase, without dot.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];

/// Upload ceiling enforced before any bytes leave the client.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// The server previews at most this many rows regardless of file size.
pub const PREVIEW_ROW_LIMIT: usize = 5;

/// Rejection from the client-side upload gate. The messages are shown
/// to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadGateError {
    #[error("Please upload a CSV or Excel (.xlsx) file only.")]
    UnsupportedType,
    #[error("File size must be less than 10MB.")]
    TooLarge,
}

/// Vet a candidate file by name and size, before any network traffic.
///
/// The extension check runs first, so an oversized file of the wrong
/// type reports the type problem.
pub fn check_upload(file_name: &str, size_bytes: u64) -> Result<(), UploadGateError> {
    let supported = extension_of(file_name)
        .map_or(false, |ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
    if !supported {
        return Err(UploadGateError::UnsupportedType);
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadGateError::TooLarge);
    }
    Ok(())
}

/// Lowercased extension after the final dot, if any.
pub fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Content type for the multipart file part.
pub fn mime_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("csv") => "text/csv",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// Response of `POST /import/preview`: the server's parse of the file.
///
/// `schema` carries inferred types and prettified labels; `preview`
/// holds at most [`PREVIEW_ROW_LIMIT`] rows. `total_rows` counts the
/// whole file, not the preview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportPreview {
    pub folder_name: String,
    pub total_rows: u64,
    pub total_columns: u64,
    pub schema: Schema,
    pub preview: Vec<RecordData>,
}

/// Response of `POST /import/upload`: the committed result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportOutcome {
    pub collection_id: EntityId,
    pub folder_name: String,
    pub items_created: u64,
    pub message: String,
}

// ── Review-screen captions ──────────────────────────────────────────

/// "Found {rows} rows and {columns} columns"
pub fn parse_summary(total_rows: u64, total_columns: u64) -> String {
    format!("Found {total_rows} rows and {total_columns} columns")
}

/// "Showing first {shown} of {total} rows"
pub fn preview_caption(shown: usize, total_rows: u64) -> String {
    format!("Showing first {shown} of {total_rows} rows")
}

/// "+ {n} more rows will be imported", or `None` when the preview
/// already covers the file.
pub fn remaining_note(shown: usize, total_rows: u64) -> Option<String> {
    let remaining = total_rows.saturating_sub(shown as u64);
    if remaining == 0 {
        None
    } else {
        Some(format!("+ {remaining} more rows will be imported"))
    }
}

/// Label for the confirm control: "Import {total} Items", always the
/// full row count, never the preview size.
pub fn confirm_label(total_rows: u64) -> String {
    format!("Import {total_rows} Items")
}
