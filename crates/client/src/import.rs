//! Two-phase spreadsheet import.
//!
//! Phase one ([`ImportPipeline::begin`]) gates the file locally, sends
//! it for server-side parsing, and opens an [`ImportSession`] holding
//! the proposed folder, the inferred schema, and the original file
//! bytes. The user reviews and edits the session; phase two
//! ([`ImportPipeline::confirm`]) re-submits the file together with the
//! edited metadata, because the server keeps nothing between phases.
//!
//! The session lives entirely in memory. Dropping it cancels the import
//! with no server interaction; a failed confirm hands it back intact so
//! the user can retry without re-selecting the file.

use std::fmt;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use thiserror::Error;

use satchel_core::import::{
    check_upload, confirm_label, mime_for, parse_summary, preview_caption, remaining_note,
    ImportOutcome, ImportPreview,
};
use satchel_core::model::RecordData;
use satchel_core::schema::{validate_schema, Schema, SchemaValidation};

use crate::collections::CollectionStore;
use crate::error::{ApiError, ApiResult};
use crate::http::ApiTransport;
use crate::notify::Notifier;

/// The file as selected, kept around for the confirm re-upload.
struct SourceFile {
    name: String,
    bytes: Vec<u8>,
}

impl SourceFile {
    fn part(&self) -> Part {
        let part = Part::bytes(self.bytes.clone()).file_name(self.name.clone());
        match part.mime_str(mime_for(&self.name)) {
            Ok(part) => part,
            Err(_) => Part::bytes(self.bytes.clone()).file_name(self.name.clone()),
        }
    }
}

/// Drives the two import endpoints.
pub struct ImportPipeline {
    transport: Arc<ApiTransport>,
    notifier: Arc<dyn Notifier>,
}

impl ImportPipeline {
    pub(crate) fn new(transport: Arc<ApiTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
        }
    }

    /// Gate the file locally, then ask the server to parse it.
    ///
    /// Gate rejections never touch the network. A preview failure
    /// leaves nothing behind; there is no session to clean up.
    pub async fn begin(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<ImportSession> {
        if let Err(gate) = check_upload(file_name, bytes.len() as u64) {
            self.notifier.error(&gate.to_string());
            return Err(ApiError::InvalidUpload(gate));
        }

        let file = SourceFile {
            name: file_name.to_string(),
            bytes,
        };

        let preview: ImportPreview = match self
            .transport
            .post_multipart("/import/preview", || Form::new().part("file", file.part()))
            .await
        {
            Ok(preview) => preview,
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to process file"));
                return Err(err);
            }
        };

        Ok(ImportSession::new(file, preview))
    }

    /// Commit the reviewed session.
    ///
    /// On success the session is consumed, the server's summary message
    /// is surfaced, and the collection list is refreshed so the new
    /// folder appears with its record count (a refresh failure notifies
    /// on its own and does not undo the import). On failure the session
    /// comes back inside [`ConfirmFailure`] for a retry.
    ///
    /// Pre-flight validation failures (blank folder name, label issues)
    /// return without a network call and without notifying, as the review
    /// UI already shows those inline via [`ImportSession::validation`].
    pub async fn confirm(
        &self,
        session: ImportSession,
        store: &CollectionStore,
    ) -> Result<ImportOutcome, ConfirmFailure> {
        if !session.folder_name_present() {
            return Err(ConfirmFailure::rejected(session, "Folder name is required"));
        }
        if !session.validation().is_valid() {
            return Err(ConfirmFailure::rejected(
                session,
                "Column labels need attention",
            ));
        }

        let schema_json = match serde_json::to_string(session.schema()) {
            Ok(json) => json,
            Err(err) => {
                let message = format!("schema did not serialize: {err}");
                return Err(ConfirmFailure::rejected(session, &message));
            }
        };

        let result: ApiResult<ImportOutcome> = self
            .transport
            .post_multipart("/import/upload", || {
                Form::new()
                    .text("folder_name", session.folder_name.clone())
                    .text("description", session.description.clone())
                    .text("schema", schema_json.clone())
                    .part("file", session.file.part())
            })
            .await;

        match result {
            Ok(outcome) => {
                self.notifier.success(&outcome.message);
                let _ = store.fetch_collections().await;
                Ok(outcome)
            }
            Err(error) => {
                self.notifier
                    .error(&error.user_message("Failed to import file"));
                Err(ConfirmFailure { error, session })
            }
        }
    }
}

/// A parsed file under review, plus everything needed to commit it.
pub struct ImportSession {
    file: SourceFile,
    folder_name: String,
    description: String,
    schema: Schema,
    preview_rows: Vec<RecordData>,
    total_rows: u64,
    total_columns: u64,
}

impl ImportSession {
    fn new(file: SourceFile, preview: ImportPreview) -> Self {
        Self {
            file,
            folder_name: preview.folder_name,
            description: String::new(),
            schema: preview.schema,
            preview_rows: preview.preview,
            total_rows: preview.total_rows,
            total_columns: preview.total_columns,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file.name
    }

    /// Proposed folder name; starts as the server's suggestion derived
    /// from the file name.
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    pub fn set_folder_name(&mut self, name: impl Into<String>) {
        self.folder_name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// The schema as currently edited.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Change a column's display label. Field names, types, and order
    /// are fixed by the server's parse and cannot be edited here.
    pub fn rename_label(&mut self, field_name: &str, new_label: impl Into<String>) -> bool {
        self.schema.rename_label(field_name, new_label)
    }

    /// Label validity right now. Recomputed on every call, cheap
    /// enough to run per keystroke, which is exactly how review UIs
    /// use it.
    pub fn validation(&self) -> SchemaValidation {
        validate_schema(&self.schema)
    }

    pub fn folder_name_present(&self) -> bool {
        !self.folder_name.trim().is_empty()
    }

    /// Whether [`ImportPipeline::confirm`] would pass pre-flight.
    pub fn can_confirm(&self) -> bool {
        self.folder_name_present() && self.validation().is_valid()
    }

    /// Sample rows the server parsed for display.
    pub fn preview_rows(&self) -> &[RecordData] {
        &self.preview_rows
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn total_columns(&self) -> u64 {
        self.total_columns
    }

    /// "Found {rows} rows and {columns} columns"
    pub fn summary(&self) -> String {
        parse_summary(self.total_rows, self.total_columns)
    }

    /// "Showing first {shown} of {total} rows"
    pub fn preview_caption(&self) -> String {
        preview_caption(self.preview_rows.len(), self.total_rows)
    }

    /// "+ {n} more rows will be imported", when the preview is partial.
    pub fn remaining_note(&self) -> Option<String> {
        remaining_note(self.preview_rows.len(), self.total_rows)
    }

    /// "Import {total} Items", always the full row count.
    pub fn confirm_label(&self) -> String {
        confirm_label(self.total_rows)
    }
}

impl fmt::Debug for ImportSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportSession")
            .field("file_name", &self.file.name)
            .field("file_bytes", &self.file.bytes.len())
            .field("folder_name", &self.folder_name)
            .field("total_rows", &self.total_rows)
            .finish()
    }
}

/// A confirm that did not go through, carrying the intact session so
/// the caller can retry or abandon it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ConfirmFailure {
    pub error: ApiError,
    pub session: ImportSession,
}

impl ConfirmFailure {
    fn rejected(session: ImportSession, message: &str) -> Self {
        Self {
            error: ApiError::Validation(message.to_string()),
            session,
        }
    }
}
