//! Writing output documents.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use claim_fields::FieldProjection;
use serde::Serialize;

use crate::documents::{BatchDocument, BatchEntry, CoreDocument, FormDocument};
use crate::error::{OutputError, Result};
use crate::layout::{FormFiles, OutputLayout};

/// Pretty-print `value` as JSON at `path`.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// half-written document behind.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|source| OutputError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
    bytes.push(b'\n');

    let temp_path = path.with_extension("json.tmp");
    let mut file = File::create(&temp_path).map_err(|source| OutputError::Io {
        operation: "create",
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(&bytes).map_err(|source| OutputError::Io {
        operation: "write",
        path: temp_path.clone(),
        source,
    })?;
    file.sync_all().map_err(|source| OutputError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| OutputError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote document");
    Ok(())
}

/// Writes the full and core documents for one form and returns its entry
/// for the batch aggregate.
pub fn write_form_documents(
    layout: &OutputLayout,
    files: &FormFiles,
    has_preview: bool,
    generated: DateTime<Utc>,
    projection: &FieldProjection,
) -> Result<BatchEntry> {
    let full = FormDocument::new(files, has_preview, generated, projection);
    write_json(&layout.path(&files.json), &full)?;
    let core = CoreDocument::new(files, has_preview, generated, projection);
    write_json(&layout.path(&files.core_json), &core)?;
    Ok(BatchEntry::from_document(&full, files))
}

/// Writes `forms_data.json` and returns its path.
pub fn write_batch_document(
    layout: &OutputLayout,
    generated: DateTime<Utc>,
    forms: Vec<BatchEntry>,
) -> Result<std::path::PathBuf> {
    let path = layout.aggregate_path();
    write_json(&path, &BatchDocument::new(generated, forms))?;
    Ok(path)
}
