//! Rendering error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The fillable template does not exist.
    #[error("Form template not found: {path}")]
    TemplateMissing { path: PathBuf },

    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// lopdf failed to read, write or navigate the document.
    #[error("PDF error while trying to {operation}")]
    Pdf {
        operation: &'static str,
        #[source]
        source: lopdf::Error,
    },

    /// The document structure is not what a fillable form should contain.
    #[error("Malformed form: {reason}")]
    MalformedForm { reason: String },

    #[error("Form has no field named '{name}'")]
    UnknownField { name: String },

    /// No widget in the button group exports the requested state.
    #[error("Field '{group}' has no option '{token}'")]
    UnknownOption { group: String, token: String },

    #[error("Flattening failed: {reason}")]
    Flatten { reason: String },

    /// The preview rasterizer did not produce an image.
    #[error("Rasterizer '{program}' failed: {reason}")]
    Rasterize { program: String, reason: String },
}

impl RenderError {
    pub(crate) fn pdf(operation: &'static str) -> impl FnOnce(lopdf::Error) -> RenderError {
        move |source| RenderError::Pdf { operation, source }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RenderError::MalformedForm {
            reason: reason.into(),
        }
    }
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
