//! JSON documents describing generated forms: a full field dump and a core
//! subset per form, plus one aggregate per batch.

pub mod documents;
pub mod error;
pub mod layout;
pub mod writer;

pub use documents::{
    BATCH_DESCRIPTION, BatchDocument, BatchEntry, BatchMetadata, CoreDocument, CoreSubset,
    CoreSummary, FormDocument,
};
pub use error::{OutputError, Result};
pub use layout::{AGGREGATE_FILENAME, FormFiles, OutputLayout, form_stem};
pub use writer::{write_batch_document, write_form_documents, write_json};
