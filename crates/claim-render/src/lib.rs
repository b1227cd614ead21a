//! Rendering field projections into fillable CMS-1500 PDF forms.
//!
//! [`RenderPipeline`] drives any [`FormBackend`]; [`AcroFormBackend`] is the
//! `lopdf` implementation used for real templates.

pub mod acroform;
pub mod backend;
pub mod error;
pub mod pipeline;
pub mod raster;

pub use acroform::{AcroFormBackend, FieldType, PdfForm};
pub use backend::{FormBackend, SelectionFailure, TextFailure, TextFill};
pub use error::{RenderError, Result};
pub use pipeline::{
    FlattenFailure, FlattenOutcome, FlattenStrategy, RenderPipeline, RenderReport, RenderState,
};
pub use raster::{PdftoppmRasterizer, Rasterizer, render_preview};
