//! Projection of claim records onto CMS-1500 form field names.
//!
//! [`project`] turns a [`claim_model::ClaimRecord`] into a
//! [`FieldProjection`]: every [`FieldKey`] under its canonical and legacy
//! names, plus the button selections for each [`CheckboxGroup`].

pub mod checkbox;
pub mod key;
pub mod projection;
pub mod value;

pub use checkbox::{CheckboxGroup, SelectionToken};
pub use key::{CATALOG_VERSION, DatePart, FieldKey, FieldKind, NamingScheme, RangeEnd};
pub use projection::{FieldProjection, INSURED_SIGNATURE_ON_FILE, lookup, project};
pub use value::FieldValue;
