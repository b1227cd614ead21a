//! The seam between the render pipeline and a concrete form library.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use claim_fields::{CheckboxGroup, SelectionToken};

use crate::error::{RenderError, Result};

/// A button group that could not be set.
#[derive(Debug)]
pub struct SelectionFailure {
    pub group: CheckboxGroup,
    pub token: SelectionToken,
    pub error: RenderError,
}

/// A text field that could not be written.
#[derive(Debug)]
pub struct TextFailure {
    pub field: String,
    pub error: RenderError,
}

/// Result of a text pass: fields written plus the ones that failed.
#[derive(Debug, Default)]
pub struct TextFill {
    pub written: usize,
    pub failures: Vec<TextFailure>,
}

/// Operations the pipeline needs from a fillable-form library.
pub trait FormBackend {
    /// An open, mutable form document.
    type Form;

    fn load(&self, path: &Path) -> Result<Self::Form>;

    /// Fully-qualified names of every terminal field in the form.
    fn field_names(&self, form: &Self::Form) -> BTreeSet<String>;

    fn set_text_field(&self, form: &mut Self::Form, field: &str, value: &str) -> Result<()>;

    /// Writes every text value independently; a failing field is reported
    /// and the rest are still written.
    fn set_text_fields(&self, form: &mut Self::Form, fields: &BTreeMap<String, String>) -> TextFill {
        let mut fill = TextFill::default();
        for (field, value) in fields {
            match self.set_text_field(form, field, value) {
                Ok(()) => fill.written += 1,
                Err(error) => fill.failures.push(TextFailure {
                    field: field.clone(),
                    error,
                }),
            }
        }
        fill
    }

    fn set_selection_field(
        &self,
        form: &mut Self::Form,
        field: &str,
        token: &SelectionToken,
    ) -> Result<()>;

    /// Sets every group independently. A failing group does not stop the
    /// others; its error is returned instead.
    fn set_selection_fields(
        &self,
        form: &mut Self::Form,
        selections: &BTreeMap<CheckboxGroup, SelectionToken>,
    ) -> Vec<SelectionFailure> {
        selections
            .iter()
            .filter_map(|(group, token)| {
                self.set_selection_field(form, group.form_field(), token)
                    .err()
                    .map(|error| SelectionFailure {
                        group: *group,
                        token: token.clone(),
                        error,
                    })
            })
            .collect()
    }

    /// Bakes field appearances into page content and removes interactivity.
    fn flatten(&self, form: &mut Self::Form) -> Result<()>;

    fn write(&self, form: &Self::Form, path: &Path) -> Result<()>;
}
