use std::path::PathBuf;

use chrono::NaiveDate;
use claim_model::Dollars;
use claim_render::FlattenOutcome;

pub const DEFAULT_TEMPLATE: &str = "form-cms1500.pdf";
pub const DEFAULT_OUTPUT_DIR: &str = "output_forms";
pub const DEFAULT_DPI: u32 = 300;

/// Everything one batch run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub count: u32,
    pub template: PathBuf,
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
    /// "Today" for generated dates; the local date when `None`.
    pub reference_date: Option<NaiveDate>,
    pub dpi: u32,
    pub preview: bool,
}

impl BatchConfig {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            template: PathBuf::from(DEFAULT_TEMPLATE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            seed: None,
            reference_date: None,
            dpi: DEFAULT_DPI,
            preview: true,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = template.into();
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_preview(mut self, enable: bool) -> Self {
        self.preview = enable;
        self
    }
}

#[derive(Debug)]
pub struct FormOutcome {
    pub form_number: u32,
    pub patient_name: String,
    pub coverage: String,
    pub diagnoses: usize,
    pub procedures: usize,
    pub total_charge: Dollars,
    pub pdf: PathBuf,
    pub preview: Option<PathBuf>,
    pub flatten: FlattenOutcome,
    pub text_failures: usize,
    pub selection_failures: usize,
}

impl FormOutcome {
    pub fn is_degraded(&self) -> bool {
        self.text_failures > 0 || self.selection_failures > 0 || !self.flatten.is_flattened()
    }
}

/// A form that could not be produced; the batch moved on without it.
#[derive(Debug)]
pub struct FormFailure {
    pub form_number: u32,
    pub error: String,
}

#[derive(Debug)]
pub struct BatchResult {
    pub output_dir: PathBuf,
    pub seed: u64,
    pub aggregate: PathBuf,
    pub forms: Vec<FormOutcome>,
    pub failed: Vec<FormFailure>,
}

impl BatchResult {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn degraded_count(&self) -> usize {
        self.forms.iter().filter(|form| form.is_degraded()).count()
    }
}
