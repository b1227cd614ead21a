//! Turning a field projection into a persisted form.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use claim_fields::FieldProjection;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::backend::{FormBackend, SelectionFailure, TextFailure};
use crate::error::{RenderError, Result};

/// Stages a render passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Start,
    TextFilled,
    SelectionsApplied,
    FlattenedViaReload,
    FlattenedDirect,
    Unflattened,
    Persisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenStrategy {
    /// Write a transient copy, reload it and flatten the reloaded form.
    ReloadThenFlatten,
    /// Flatten the in-memory form.
    Direct,
}

impl FlattenStrategy {
    pub const DEFAULT_CHAIN: [FlattenStrategy; 2] =
        [FlattenStrategy::ReloadThenFlatten, FlattenStrategy::Direct];

    pub fn label(self) -> &'static str {
        match self {
            FlattenStrategy::ReloadThenFlatten => "reload",
            FlattenStrategy::Direct => "direct",
        }
    }

    fn state(self) -> RenderState {
        match self {
            FlattenStrategy::ReloadThenFlatten => RenderState::FlattenedViaReload,
            FlattenStrategy::Direct => RenderState::FlattenedDirect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenOutcome {
    Flattened(FlattenStrategy),
    /// Every strategy failed; the form was persisted interactive.
    Unflattened,
}

impl FlattenOutcome {
    pub fn is_flattened(self) -> bool {
        matches!(self, FlattenOutcome::Flattened(_))
    }

    pub fn label(self) -> &'static str {
        match self {
            FlattenOutcome::Flattened(strategy) => strategy.label(),
            FlattenOutcome::Unflattened => "unflattened",
        }
    }
}

impl fmt::Display for FlattenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug)]
pub struct FlattenFailure {
    pub strategy: FlattenStrategy,
    pub error: RenderError,
}

/// What happened while rendering one record.
#[derive(Debug)]
pub struct RenderReport {
    pub output: PathBuf,
    pub text_fields_written: usize,
    pub text_failures: Vec<TextFailure>,
    pub selection_failures: Vec<SelectionFailure>,
    pub flatten: FlattenOutcome,
    pub flatten_failures: Vec<FlattenFailure>,
    pub states: Vec<RenderState>,
}

impl RenderReport {
    /// True when the form was persisted but something was skipped.
    pub fn is_degraded(&self) -> bool {
        !self.text_failures.is_empty()
            || !self.selection_failures.is_empty()
            || !self.flatten.is_flattened()
    }
}

/// Fills a template with projections and persists the result.
///
/// The template is checked once, when the pipeline is built, so a batch
/// fails before generating anything.
#[derive(Debug)]
pub struct RenderPipeline<B> {
    backend: B,
    template: PathBuf,
    strategies: Vec<FlattenStrategy>,
    scratch_dir: Option<PathBuf>,
}

impl<B: FormBackend> RenderPipeline<B> {
    pub fn new(backend: B, template: impl Into<PathBuf>) -> Result<Self> {
        let template = template.into();
        if !template.is_file() {
            return Err(RenderError::TemplateMissing { path: template });
        }
        Ok(Self {
            backend,
            template,
            strategies: FlattenStrategy::DEFAULT_CHAIN.to_vec(),
            scratch_dir: None,
        })
    }

    /// Replace the flatten fallback chain. An empty chain never flattens.
    #[must_use]
    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = FlattenStrategy>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }

    /// Directory for transient reload copies (system temp dir by default).
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Render one projection to `output`.
    ///
    /// Text, selection and flatten failures degrade the result but never
    /// abort it; the form is written in every case. Only loading the
    /// template and persisting the output are fatal.
    pub fn render(&self, projection: &FieldProjection, output: &Path) -> Result<RenderReport> {
        let start = Instant::now();
        let mut states = vec![RenderState::Start];
        let mut form = self.backend.load(&self.template)?;

        let names = self.backend.field_names(&form);
        let text: BTreeMap<String, String> = projection
            .text_fields()
            .filter(|(name, _)| names.contains(*name))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let fill = self.backend.set_text_fields(&mut form, &text);
        for failure in &fill.failures {
            warn!(
                field = %failure.field,
                error = %failure.error,
                "could not set text field"
            );
        }
        states.push(RenderState::TextFilled);

        let selection_failures = self
            .backend
            .set_selection_fields(&mut form, projection.selections());
        for failure in &selection_failures {
            warn!(
                field = failure.group.form_field(),
                token = %failure.token,
                error = %failure.error,
                "could not set selection"
            );
        }
        states.push(RenderState::SelectionsApplied);

        let (flatten, flatten_failures) = self.flatten(&mut form);
        states.push(match flatten {
            FlattenOutcome::Flattened(strategy) => strategy.state(),
            FlattenOutcome::Unflattened => RenderState::Unflattened,
        });

        self.backend.write(&form, output)?;
        states.push(RenderState::Persisted);

        info!(
            output = %output.display(),
            text_fields = fill.written,
            text_failures = fill.failures.len(),
            selection_failures = selection_failures.len(),
            flatten = flatten.label(),
            duration_ms = start.elapsed().as_millis(),
            "rendered form"
        );
        Ok(RenderReport {
            output: output.to_path_buf(),
            text_fields_written: fill.written,
            text_failures: fill.failures,
            selection_failures,
            flatten,
            flatten_failures,
            states,
        })
    }

    fn flatten(&self, form: &mut B::Form) -> (FlattenOutcome, Vec<FlattenFailure>) {
        let mut failures = Vec::new();
        for &strategy in &self.strategies {
            let attempt = match strategy {
                FlattenStrategy::ReloadThenFlatten => self.flatten_via_reload(form),
                FlattenStrategy::Direct => self.backend.flatten(form),
            };
            match attempt {
                Ok(()) => return (FlattenOutcome::Flattened(strategy), failures),
                Err(error) => {
                    warn!(strategy = strategy.label(), error = %error, "flatten strategy failed");
                    failures.push(FlattenFailure { strategy, error });
                }
            }
        }
        if !self.strategies.is_empty() {
            warn!("no flatten strategy succeeded, keeping form fields interactive");
        }
        (FlattenOutcome::Unflattened, failures)
    }

    fn flatten_via_reload(&self, form: &mut B::Form) -> Result<()> {
        // Removed when dropped, whichever way this returns.
        let scratch = self.scratch_file()?;
        self.backend.write(form, scratch.path())?;
        let mut reloaded = self.backend.load(scratch.path())?;
        self.backend.flatten(&mut reloaded)?;
        *form = reloaded;
        Ok(())
    }

    fn scratch_file(&self) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("cms1500-flatten-").suffix(".pdf");
        match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir).map_err(|source| RenderError::Io {
                operation: "create scratch",
                path: dir.clone(),
                source,
            }),
            None => builder.tempfile().map_err(|source| RenderError::Io {
                operation: "create scratch",
                path: std::env::temp_dir(),
                source,
            }),
        }
    }
}
