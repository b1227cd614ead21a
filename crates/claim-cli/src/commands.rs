use std::io::{self, IsTerminal};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, info_span, warn};

use claim_fields::project;
use claim_output::{BatchEntry, OutputLayout, write_batch_document, write_form_documents};
use claim_render::{
    AcroFormBackend, FormBackend, PdftoppmRasterizer, Rasterizer, RenderPipeline, render_preview,
};
use claim_synth::{GeneratorOptions, RecordAssembler};

use crate::logging::redact_value;
use crate::types::{BatchConfig, BatchResult, FormFailure, FormOutcome};

/// Generate a batch with the lopdf backend and `pdftoppm` previews.
pub fn run_batch(config: &BatchConfig) -> Result<BatchResult> {
    run_batch_with(config, AcroFormBackend::new(), &PdftoppmRasterizer::new())
}

/// Generate `config.count` forms.
///
/// The template is checked before any record is generated and is the only
/// per-run check that aborts the batch. Field, flatten and preview problems
/// are logged and the form still counts. A form that fails outright is
/// recorded in [`BatchResult::failed`], left out of the aggregate, and the
/// batch moves on to the next record.
pub fn run_batch_with<B, R>(config: &BatchConfig, backend: B, rasterizer: &R) -> Result<BatchResult>
where
    B: FormBackend,
    R: Rasterizer + ?Sized,
{
    let batch_span = info_span!(
        "batch",
        count = config.count,
        output_dir = %config.output_dir.display()
    );
    let _batch_guard = batch_span.enter();
    let batch_start = Instant::now();

    let pipeline = RenderPipeline::new(backend, &config.template)?;
    let layout = OutputLayout::new(&config.output_dir);
    layout.ensure_dir().context("prepare output directory")?;

    let mut options = GeneratorOptions::new();
    if let Some(seed) = config.seed {
        options = options.with_seed(seed);
    }
    if let Some(date) = config.reference_date {
        options = options.with_reference_date(date);
    }
    let mut assembler = RecordAssembler::new(options);
    info!(
        seed = assembler.seed(),
        reference_date = %assembler.reference_date(),
        template = %config.template.display(),
        "starting batch"
    );

    let progress = progress_bar(config.count);
    let mut forms = Vec::new();
    let mut entries = Vec::new();
    let mut failed = Vec::new();
    for form_number in 1..=config.count {
        let record_span = info_span!("record", form_number);
        let generated = record_span.in_scope(|| {
            generate_form(
                &pipeline,
                &layout,
                config,
                rasterizer,
                &mut assembler,
                form_number,
            )
        });
        progress.set_message(format!("form {form_number}"));
        progress.inc(1);
        match generated {
            Ok((outcome, entry)) => {
                forms.push(outcome);
                entries.push(entry);
            }
            Err(failure) => {
                let message = format!("{failure:#}");
                error!(form_number, error = %message, "form failed");
                failed.push(FormFailure {
                    form_number,
                    error: message,
                });
            }
        }
    }
    progress.finish_and_clear();

    let aggregate = write_batch_document(&layout, Utc::now(), entries)
        .context("write batch aggregate")?;
    let degraded = forms.iter().filter(|form| form.is_degraded()).count();
    if degraded > 0 {
        warn!(degraded, "some forms have skipped fields or were left unflattened");
    }
    info!(
        forms = forms.len(),
        failed = failed.len(),
        degraded,
        aggregate = %aggregate.display(),
        duration_ms = batch_start.elapsed().as_millis(),
        "batch complete"
    );

    Ok(BatchResult {
        output_dir: config.output_dir.clone(),
        seed: assembler.seed(),
        aggregate,
        forms,
        failed,
    })
}

fn generate_form<B, R>(
    pipeline: &RenderPipeline<B>,
    layout: &OutputLayout,
    config: &BatchConfig,
    rasterizer: &R,
    assembler: &mut RecordAssembler,
    form_number: u32,
) -> Result<(FormOutcome, BatchEntry)>
where
    B: FormBackend,
    R: Rasterizer + ?Sized,
{
    let start = Instant::now();
    let record = assembler.assemble();
    debug!(
        patient = redact_value(&record.patient.name),
        diagnoses = record.num_diagnoses(),
        service_lines = record.num_service_lines(),
        "assembled record"
    );
    let projection = project(&record);

    let files = layout.files(form_number);
    let pdf = layout.path(&files.pdf);
    let report = pipeline
        .render(&projection, &pdf)
        .with_context(|| format!("render form {form_number}"))?;

    let preview = if config.preview {
        render_preview(rasterizer, &pdf, &layout.path(&files.png), config.dpi)
    } else {
        None
    };

    let entry = write_form_documents(layout, &files, preview.is_some(), Utc::now(), &projection)
        .with_context(|| format!("write documents for form {form_number}"))?;

    info!(
        pdf = %pdf.display(),
        flatten = report.flatten.label(),
        preview = preview.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "form generated"
    );

    let outcome = FormOutcome {
        form_number,
        patient_name: record.patient.name.clone(),
        coverage: record.coverage.category.as_str().to_string(),
        diagnoses: record.num_diagnoses(),
        procedures: record.num_service_lines(),
        total_charge: record.financials.total_charge,
        pdf,
        preview,
        flatten: report.flatten,
        text_failures: report.text_failures.len(),
        selection_failures: report.selection_failures.len(),
    };
    Ok((outcome, entry))
}

/// A bar on an interactive stderr, hidden otherwise.
fn progress_bar(count: u32) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(u64::from(count));
    progress.set_prefix("Forms");
    if let Ok(style) = ProgressStyle::with_template(
        "{prefix:.bold} [{elapsed_precise}] [{bar:32.cyan/blue}] {pos}/{len} {msg}",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }
    progress
}
