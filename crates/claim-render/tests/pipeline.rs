//! Tests for the render pipeline against a scripted in-memory backend.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use claim_fields::{CheckboxGroup, FieldProjection, SelectionToken, project};
use claim_render::{
    FlattenOutcome, FlattenStrategy, FormBackend, RenderError, RenderPipeline, RenderState,
    Result,
};
use claim_synth::{GeneratorOptions, RecordAssembler};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

const TEMPLATE_BYTES: &[u8] = b"%scripted-template";

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemoryForm {
    text: BTreeMap<String, String>,
    selections: BTreeMap<String, String>,
    flattened: bool,
    #[serde(skip)]
    reloaded: bool,
}

#[derive(Debug, Default)]
struct ScriptedBackend {
    fields: BTreeSet<String>,
    groups: BTreeSet<String>,
    failing_fields: BTreeSet<String>,
    fail_reload_flatten: bool,
    fail_direct_flatten: bool,
}

impl ScriptedBackend {
    fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|name| (*name).to_string()).collect(),
            groups: CheckboxGroup::ALL
                .iter()
                .map(|group| group.form_field().to_string())
                .collect(),
            ..Self::default()
        }
    }
}

impl FormBackend for ScriptedBackend {
    type Form = MemoryForm;

    fn load(&self, path: &Path) -> Result<MemoryForm> {
        let bytes = fs::read(path).map_err(|source| RenderError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source,
        })?;
        if bytes == TEMPLATE_BYTES {
            return Ok(MemoryForm::default());
        }
        let mut form: MemoryForm =
            serde_json::from_slice(&bytes).map_err(|error| RenderError::MalformedForm {
                reason: error.to_string(),
            })?;
        form.reloaded = true;
        Ok(form)
    }

    fn field_names(&self, _form: &MemoryForm) -> BTreeSet<String> {
        self.fields.union(&self.groups).cloned().collect()
    }

    fn set_text_field(&self, form: &mut MemoryForm, field: &str, value: &str) -> Result<()> {
        if self.failing_fields.contains(field) {
            return Err(RenderError::MalformedForm {
                reason: format!("widget of '{field}' has no rectangle"),
            });
        }
        form.text.insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn set_selection_field(
        &self,
        form: &mut MemoryForm,
        field: &str,
        token: &SelectionToken,
    ) -> Result<()> {
        if !self.groups.contains(field) {
            return Err(RenderError::UnknownField {
                name: field.to_string(),
            });
        }
        form.selections
            .insert(field.to_string(), token.as_str().to_string());
        Ok(())
    }

    fn flatten(&self, form: &mut MemoryForm) -> Result<()> {
        let fail = if form.reloaded {
            self.fail_reload_flatten
        } else {
            self.fail_direct_flatten
        };
        if fail {
            return Err(RenderError::Flatten {
                reason: "scripted failure".to_string(),
            });
        }
        form.flattened = true;
        Ok(())
    }

    fn write(&self, form: &MemoryForm, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(form).map_err(|error| RenderError::MalformedForm {
            reason: error.to_string(),
        })?;
        fs::write(path, bytes).map_err(|source| RenderError::Io {
            operation: "write",
            path: path.to_path_buf(),
            source,
        })
    }
}

struct Fixture {
    dir: TempDir,
    projection: FieldProjection,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("template.pdf"), TEMPLATE_BYTES).expect("template");
        fs::create_dir(dir.path().join("scratch")).expect("scratch dir");
        let record = RecordAssembler::new(
            GeneratorOptions::new()
                .with_seed(12)
                .with_reference_date(NaiveDate::from_ymd_opt(2024, 6, 15).expect("date")),
        )
        .assemble();
        Self {
            dir,
            projection: project(&record),
        }
    }

    fn pipeline(&self, backend: ScriptedBackend) -> RenderPipeline<ScriptedBackend> {
        RenderPipeline::new(backend, self.dir.path().join("template.pdf"))
            .expect("template exists")
            .with_scratch_dir(self.dir.path().join("scratch"))
    }

    fn output(&self) -> std::path::PathBuf {
        self.dir.path().join("cms1500_form_0001.pdf")
    }

    fn persisted(&self) -> MemoryForm {
        let bytes = fs::read(self.output()).expect("output written");
        serde_json::from_slice(&bytes).expect("valid output")
    }

    fn scratch_is_empty(&self) -> bool {
        fs::read_dir(self.dir.path().join("scratch"))
            .expect("scratch dir")
            .next()
            .is_none()
    }
}

#[test]
fn missing_template_fails_before_rendering() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = RenderPipeline::new(ScriptedBackend::default(), dir.path().join("absent.pdf"));
    assert!(matches!(result, Err(RenderError::TemplateMissing { .. })));
}

#[test]
fn reload_strategy_is_tried_first() {
    let fixture = Fixture::new();
    let backend = ScriptedBackend::new(&["pt_name", "cpt1", "diagnosis1_description", "unused"]);
    let report = fixture
        .pipeline(backend)
        .render(&fixture.projection, &fixture.output())
        .expect("render");

    assert_eq!(
        report.states,
        vec![
            RenderState::Start,
            RenderState::TextFilled,
            RenderState::SelectionsApplied,
            RenderState::FlattenedViaReload,
            RenderState::Persisted,
        ]
    );
    assert_eq!(
        report.flatten,
        FlattenOutcome::Flattened(FlattenStrategy::ReloadThenFlatten)
    );
    assert!(!report.is_degraded());

    let form = fixture.persisted();
    assert!(form.flattened);
    let written: Vec<&str> = form.text.keys().map(String::as_str).collect();
    assert_eq!(written, vec!["cpt1", "pt_name"]);
    assert_eq!(form.selections.len(), CheckboxGroup::ALL.len());
    assert!(fixture.scratch_is_empty());
}

#[test]
fn direct_flatten_follows_failed_reload() {
    let fixture = Fixture::new();
    let backend = ScriptedBackend {
        fail_reload_flatten: true,
        ..ScriptedBackend::new(&["pt_name"])
    };
    let report = fixture
        .pipeline(backend)
        .render(&fixture.projection, &fixture.output())
        .expect("render");

    assert_eq!(report.flatten, FlattenOutcome::Flattened(FlattenStrategy::Direct));
    assert_eq!(report.flatten_failures.len(), 1);
    assert!(report.states.contains(&RenderState::FlattenedDirect));
    assert!(fixture.persisted().flattened);
    assert!(fixture.scratch_is_empty());
}

#[test]
fn form_is_persisted_when_every_flatten_fails() {
    let fixture = Fixture::new();
    let backend = ScriptedBackend {
        fail_reload_flatten: true,
        fail_direct_flatten: true,
        ..ScriptedBackend::new(&["pt_name"])
    };
    let report = fixture
        .pipeline(backend)
        .render(&fixture.projection, &fixture.output())
        .expect("render still succeeds");

    assert_eq!(report.flatten, FlattenOutcome::Unflattened);
    assert_eq!(report.flatten_failures.len(), 2);
    assert_eq!(
        report.states[report.states.len() - 2..],
        [RenderState::Unflattened, RenderState::Persisted]
    );
    assert!(report.is_degraded());

    let form = fixture.persisted();
    assert!(!form.flattened);
    assert!(form.text.contains_key("pt_name"));
    assert!(fs::metadata(fixture.output()).expect("output").len() > 0);
    assert!(fixture.scratch_is_empty());
}

#[test]
fn selection_failures_are_collected_not_fatal() {
    let fixture = Fixture::new();
    let mut backend = ScriptedBackend::new(&["pt_name"]);
    backend.groups.remove("ssn");
    backend.groups.remove("lab");
    let report = fixture
        .pipeline(backend)
        .render(&fixture.projection, &fixture.output())
        .expect("render");

    let failed: BTreeSet<CheckboxGroup> = report
        .selection_failures
        .iter()
        .map(|failure| failure.group)
        .collect();
    assert_eq!(
        failed,
        BTreeSet::from([CheckboxGroup::TaxIdType, CheckboxGroup::OutsideLab])
    );
    assert_eq!(
        fixture.persisted().selections.len(),
        CheckboxGroup::ALL.len() - 2
    );
}

#[test]
fn text_failures_are_collected_not_fatal() {
    let fixture = Fixture::new();
    let backend = ScriptedBackend {
        failing_fields: BTreeSet::from(["pt_name".to_string()]),
        ..ScriptedBackend::new(&["pt_name", "cpt1"])
    };
    let report = fixture
        .pipeline(backend)
        .render(&fixture.projection, &fixture.output())
        .expect("render still succeeds");

    assert_eq!(
        report.states,
        vec![
            RenderState::Start,
            RenderState::TextFilled,
            RenderState::SelectionsApplied,
            RenderState::FlattenedViaReload,
            RenderState::Persisted,
        ]
    );
    assert_eq!(report.text_fields_written, 1);
    assert_eq!(report.text_failures.len(), 1);
    assert_eq!(report.text_failures[0].field, "pt_name");
    assert!(report.is_degraded());

    let form = fixture.persisted();
    assert!(form.flattened);
    assert!(form.text.contains_key("cpt1"));
    assert!(!form.text.contains_key("pt_name"));
    assert_eq!(form.selections.len(), CheckboxGroup::ALL.len());
}

#[test]
fn empty_strategy_chain_leaves_form_interactive() {
    let fixture = Fixture::new();
    let report = fixture
        .pipeline(ScriptedBackend::new(&["pt_name"]))
        .with_strategies(Vec::<FlattenStrategy>::new())
        .render(&fixture.projection, &fixture.output())
        .expect("render");
    assert_eq!(report.flatten, FlattenOutcome::Unflattened);
    assert!(report.flatten_failures.is_empty());
}
