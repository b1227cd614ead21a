//! Integration tests for the batch driver.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use claim_cli::commands::run_batch_with;
use claim_cli::types::BatchConfig;
use claim_render::{AcroFormBackend, Rasterizer, RenderError};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use serde_json::Value;

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn rect(x1: i64, y1: i64, x2: i64, y2: i64) -> Object {
    Object::Array(vec![
        Object::Integer(x1),
        Object::Integer(y1),
        Object::Integer(x2),
        Object::Integer(y2),
    ])
}

fn appearance(document: &mut Document) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("Type", name("XObject"));
    dict.set("Subtype", name("Form"));
    dict.set("BBox", rect(0, 0, 12, 12));
    document.add_object(Stream::new(dict, b"0 g 1 1 10 10 re f".to_vec()))
}

fn radio_kid(document: &mut Document, parent: ObjectId, page: ObjectId, state: &str, x: i64) -> ObjectId {
    let on = appearance(document);
    let off = appearance(document);
    let mut states = Dictionary::new();
    states.set(state, Object::Reference(on));
    states.set("Off", Object::Reference(off));
    let mut ap = Dictionary::new();
    ap.set("N", Object::Dictionary(states));

    let mut kid = Dictionary::new();
    kid.set("Type", name("Annot"));
    kid.set("Subtype", name("Widget"));
    kid.set("Parent", Object::Reference(parent));
    kid.set("P", Object::Reference(page));
    kid.set("Rect", rect(x, 600, x + 12, 612));
    kid.set("AP", Object::Dictionary(ap));
    kid.set("AS", name("Off"));
    document.add_object(kid)
}

fn text_field(document: &mut Document, page: ObjectId, field: &str, y: i64) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("FT", name("Tx"));
    dict.set("T", Object::string_literal(field));
    dict.set("Type", name("Annot"));
    dict.set("Subtype", name("Widget"));
    dict.set("Rect", rect(50, y, 250, y + 20));
    dict.set("P", Object::Reference(page));
    document.add_object(dict)
}

/// A one-page template with a few of the real field names.
fn write_template(path: &Path) {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();
    let page_id = document.new_object_id();

    let mut annots = Vec::new();
    let mut fields = Vec::new();
    for (index, field) in ["pt_name", "insurance_id", "cpt1", "tax_id"].into_iter().enumerate() {
        let y = 700 - 30 * i64::try_from(index).expect("small index");
        let id = text_field(&mut document, page_id, field, y);
        annots.push(Object::Reference(id));
        fields.push(Object::Reference(id));
    }

    let radio_id = document.new_object_id();
    let male = radio_kid(&mut document, radio_id, page_id, "M", 300);
    let female = radio_kid(&mut document, radio_id, page_id, "F", 340);
    let mut radio = Dictionary::new();
    radio.set("FT", name("Btn"));
    radio.set("Ff", Object::Integer(49152));
    radio.set("T", Object::string_literal("sex"));
    radio.set(
        "Kids",
        Object::Array(vec![Object::Reference(male), Object::Reference(female)]),
    );
    document.objects.insert(radio_id, Object::Dictionary(radio));
    annots.push(Object::Reference(male));
    annots.push(Object::Reference(female));
    fields.push(Object::Reference(radio_id));

    let content_id = document.add_object(Stream::new(Dictionary::new(), b"BT ET".to_vec()));
    let mut page = Dictionary::new();
    page.set("Type", name("Page"));
    page.set("Parent", Object::Reference(pages_id));
    page.set("MediaBox", rect(0, 0, 612, 792));
    page.set("Contents", Object::Reference(content_id));
    page.set("Resources", Object::Dictionary(Dictionary::new()));
    page.set("Annots", Object::Array(annots));
    document.objects.insert(page_id, Object::Dictionary(page));

    let mut pages = Dictionary::new();
    pages.set("Type", name("Pages"));
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages.set("Count", Object::Integer(1));
    document.objects.insert(pages_id, Object::Dictionary(pages));

    let mut acroform = Dictionary::new();
    acroform.set("Fields", Object::Array(fields));
    let mut catalog = Dictionary::new();
    catalog.set("Type", name("Catalog"));
    catalog.set("Pages", Object::Reference(pages_id));
    catalog.set("AcroForm", Object::Dictionary(acroform));
    let catalog_id = document.add_object(catalog);
    document.trailer.set("Root", Object::Reference(catalog_id));

    document.save(path).expect("save template");
}

/// Writes a placeholder image instead of rasterizing.
struct StubRasterizer;

impl Rasterizer for StubRasterizer {
    fn first_page_to_image(&self, _pdf: &Path, image: &Path, _dpi: u32) -> claim_render::Result<()> {
        fs::write(image, b"\x89PNG").map_err(|source| RenderError::Io {
            operation: "write",
            path: image.to_path_buf(),
            source,
        })
    }
}

struct BrokenRasterizer;

impl Rasterizer for BrokenRasterizer {
    fn first_page_to_image(&self, _pdf: &Path, _image: &Path, _dpi: u32) -> claim_render::Result<()> {
        Err(RenderError::Rasterize {
            program: "broken".to_string(),
            reason: "always fails".to_string(),
        })
    }
}

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        write_template(&dir.path().join("form-cms1500.pdf"));
        Self { dir }
    }

    fn config(&self, count: u32) -> BatchConfig {
        BatchConfig::new(count)
            .with_template(self.dir.path().join("form-cms1500.pdf"))
            .with_output_dir(self.dir.path().join("output_forms"))
            .with_seed(2024)
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 6, 15).expect("date"))
    }

    fn output(&self, file: &str) -> std::path::PathBuf {
        self.dir.path().join("output_forms").join(file)
    }

    fn json(&self, file: &str) -> Value {
        serde_json::from_slice(&fs::read(self.output(file)).expect("read")).expect("json")
    }
}

#[test]
fn writes_every_file_for_each_form() {
    let fixture = Fixture::new();
    let result = run_batch_with(&fixture.config(2), AcroFormBackend::new(), &StubRasterizer)
        .expect("batch");

    assert_eq!(result.seed, 2024);
    assert_eq!(result.forms.len(), 2);
    for stem in ["cms1500_form_0001", "cms1500_form_0002"] {
        for suffix in [".pdf", ".png", ".json", "_core.json"] {
            let path = fixture.output(&format!("{stem}{suffix}"));
            assert!(
                fs::metadata(&path).expect("exists").len() > 0,
                "{} is empty",
                path.display()
            );
        }
    }
    for form in &result.forms {
        assert!(form.flatten.is_flattened());
        assert!(form.preview.is_some());
        // Only `sex` exists among the button groups.
        assert!(form.selection_failures > 0);
        assert_eq!(form.text_failures, 0);
    }
    assert!(!result.has_failures());

    let flattened = Document::load(fixture.output("cms1500_form_0001.pdf")).expect("load pdf");
    let root = flattened
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .expect("root");
    assert!(!flattened.get_dictionary(root).expect("catalog").has(b"AcroForm"));

    let aggregate = fixture.json("forms_data.json");
    assert_eq!(aggregate["metadata"]["total_forms"], 2);
    assert_eq!(aggregate["forms"][0]["png_filename"], "cms1500_form_0001.png");
    assert_eq!(
        aggregate["forms"][1]["form_data"],
        fixture.json("cms1500_form_0002.json")["form_data"]
    );
    let core = fixture.json("cms1500_form_0001_core.json");
    assert_eq!(
        core["core_data"]["box_2_patient_name"],
        result.forms[0].patient_name.as_str()
    );
}

#[test]
fn missing_template_fails_before_generating() {
    let fixture = Fixture::new();
    let config = fixture
        .config(3)
        .with_template(fixture.dir.path().join("absent.pdf"));

    let error = run_batch_with(&config, AcroFormBackend::new(), &StubRasterizer)
        .expect_err("template is missing");
    assert!(matches!(
        error.downcast_ref::<RenderError>(),
        Some(RenderError::TemplateMissing { .. })
    ));
    assert!(!fixture.dir.path().join("output_forms").exists());
}

#[test]
fn unreadable_template_fails_each_form_but_finishes_batch() {
    let fixture = Fixture::new();
    fs::write(fixture.dir.path().join("form-cms1500.pdf"), b"not a pdf").expect("overwrite");

    let result = run_batch_with(&fixture.config(2), AcroFormBackend::new(), &StubRasterizer)
        .expect("batch finishes");

    assert!(result.forms.is_empty());
    assert!(result.has_failures());
    let numbers: Vec<u32> = result.failed.iter().map(|failure| failure.form_number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert!(result.failed[0].error.contains("render form 1"));
    assert!(!fixture.output("cms1500_form_0001.json").exists());
    assert_eq!(fixture.json("forms_data.json")["metadata"]["total_forms"], 0);
}

#[test]
fn failed_preview_still_counts_the_form() {
    let fixture = Fixture::new();
    let result = run_batch_with(&fixture.config(1), AcroFormBackend::new(), &BrokenRasterizer)
        .expect("batch");

    assert_eq!(result.forms.len(), 1);
    assert!(result.forms[0].preview.is_none());
    assert!(!fixture.output("cms1500_form_0001.png").exists());
    assert!(fixture.json("cms1500_form_0001.json")["png_filename"].is_null());
    assert!(fixture.json("forms_data.json")["forms"][0]["png_filename"].is_null());
}

#[test]
fn disabled_preview_skips_rasterizer() {
    let fixture = Fixture::new();
    let config = fixture.config(1).with_preview(false);
    let result = run_batch_with(&config, AcroFormBackend::new(), &StubRasterizer).expect("batch");

    assert!(result.forms[0].preview.is_none());
    assert!(!fixture.output("cms1500_form_0001.png").exists());
}

#[test]
fn same_seed_reproduces_form_data() {
    let first = Fixture::new();
    let second = Fixture::new();
    run_batch_with(&first.config(2), AcroFormBackend::new(), &StubRasterizer).expect("first");
    run_batch_with(&second.config(2), AcroFormBackend::new(), &StubRasterizer).expect("second");

    let first = first.json("forms_data.json");
    let second = second.json("forms_data.json");
    for index in 0..2 {
        assert_eq!(
            first["forms"][index]["form_data"],
            second["forms"][index]["form_data"]
        );
    }
}
