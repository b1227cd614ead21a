//! Integration tests for output documents.

use std::fs;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use claim_fields::{FieldProjection, project};
use claim_model::ClaimRecord;
use claim_output::{
    BatchDocument, CoreDocument, FormDocument, FormFiles, OutputLayout, write_batch_document,
    write_form_documents, write_json,
};
use claim_synth::{GeneratorOptions, RecordAssembler};
use serde_json::Value;

fn record() -> ClaimRecord {
    RecordAssembler::new(
        GeneratorOptions::new()
            .with_seed(99)
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 6, 15).expect("date")),
    )
    .assemble()
}

fn generated() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_slice(&fs::read(path).expect("read")).expect("json")
}

#[test]
fn core_subset_summarises_the_projection() {
    let claim = record();
    let projection: FieldProjection = project(&claim);
    let document = CoreDocument::new(&FormFiles::new(3), false, generated(), &projection);
    let core = &document.core_data;

    assert_eq!(core.patient_name, claim.patient.name);
    assert_eq!(core.insurance_type, claim.coverage.category.as_str());
    assert_eq!(
        core.patient_dob,
        claim.patient.birth_date.format("%m/%d/%y").to_string()
    );
    assert_eq!(core.patient_address, claim.patient.address.single_line());
    assert_eq!(core.patient_phone, claim.patient.phone.display());
    assert_eq!(core.primary_diagnosis, claim.diagnoses[0].code);
    assert_eq!(core.primary_cpt_code, claim.service_lines[0].procedure_code);
    assert_eq!(core.provider_npi, claim.billing.npi.as_str());
    assert_eq!(core.summary.total_diagnoses as usize, claim.diagnoses.len());
    assert_eq!(core.summary.total_services as usize, claim.service_lines.len());
    assert_eq!(core.summary.total_amount, core.total_charge);
    assert_eq!(document.png_filename, None);
}

#[test]
fn full_document_serializes_every_name() {
    let projection = project(&record());
    let document = FormDocument::new(&FormFiles::new(1), true, generated(), &projection);
    let json = serde_json::to_value(&document).expect("serialize");

    assert_eq!(json["form_number"], 1);
    assert_eq!(json["pdf_filename"], "cms1500_form_0001.pdf");
    assert_eq!(json["png_filename"], "cms1500_form_0001.png");
    assert_eq!(json["generated_date"], "2024-06-15T12:30:00Z");
    let data = json["form_data"].as_object().expect("object");
    assert_eq!(data.len(), projection.len());
    assert_eq!(data["box_2_patient_name"], data["pt_name"]);
    assert!(data["num_service_lines"].is_u64());
    assert!(data.contains_key("cpt1_description"));
}

#[test]
fn writes_documents_and_aggregate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = OutputLayout::new(dir.path().join("output_forms"));
    layout.ensure_dir().expect("dir");
    let projection = project(&record());

    let mut entries = Vec::new();
    for form_number in 1..=2 {
        let files = layout.files(form_number);
        entries.push(
            write_form_documents(&layout, &files, false, generated(), &projection)
                .expect("write form"),
        );
    }
    let aggregate = write_batch_document(&layout, generated(), entries).expect("aggregate");

    for name in [
        "cms1500_form_0001.json",
        "cms1500_form_0001_core.json",
        "cms1500_form_0002.json",
        "cms1500_form_0002_core.json",
        "forms_data.json",
    ] {
        let path = layout.path(name);
        assert!(fs::metadata(&path).expect("exists").len() > 0, "{name} empty");
    }
    let leftovers: Vec<_> = fs::read_dir(layout.dir())
        .expect("list")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());

    let batch: BatchDocument =
        serde_json::from_slice(&fs::read(&aggregate).expect("read")).expect("parse");
    assert_eq!(batch.metadata.total_forms, 2);
    assert_eq!(batch.forms[1].json_filename, "cms1500_form_0002.json");
    assert_eq!(batch.forms[1].png_filename, None);

    let core = read_json(&layout.path("cms1500_form_0001_core.json"));
    assert!(core["core_data"]["summary"]["total_diagnoses"].is_u64());
    assert!(core["png_filename"].is_null());
}

#[test]
fn write_json_reports_missing_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("doc.json");
    assert!(write_json(&path, &serde_json::json!({"a": 1})).is_err());
}
