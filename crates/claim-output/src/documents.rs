//! Serialized descriptions of generated forms.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use claim_fields::{DatePart, FieldKey, FieldProjection, FieldValue, RangeEnd};
use serde::{Deserialize, Serialize};

use crate::layout::FormFiles;

pub const BATCH_DESCRIPTION: &str = "CMS-1500 form data for validation";

/// `cms1500_form_NNNN.json`: every projected field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    pub form_number: u32,
    pub pdf_filename: String,
    pub png_filename: Option<String>,
    pub generated_date: DateTime<Utc>,
    pub form_data: BTreeMap<String, FieldValue>,
}

impl FormDocument {
    pub fn new(
        files: &FormFiles,
        has_preview: bool,
        generated: DateTime<Utc>,
        projection: &FieldProjection,
    ) -> Self {
        Self {
            form_number: files.form_number,
            pdf_filename: files.pdf.clone(),
            png_filename: has_preview.then(|| files.png.clone()),
            generated_date: generated,
            form_data: projection.values().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSummary {
    pub patient_name: String,
    pub insurance_type: String,
    pub total_diagnoses: u32,
    pub total_services: u32,
    pub total_amount: String,
}

/// The handful of boxes most consumers check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSubset {
    #[serde(rename = "box_1_insurance_type")]
    pub insurance_type: String,
    #[serde(rename = "box_1a_insured_id")]
    pub insured_id: String,
    #[serde(rename = "box_2_patient_name")]
    pub patient_name: String,
    #[serde(rename = "box_3_patient_dob")]
    pub patient_dob: String,
    #[serde(rename = "box_3_patient_sex")]
    pub patient_sex: String,
    #[serde(rename = "box_4_insured_name")]
    pub insured_name: String,
    #[serde(rename = "box_5_patient_address")]
    pub patient_address: String,
    #[serde(rename = "box_5_patient_phone")]
    pub patient_phone: String,
    #[serde(rename = "box_6_relationship")]
    pub relationship: String,
    #[serde(rename = "box_21_primary_diagnosis")]
    pub primary_diagnosis: String,
    #[serde(rename = "box_21_secondary_diagnosis")]
    pub secondary_diagnosis: String,
    #[serde(rename = "box_21_tertiary_diagnosis")]
    pub tertiary_diagnosis: String,
    #[serde(rename = "box_21_quaternary_diagnosis")]
    pub quaternary_diagnosis: String,
    #[serde(rename = "box_24_primary_service_date")]
    pub primary_service_date: String,
    #[serde(rename = "box_24_primary_cpt_code")]
    pub primary_cpt_code: String,
    #[serde(rename = "box_24_primary_charge")]
    pub primary_charge: String,
    #[serde(rename = "box_25_provider_tax_id")]
    pub provider_tax_id: String,
    #[serde(rename = "box_26_account_number")]
    pub account_number: String,
    #[serde(rename = "box_28_total_charge")]
    pub total_charge: String,
    #[serde(rename = "box_33_billing_provider")]
    pub billing_provider: String,
    #[serde(rename = "box_33_provider_npi")]
    pub provider_npi: String,
    pub summary: CoreSummary,
}

fn slashed_date(projection: &FieldProjection, key: impl Fn(DatePart) -> FieldKey) -> String {
    DatePart::ALL
        .map(|part| projection.text(key(part)))
        .join("/")
}

fn integer(projection: &FieldProjection, key: FieldKey) -> u32 {
    projection
        .value(key)
        .and_then(FieldValue::as_integer)
        .unwrap_or(0)
}

impl CoreSubset {
    pub fn from_projection(projection: &FieldProjection) -> Self {
        let text = |key| projection.text(key);
        Self {
            insurance_type: text(FieldKey::InsuranceTypeName),
            insured_id: text(FieldKey::InsuredIdNumber),
            patient_name: text(FieldKey::PatientName),
            patient_dob: slashed_date(projection, FieldKey::PatientBirth),
            patient_sex: text(FieldKey::PatientSex),
            insured_name: text(FieldKey::InsuredName),
            patient_address: format!(
                "{}, {}, {} {}",
                text(FieldKey::PatientStreet),
                text(FieldKey::PatientCity),
                text(FieldKey::PatientState),
                text(FieldKey::PatientZip)
            ),
            patient_phone: format!(
                "({}) {}",
                text(FieldKey::PatientAreaCode),
                text(FieldKey::PatientPhone)
            ),
            relationship: text(FieldKey::PatientRelationship),
            primary_diagnosis: text(FieldKey::DiagnosisCode(1)),
            secondary_diagnosis: text(FieldKey::DiagnosisCode(2)),
            tertiary_diagnosis: text(FieldKey::DiagnosisCode(3)),
            quaternary_diagnosis: text(FieldKey::DiagnosisCode(4)),
            primary_service_date: slashed_date(projection, |part| {
                FieldKey::ServiceDate(1, RangeEnd::From, part)
            }),
            primary_cpt_code: text(FieldKey::ProcedureCode(1)),
            primary_charge: text(FieldKey::Charges(1)),
            provider_tax_id: text(FieldKey::FederalTaxId),
            account_number: text(FieldKey::PatientAccountNumber),
            total_charge: text(FieldKey::TotalCharge),
            billing_provider: text(FieldKey::BillingProviderName),
            provider_npi: text(FieldKey::BillingProviderNpi),
            summary: CoreSummary {
                patient_name: text(FieldKey::PatientName),
                insurance_type: text(FieldKey::InsuranceTypeName),
                total_diagnoses: integer(projection, FieldKey::NumDiagnoses),
                total_services: integer(projection, FieldKey::NumServiceLines),
                total_amount: text(FieldKey::TotalCharge),
            },
        }
    }
}

/// `cms1500_form_NNNN_core.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDocument {
    pub form_number: u32,
    pub pdf_filename: String,
    pub png_filename: Option<String>,
    pub generated_date: DateTime<Utc>,
    pub core_data: CoreSubset,
}

impl CoreDocument {
    pub fn new(
        files: &FormFiles,
        has_preview: bool,
        generated: DateTime<Utc>,
        projection: &FieldProjection,
    ) -> Self {
        Self {
            form_number: files.form_number,
            pdf_filename: files.pdf.clone(),
            png_filename: has_preview.then(|| files.png.clone()),
            generated_date: generated,
            core_data: CoreSubset::from_projection(projection),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub form_number: u32,
    pub pdf_filename: String,
    pub png_filename: Option<String>,
    pub json_filename: String,
    pub form_data: BTreeMap<String, FieldValue>,
}

impl BatchEntry {
    pub fn from_document(document: &FormDocument, files: &FormFiles) -> Self {
        Self {
            form_number: document.form_number,
            pdf_filename: document.pdf_filename.clone(),
            png_filename: document.png_filename.clone(),
            json_filename: files.json.clone(),
            form_data: document.form_data.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub total_forms: usize,
    pub generated_date: DateTime<Utc>,
    pub description: String,
}

/// `forms_data.json`: every form of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDocument {
    pub metadata: BatchMetadata,
    pub forms: Vec<BatchEntry>,
}

impl BatchDocument {
    pub fn new(generated: DateTime<Utc>, forms: Vec<BatchEntry>) -> Self {
        Self {
            metadata: BatchMetadata {
                total_forms: forms.len(),
                generated_date: generated,
                description: BATCH_DESCRIPTION.to_string(),
            },
            forms,
        }
    }
}
