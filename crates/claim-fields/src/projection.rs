//! Flattening a [`ClaimRecord`] into named form fields.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use claim_model::{ClaimRecord, DateRange, FormDate};
use tracing::debug;

use crate::checkbox::{CheckboxGroup, SelectionToken};
use crate::key::{DatePart, FieldKey, FieldKind, NamingScheme, RangeEnd};
use crate::value::FieldValue;

/// Box 13 text when the insured's authorization is on file.
pub const INSURED_SIGNATURE_ON_FILE: &str = "Signature on File";

/// Every field of one record under all of its names, plus the checkbox
/// selections derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldProjection {
    values: BTreeMap<String, FieldValue>,
    kinds: BTreeMap<String, FieldKind>,
    selections: BTreeMap<CheckboxGroup, SelectionToken>,
}

impl FieldProjection {
    fn insert(&mut self, key: FieldKey, value: FieldValue) {
        let kind = key.kind();
        for name in key.names() {
            self.kinds.insert(name.clone(), kind);
            self.values.insert(name, value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn value(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key.canonical())
    }

    /// Text of a key's value; empty for blanks and missing keys.
    pub fn text(&self, key: FieldKey) -> String {
        self.value(key).map(ToString::to_string).unwrap_or_default()
    }

    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.kinds.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All names and values, canonical, legacy and metadata alike.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Names and values eligible for text fields in a form.
    pub fn text_fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.iter()
            .filter(|(name, _)| self.kind(name) == Some(FieldKind::Text))
    }

    pub fn selections(&self) -> &BTreeMap<CheckboxGroup, SelectionToken> {
        &self.selections
    }

    /// Complete field dump as serialized into the per-record document.
    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }
}

fn date_part(date: Option<NaiveDate>, part: DatePart) -> FieldValue {
    date.map(FormDate::new)
        .map(|form| match part {
            DatePart::Month => form.month,
            DatePart::Day => form.day,
            DatePart::Year => form.year,
        })
        .into()
}

fn range_part(range: Option<DateRange>, end: RangeEnd, part: DatePart) -> FieldValue {
    let date = range.map(|range| match end {
        RangeEnd::From => range.start(),
        RangeEnd::To => range.end(),
    });
    date_part(date, part)
}

fn slashed(date: NaiveDate) -> String {
    FormDate::new(date).slashed()
}

fn row_value(row: u8) -> usize {
    usize::from(row) - 1
}

fn count(value: usize) -> FieldValue {
    FieldValue::Integer(u32::try_from(value).unwrap_or(u32::MAX))
}

/// Value of one key for a record. Blank boxes are `""`.
fn field_value(record: &ClaimRecord, key: FieldKey) -> FieldValue {
    use FieldKey as K;
    let patient = &record.patient;
    let coverage = &record.coverage;
    let insured_address = coverage.insured_address.as_ref();
    let other = coverage.other_insurance.as_ref();
    let referring = record.referring_provider.as_ref();
    let facility = record.service_facility.as_ref();
    let admin = &record.administrative;
    let supplemental = &record.supplemental;
    let line = |row: u8| record.service_lines.get(row_value(row));
    let diagnosis = |row: u8| record.diagnoses.get(row_value(row));

    match key {
        K::InsuranceTypeIndex => FieldValue::Integer(u32::from(coverage.category.index())),
        K::InsuranceTypeName => coverage.category.as_str().into(),
        K::InsuredIdNumber => coverage.policy_id.as_str().into(),
        K::PatientName => patient.name.as_str().into(),
        K::PatientBirth(part) => date_part(Some(patient.birth_date), part),
        K::PatientSex => patient.sex.patient_code().into(),
        K::InsuredName => coverage.insured_name.as_str().into(),
        K::PatientStreet => patient.address.street.as_str().into(),
        K::PatientCity => patient.address.city.as_str().into(),
        K::PatientState => patient.address.state.as_str().into(),
        K::PatientZip => patient.address.zip.as_str().into(),
        K::PatientAreaCode => patient.phone.area_code.as_str().into(),
        K::PatientPhone => patient.phone.number.as_str().into(),
        K::PatientRelationship => coverage.relationship.as_str().into(),
        K::InsuredStreet => insured_address.map(|a| a.address.street.clone()).into(),
        K::InsuredCity => insured_address.map(|a| a.address.city.clone()).into(),
        K::InsuredState => insured_address.map(|a| a.address.state.clone()).into(),
        K::InsuredZip => insured_address.map(|a| a.address.zip.clone()).into(),
        K::InsuredPhoneArea => insured_address.map(|a| a.phone.area_code.clone()).into(),
        K::InsuredPhone => insured_address.map(|a| a.phone.number.clone()).into(),
        K::NuccUse => admin.nucc_use.clone().into(),
        K::OtherInsuredName => other.map(|o| o.insured_name.clone()).into(),
        K::OtherInsuredPolicy => other.map(|o| o.policy_number.clone()).into(),
        K::OtherInsurancePlanName => other.map(|o| o.plan_name.clone()).into(),
        K::EmploymentRelated => record.conditions.employment.as_str().into(),
        K::AutoAccidentRelated => record.conditions.auto_accident.as_str().into(),
        K::OtherAccidentRelated => record.conditions.other_accident.as_str().into(),
        K::AccidentPlace => record.conditions.accident_place.clone().into(),
        K::InsuredGroupNumber => coverage.group_number.clone().into(),
        K::InsuredBirth(part) => date_part(Some(coverage.insured_birth_date), part),
        K::InsuredSex => coverage.insured_sex.insured_code().into(),
        K::InsurancePlanName => coverage.plan_name.clone().into(),
        K::OtherHealthBenefitPlan => coverage.other_benefit_plan.as_str().into(),
        K::PatientSignature => record.signatures.patient.as_ref().map(|s| s.signer.clone()).into(),
        K::PatientSignatureDate => record
            .signatures
            .patient
            .as_ref()
            .map(|s| slashed(s.date))
            .into(),
        K::InsuredSignature => {
            if record.signatures.insured_on_file {
                INSURED_SIGNATURE_ON_FILE.into()
            } else {
                FieldValue::blank()
            }
        }
        K::CurrentIllness(part) => date_part(record.timeline.illness_onset, part),
        K::OtherDate(part) => date_part(record.timeline.similar_illness, part),
        K::WorkUnable(end, part) => range_part(record.timeline.work_disability, end, part),
        K::ReferringProviderName => referring.map(|r| r.name.clone()).into(),
        K::ReferringProviderNpi => referring.map(|r| r.npi.as_str().to_string()).into(),
        K::ReferringProviderQualifier => referring.map(|r| r.qualifier.clone()).into(),
        K::Hospitalization(end, part) => range_part(record.timeline.hospitalization, end, part),
        K::OutsideLab => record.financials.outside_lab.as_str().into(),
        K::DiagnosisCode(row) => diagnosis(row).map(|d| d.code.clone()).into(),
        K::DiagnosisDescription(row) => diagnosis(row).map(|d| d.description.clone()).into(),
        K::MedicaidResubmission => record.authorization.medicaid_resubmission.clone().into(),
        K::OriginalReference => record.authorization.original_reference.clone().into(),
        K::PriorAuthorization => record.authorization.prior_authorization.clone().into(),
        K::ServiceDate(row, end, part) => range_part(line(row).map(|l| l.dates), end, part),
        K::PlaceOfService(row) => line(row).map(|l| l.place_of_service.clone()).into(),
        K::Emergency(row) => line(row)
            .filter(|l| l.emergency)
            .map(|_| "Y".to_string())
            .into(),
        K::ProcedureCode(row) => line(row).map(|l| l.procedure_code.clone()).into(),
        K::ProcedureDescription(row) => line(row).map(|l| l.description.clone()).into(),
        K::Modifier(row, slot) => line(row)
            .and_then(|l| l.modifiers.get(usize::from(slot) - 1).cloned().flatten())
            .into(),
        K::TypeOfService(row) => line(row)
            .map(|l| l.type_of_service.as_str().to_string())
            .into(),
        K::DiagnosisPointer(row) => line(row)
            .map(|l| l.diagnosis_pointer.letter().to_string())
            .into(),
        K::Charges(row) => line(row).map(|l| l.charge.to_string()).into(),
        K::Units(row) => line(row).map(|l| l.units.to_string()).into(),
        K::Days(row) => line(row).and_then(|l| l.days).map(|d| d.to_string()).into(),
        K::Epsdt(row) => supplemental.epsdt[row_value(row)]
            .map(|e| e.as_str().to_string())
            .into(),
        K::PlanCode(row) => supplemental.plan[row_value(row)].clone().into(),
        K::LocalUse(row) => supplemental.local_use[row_value(row)].clone().into(),
        K::LocalUseAlt(row) => supplemental.local_use_alt[row_value(row)].clone().into(),
        K::SupplementalInfo(row) => supplemental.supplemental[row_value(row)].clone().into(),
        K::FederalTaxId => record.billing.tax_id.as_str().into(),
        K::TaxIdType => record.billing.tax_id_type.as_str().into(),
        K::PatientAccountNumber => patient.account_number.as_str().into(),
        K::AcceptAssignment => record.financials.accept_assignment.as_str().into(),
        K::TotalCharge => record.financials.total_charge.to_string().into(),
        K::AmountPaid => record.financials.amount_paid.to_string().into(),
        K::BalanceDue => record.financials.balance_due.to_string().into(),
        K::PhysicianSignature => record.signatures.physician.signer.as_str().into(),
        K::PhysicianSignatureDate => slashed(record.signatures.physician.date).into(),
        K::FacilityName => facility.map(|f| f.name.clone()).into(),
        K::FacilityStreet => facility.map(|f| f.street.clone()).into(),
        K::FacilityLocation => facility.map(|f| f.location.clone()).into(),
        K::BillingProviderName => record.billing.name.as_str().into(),
        K::BillingProviderAddress => record.billing.address.as_str().into(),
        K::BillingProviderPhone => record.billing.phone.number.as_str().into(),
        K::BillingProviderPhoneArea => record.billing.phone.area_code.as_str().into(),
        K::BillingProviderNpi => record.billing.npi.as_str().into(),
        K::InsuranceCompanyName => coverage.insurer.name.as_str().into(),
        K::InsuranceCompanyAddress => coverage.insurer.address.as_str().into(),
        K::InsuranceId => admin.insurance_id.clone().into(),
        K::InsuranceAddress2 => admin.insurance_address2.clone().into(),
        K::InsuranceCityStateZip => admin.insurance_city_state_zip.clone().into(),
        K::Pin => admin.pin.clone().into(),
        K::Pin1 => admin.pin1.clone().into(),
        K::GroupId => admin.group_id.clone().into(),
        K::DocLocation => admin.doc_location.clone().into(),
        K::NumDiagnoses => count(record.num_diagnoses()),
        K::NumServiceLines => count(record.num_service_lines()),
    }
}

/// Projects a record onto every form field name.
///
/// Pure: the same record always yields the same projection. Rows past the
/// record's diagnoses or service lines are projected as blanks.
pub fn project(record: &ClaimRecord) -> FieldProjection {
    let mut projection = FieldProjection::default();
    for key in FieldKey::all() {
        projection.insert(key, field_value(record, key));
    }

    for group in CheckboxGroup::ALL {
        let token = projection
            .value(group.source())
            .and_then(|value| group.encode(value));
        if let Some(token) = token {
            projection.selections.insert(group, token);
        }
    }

    debug!(
        fields = projection.len(),
        selections = projection.selections.len(),
        "projected claim record"
    );
    projection
}

/// Value of `key` under the chosen naming scheme.
pub fn lookup(
    projection: &FieldProjection,
    key: FieldKey,
    scheme: NamingScheme,
) -> Option<&FieldValue> {
    key.name(scheme).and_then(|name| projection.get(&name))
}
