//! Typed form-field keys and the naming catalog that renders them.
//!
//! Every semantic field has a canonical `box_N_...` name. Most also carry a
//! legacy short name used by the fillable template; both names always carry
//! the same value.

use std::fmt;

/// Revision of the naming catalog. Bump when any rendered name changes.
pub const CATALOG_VERSION: &str = "cms1500-0212/1";

/// Number of box 21 diagnosis rows on the form.
pub const DIAGNOSIS_ROWS: u8 = 12;
/// Number of box 24 service-line rows on the form.
pub const SERVICE_ROWS: u8 = 6;
/// Modifier slots per service row.
pub const MODIFIER_SLOTS: u8 = 4;

/// Which naming convention to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingScheme {
    Canonical,
    Legacy,
}

/// How a rendered field is treated by form renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    /// Written into a text field when the form has one of that name.
    Text,
    /// Human-readable value of a checkbox or radio group; the form is set
    /// through the group's selection token instead.
    SelectionDisplay,
    /// Serialized only, never written into the form.
    Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatePart {
    Month,
    Day,
    Year,
}

impl DatePart {
    pub const ALL: [DatePart; 3] = [DatePart::Month, DatePart::Day, DatePart::Year];

    fn canonical(self) -> &'static str {
        match self {
            DatePart::Month => "month",
            DatePart::Day => "day",
            DatePart::Year => "year",
        }
    }

    fn legacy(self) -> &'static str {
        match self {
            DatePart::Month => "mm",
            DatePart::Day => "dd",
            DatePart::Year => "yy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RangeEnd {
    From,
    To,
}

impl RangeEnd {
    pub const ALL: [RangeEnd; 2] = [RangeEnd::From, RangeEnd::To];

    fn canonical(self) -> &'static str {
        match self {
            RangeEnd::From => "from",
            RangeEnd::To => "to",
        }
    }

    fn legacy(self) -> &'static str {
        match self {
            RangeEnd::From => "from",
            RangeEnd::To => "end",
        }
    }
}

/// One semantic form field. Row and slot numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    InsuranceTypeIndex,
    InsuranceTypeName,
    InsuredIdNumber,
    PatientName,
    PatientBirth(DatePart),
    PatientSex,
    InsuredName,
    PatientStreet,
    PatientCity,
    PatientState,
    PatientZip,
    PatientAreaCode,
    PatientPhone,
    PatientRelationship,
    InsuredStreet,
    InsuredCity,
    InsuredState,
    InsuredZip,
    InsuredPhoneArea,
    InsuredPhone,
    NuccUse,
    OtherInsuredName,
    OtherInsuredPolicy,
    OtherInsurancePlanName,
    EmploymentRelated,
    AutoAccidentRelated,
    OtherAccidentRelated,
    AccidentPlace,
    InsuredGroupNumber,
    InsuredBirth(DatePart),
    InsuredSex,
    InsurancePlanName,
    OtherHealthBenefitPlan,
    PatientSignature,
    PatientSignatureDate,
    InsuredSignature,
    CurrentIllness(DatePart),
    OtherDate(DatePart),
    WorkUnable(RangeEnd, DatePart),
    ReferringProviderName,
    ReferringProviderNpi,
    ReferringProviderQualifier,
    Hospitalization(RangeEnd, DatePart),
    OutsideLab,
    DiagnosisCode(u8),
    DiagnosisDescription(u8),
    MedicaidResubmission,
    OriginalReference,
    PriorAuthorization,
    ServiceDate(u8, RangeEnd, DatePart),
    PlaceOfService(u8),
    Emergency(u8),
    ProcedureCode(u8),
    ProcedureDescription(u8),
    /// Row, slot (1 = primary modifier).
    Modifier(u8, u8),
    TypeOfService(u8),
    DiagnosisPointer(u8),
    Charges(u8),
    Units(u8),
    Days(u8),
    Epsdt(u8),
    PlanCode(u8),
    LocalUse(u8),
    LocalUseAlt(u8),
    SupplementalInfo(u8),
    FederalTaxId,
    TaxIdType,
    PatientAccountNumber,
    AcceptAssignment,
    TotalCharge,
    AmountPaid,
    BalanceDue,
    PhysicianSignature,
    PhysicianSignatureDate,
    FacilityName,
    FacilityStreet,
    FacilityLocation,
    BillingProviderName,
    BillingProviderAddress,
    BillingProviderPhone,
    BillingProviderPhoneArea,
    BillingProviderNpi,
    InsuranceCompanyName,
    InsuranceCompanyAddress,
    InsuranceId,
    InsuranceAddress2,
    InsuranceCityStateZip,
    Pin,
    Pin1,
    GroupId,
    DocLocation,
    NumDiagnoses,
    NumServiceLines,
}

/// Suffix letters of the extra modifier slots and supplemental rows.
fn slot_suffix(slot: u8) -> &'static str {
    match slot {
        2 => "a",
        3 => "b",
        4 => "c",
        5 => "d",
        6 => "e",
        _ => "",
    }
}

fn date_name(prefix: &str, part: DatePart) -> String {
    format!("{prefix}_{}", part.canonical())
}

impl FieldKey {
    /// Every key the form defines, in form order.
    pub fn all() -> Vec<FieldKey> {
        use FieldKey as K;
        let mut keys = vec![
            K::InsuranceTypeIndex,
            K::InsuranceTypeName,
            K::InsuredIdNumber,
            K::PatientName,
        ];
        keys.extend(DatePart::ALL.map(K::PatientBirth));
        keys.extend([
            K::PatientSex,
            K::InsuredName,
            K::PatientStreet,
            K::PatientCity,
            K::PatientState,
            K::PatientZip,
            K::PatientAreaCode,
            K::PatientPhone,
            K::PatientRelationship,
            K::InsuredStreet,
            K::InsuredCity,
            K::InsuredState,
            K::InsuredZip,
            K::InsuredPhoneArea,
            K::InsuredPhone,
            K::NuccUse,
            K::OtherInsuredName,
            K::OtherInsuredPolicy,
            K::OtherInsurancePlanName,
            K::EmploymentRelated,
            K::AutoAccidentRelated,
            K::OtherAccidentRelated,
            K::AccidentPlace,
            K::InsuredGroupNumber,
        ]);
        keys.extend(DatePart::ALL.map(K::InsuredBirth));
        keys.extend([
            K::InsuredSex,
            K::InsurancePlanName,
            K::OtherHealthBenefitPlan,
            K::PatientSignature,
            K::PatientSignatureDate,
            K::InsuredSignature,
        ]);
        keys.extend(DatePart::ALL.map(K::CurrentIllness));
        keys.extend(DatePart::ALL.map(K::OtherDate));
        for end in RangeEnd::ALL {
            keys.extend(DatePart::ALL.map(|part| K::WorkUnable(end, part)));
        }
        keys.extend([
            K::ReferringProviderName,
            K::ReferringProviderNpi,
            K::ReferringProviderQualifier,
        ]);
        for end in RangeEnd::ALL {
            keys.extend(DatePart::ALL.map(|part| K::Hospitalization(end, part)));
        }
        keys.push(K::OutsideLab);
        for row in 1..=DIAGNOSIS_ROWS {
            keys.extend([K::DiagnosisCode(row), K::DiagnosisDescription(row)]);
        }
        keys.extend([
            K::MedicaidResubmission,
            K::OriginalReference,
            K::PriorAuthorization,
        ]);
        for row in 1..=SERVICE_ROWS {
            for end in RangeEnd::ALL {
                keys.extend(DatePart::ALL.map(|part| K::ServiceDate(row, end, part)));
            }
            keys.extend([
                K::PlaceOfService(row),
                K::Emergency(row),
                K::ProcedureCode(row),
                K::ProcedureDescription(row),
            ]);
            keys.extend((1..=MODIFIER_SLOTS).map(|slot| K::Modifier(row, slot)));
            keys.extend([
                K::TypeOfService(row),
                K::DiagnosisPointer(row),
                K::Charges(row),
                K::Units(row),
                K::Days(row),
                K::Epsdt(row),
                K::PlanCode(row),
                K::LocalUse(row),
                K::LocalUseAlt(row),
                K::SupplementalInfo(row),
            ]);
        }
        keys.extend([
            K::FederalTaxId,
            K::TaxIdType,
            K::PatientAccountNumber,
            K::AcceptAssignment,
            K::TotalCharge,
            K::AmountPaid,
            K::BalanceDue,
            K::PhysicianSignature,
            K::PhysicianSignatureDate,
            K::FacilityName,
            K::FacilityStreet,
            K::FacilityLocation,
            K::BillingProviderName,
            K::BillingProviderAddress,
            K::BillingProviderPhone,
            K::BillingProviderPhoneArea,
            K::BillingProviderNpi,
            K::InsuranceCompanyName,
            K::InsuranceCompanyAddress,
            K::InsuranceId,
            K::InsuranceAddress2,
            K::InsuranceCityStateZip,
            K::Pin,
            K::Pin1,
            K::GroupId,
            K::DocLocation,
            K::NumDiagnoses,
            K::NumServiceLines,
        ]);
        keys
    }

    pub fn name(&self, scheme: NamingScheme) -> Option<String> {
        match scheme {
            NamingScheme::Canonical => Some(self.canonical()),
            NamingScheme::Legacy => self.legacy(),
        }
    }

    /// Canonical and, when one exists, legacy name.
    pub fn names(&self) -> Vec<String> {
        let mut names = vec![self.canonical()];
        names.extend(self.legacy());
        names
    }

    pub fn kind(&self) -> FieldKind {
        use FieldKey as K;
        match self {
            K::DiagnosisDescription(_)
            | K::ProcedureDescription(_)
            | K::NumDiagnoses
            | K::NumServiceLines => FieldKind::Metadata,
            K::InsuranceTypeIndex
            | K::InsuranceTypeName
            | K::PatientSex
            | K::PatientRelationship
            | K::EmploymentRelated
            | K::AutoAccidentRelated
            | K::OtherAccidentRelated
            | K::InsuredSex
            | K::OtherHealthBenefitPlan
            | K::OutsideLab
            | K::TaxIdType
            | K::AcceptAssignment => FieldKind::SelectionDisplay,
            _ => FieldKind::Text,
        }
    }

    pub fn canonical(&self) -> String {
        use FieldKey as K;
        let fixed = match self {
            K::InsuranceTypeIndex => "box_1_insurance_type_index",
            K::InsuranceTypeName => "box_1_insurance_type_name",
            K::InsuredIdNumber => "box_1a_insured_id_number",
            K::PatientName => "box_2_patient_name",
            K::PatientBirth(part) => return date_name("box_3_patient_birth", *part),
            K::PatientSex => "box_3_patient_sex",
            K::InsuredName => "box_4_insured_name",
            K::PatientStreet => "box_5_patient_street",
            K::PatientCity => "box_5_patient_city",
            K::PatientState => "box_5_patient_state",
            K::PatientZip => "box_5_patient_zip",
            K::PatientAreaCode => "box_5_patient_area_code",
            K::PatientPhone => "box_5_patient_phone",
            K::PatientRelationship => "box_6_patient_relationship_to_insured",
            K::InsuredStreet => "box_7_insured_street",
            K::InsuredCity => "box_7_insured_city",
            K::InsuredState => "box_7_insured_state",
            K::InsuredZip => "box_7_insured_zip",
            K::InsuredPhoneArea => "box_7_insured_phone_area",
            K::InsuredPhone => "box_7_insured_phone",
            K::NuccUse => "box_8_reserved_for_nucc_use",
            K::OtherInsuredName => "box_9_other_insured_name",
            K::OtherInsuredPolicy => "box_9a_other_insured_policy_number",
            K::OtherInsurancePlanName => "box_9d_other_insurance_plan_name",
            K::EmploymentRelated => "box_10a_employment_related",
            K::AutoAccidentRelated => "box_10b_auto_accident_related",
            K::OtherAccidentRelated => "box_10c_other_accident_related",
            K::AccidentPlace => "box_10d_accident_place",
            K::InsuredGroupNumber => "box_11_insured_group_number",
            K::InsuredBirth(part) => return date_name("box_11a_insured_birth", *part),
            K::InsuredSex => "box_11a_insured_sex",
            K::InsurancePlanName => "box_11c_insurance_plan_name",
            K::OtherHealthBenefitPlan => "box_11d_other_health_benefit_plan",
            K::PatientSignature => "box_12_patient_signature",
            K::PatientSignatureDate => "box_12_patient_signature_date",
            K::InsuredSignature => "box_13_insured_signature",
            K::CurrentIllness(part) => return date_name("box_14_current_illness", *part),
            K::OtherDate(part) => return date_name("box_15_other_date", *part),
            K::WorkUnable(end, part) => {
                return date_name(&format!("box_16_work_unable_{}", end.canonical()), *part);
            }
            K::ReferringProviderName => "box_17_referring_provider_name",
            K::ReferringProviderNpi => "box_17a_referring_provider_npi",
            K::ReferringProviderQualifier => "box_17b_referring_provider_qualifier",
            K::Hospitalization(end, part) => {
                return date_name(&format!("box_18_hospitalization_{}", end.canonical()), *part);
            }
            K::OutsideLab => "box_20_outside_lab",
            K::DiagnosisCode(row) => return format!("box_21_diagnosis_{row}_code"),
            K::DiagnosisDescription(row) => return format!("box_21_diagnosis_{row}_description"),
            K::MedicaidResubmission => "box_22_medicaid_resubmission",
            K::OriginalReference => "box_22_original_reference_number",
            K::PriorAuthorization => "box_23_prior_authorization",
            K::ServiceDate(row, end, part) => {
                return date_name(&format!("box_24a_service_{row}_{}", end.canonical()), *part);
            }
            K::PlaceOfService(row) => return format!("box_24b_place_of_service_{row}"),
            K::Emergency(row) => return format!("box_24c_emergency_{row}"),
            K::ProcedureCode(row) => return format!("box_24d_procedure_code_{row}"),
            K::ProcedureDescription(row) => return format!("box_24d_procedure_description_{row}"),
            K::Modifier(row, slot) => {
                return format!("box_24d_modifier_{row}{}", slot_suffix(*slot));
            }
            K::TypeOfService(row) => return format!("box_24_type_of_service_{row}"),
            K::DiagnosisPointer(row) => return format!("box_24e_diagnosis_pointer_{row}"),
            K::Charges(row) => return format!("box_24f_charges_{row}"),
            K::Units(row) => return format!("box_24g_units_{row}"),
            K::Days(row) => return format!("box_24g_days_{row}"),
            K::Epsdt(row) => return format!("box_24h_epsdt_{row}"),
            K::PlanCode(row) => return format!("box_24_plan_{row}"),
            K::LocalUse(row) => return format!("box_24j_local_use_{row}"),
            K::LocalUseAlt(row) => return format!("box_24j_local_use_{row}a"),
            K::SupplementalInfo(row) => return format!("box_24_supplemental_info_{row}"),
            K::FederalTaxId => "box_25_federal_tax_id",
            K::TaxIdType => "box_25_tax_id_type",
            K::PatientAccountNumber => "box_26_patient_account_number",
            K::AcceptAssignment => "box_27_accept_assignment",
            K::TotalCharge => "box_28_total_charge",
            K::AmountPaid => "box_29_amount_paid",
            K::BalanceDue => "box_30_balance_due",
            K::PhysicianSignature => "box_31_physician_signature",
            K::PhysicianSignatureDate => "box_31_physician_signature_date",
            K::FacilityName => "box_32_service_facility_name",
            K::FacilityStreet => "box_32_service_facility_street",
            K::FacilityLocation => "box_32_service_facility_location",
            K::BillingProviderName => "box_33_billing_provider_name",
            K::BillingProviderAddress => "box_33_billing_provider_address",
            K::BillingProviderPhone => "box_33_billing_provider_phone",
            K::BillingProviderPhoneArea => "box_33_billing_provider_phone_area",
            K::BillingProviderNpi => "box_33a_billing_provider_npi",
            K::InsuranceCompanyName => "insurance_company_name",
            K::InsuranceCompanyAddress => "insurance_company_address",
            K::InsuranceId => "insurance_id",
            K::InsuranceAddress2 => "insurance_address2",
            K::InsuranceCityStateZip => "insurance_city_state_zip",
            K::Pin => "pin",
            K::Pin1 => "pin1",
            K::GroupId => "grp1",
            K::DocLocation => "doc_location",
            K::NumDiagnoses => "num_diagnoses",
            K::NumServiceLines => "num_service_lines",
        };
        fixed.to_string()
    }

    /// Short name used by the fillable template, if the field has one.
    pub fn legacy(&self) -> Option<String> {
        use FieldKey as K;
        let fixed = match self {
            K::InsuranceTypeIndex => "insurance_type_index",
            K::InsuranceTypeName => "insurance_type_name",
            K::InsuredIdNumber => "ins_policy",
            K::PatientName => "pt_name",
            K::PatientBirth(part) => return Some(format!("birth_{}", part.legacy())),
            K::PatientSex => "sex",
            K::InsuredName => "ins_name",
            K::PatientStreet => "pt_street",
            K::PatientCity => "pt_city",
            K::PatientState => "pt_state",
            K::PatientZip => "pt_zip",
            K::PatientAreaCode => "pt_AreaCode",
            K::PatientPhone => "pt_phone",
            K::PatientRelationship => "rel_to_ins",
            K::InsuredStreet => "ins_street",
            K::InsuredCity => "ins_city",
            K::InsuredState => "ins_state",
            K::InsuredZip => "ins_zip",
            K::InsuredPhoneArea => "ins_phone area",
            K::InsuredPhone => "ins_phone",
            K::NuccUse => "NUCC USE",
            K::OtherInsuredName => "other_ins_name",
            K::OtherInsuredPolicy => "other_ins_policy",
            K::OtherInsurancePlanName => "other_ins_plan_name",
            K::EmploymentRelated => "employment",
            K::AutoAccidentRelated => "pt_auto_accident",
            K::OtherAccidentRelated => "other_accident",
            K::AccidentPlace => "accident_place",
            K::InsuredBirth(part) => return Some(format!("ins_dob_{}", part.legacy())),
            K::InsuredSex => "ins_sex",
            K::InsurancePlanName => "ins_plan_name",
            K::OtherHealthBenefitPlan => "ins_benefit_plan",
            K::PatientSignature => "pt_signature",
            K::PatientSignatureDate => "pt_date",
            K::InsuredSignature => "ins_signature",
            K::CurrentIllness(part) => return Some(format!("cur_ill_{}", part.legacy())),
            K::OtherDate(part) => return Some(format!("sim_ill_{}", part.legacy())),
            K::WorkUnable(end, part) => {
                return Some(format!("work_{}_{}", part.legacy(), end.legacy()));
            }
            K::ReferringProviderName => "ref_physician",
            K::ReferringProviderNpi => "physician number 17a",
            K::ReferringProviderQualifier => "physician number 17a1",
            K::Hospitalization(end, part) => {
                return Some(format!("hosp_{}_{}", part.legacy(), end.legacy()));
            }
            K::OutsideLab => "lab",
            K::DiagnosisCode(row) => return Some(format!("diagnosis{row}")),
            K::DiagnosisDescription(row) => return Some(format!("diagnosis{row}_description")),
            K::MedicaidResubmission => "medicaid_resub",
            K::OriginalReference => "original_ref",
            K::PriorAuthorization => "prior_auth",
            K::ServiceDate(row, end, part) => {
                return Some(format!("sv{row}_{}_{}", part.legacy(), end.legacy()));
            }
            K::PlaceOfService(row) => return Some(format!("place{row}")),
            K::Emergency(row) => return Some(format!("emg{row}")),
            K::ProcedureCode(row) => return Some(format!("cpt{row}")),
            K::ProcedureDescription(row) => return Some(format!("cpt{row}_description")),
            K::Modifier(row, slot) => return Some(format!("mod{row}{}", slot_suffix(*slot))),
            K::TypeOfService(row) => return Some(format!("type{row}")),
            K::DiagnosisPointer(row) => return Some(format!("diag{row}")),
            K::Charges(row) => return Some(format!("ch{row}")),
            K::Units(row) => return Some(format!("units{row}")),
            K::Days(row) => return Some(format!("day{row}")),
            K::Epsdt(row) => return Some(format!("epsdt{row}")),
            K::PlanCode(row) => return Some(format!("plan{row}")),
            K::LocalUse(row) => return Some(format!("local{row}")),
            K::LocalUseAlt(row) => return Some(format!("local{row}a")),
            K::SupplementalInfo(row) => return Some(format!("Suppl{}", slot_suffix(*row))),
            K::FederalTaxId => "tax_id",
            K::TaxIdType => "ssn",
            K::PatientAccountNumber => "pt_account",
            K::AcceptAssignment => "assignment",
            K::TotalCharge => "t_charge",
            K::AmountPaid => "amt_paid",
            K::BalanceDue => "charge",
            K::PhysicianSignature => "physician_signature",
            K::PhysicianSignatureDate => "physician_date",
            K::FacilityName => "fac_name",
            K::FacilityStreet => "fac_street",
            K::FacilityLocation => "fac_location",
            K::BillingProviderName => "doc_name",
            K::BillingProviderAddress => "doc_street",
            K::BillingProviderPhone => "doc_phone",
            K::BillingProviderPhoneArea => "doc_phone area",
            K::BillingProviderNpi => "id_physician",
            K::InsuredGroupNumber
            | K::InsuranceCompanyName
            | K::InsuranceCompanyAddress
            | K::InsuranceId
            | K::InsuranceAddress2
            | K::InsuranceCityStateZip
            | K::Pin
            | K::Pin1
            | K::GroupId
            | K::DocLocation
            | K::NumDiagnoses
            | K::NumServiceLines => return None,
        };
        Some(fixed.to_string())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rendered_names_are_unique() {
        let mut seen = HashSet::new();
        for key in FieldKey::all() {
            for name in key.names() {
                assert!(seen.insert(name.clone()), "duplicate field name {name}");
            }
        }
    }

    #[test]
    fn date_and_row_names() {
        assert_eq!(
            FieldKey::WorkUnable(RangeEnd::To, DatePart::Year).names(),
            vec!["box_16_work_unable_to_year", "work_yy_end"]
        );
        assert_eq!(
            FieldKey::ServiceDate(3, RangeEnd::From, DatePart::Month).names(),
            vec!["box_24a_service_3_from_month", "sv3_mm_from"]
        );
        assert_eq!(
            FieldKey::Modifier(2, 3).legacy().as_deref(),
            Some("mod2b")
        );
        assert_eq!(FieldKey::Modifier(2, 1).legacy().as_deref(), Some("mod2"));
        assert_eq!(FieldKey::SupplementalInfo(1).legacy().as_deref(), Some("Suppl"));
        assert_eq!(FieldKey::SupplementalInfo(6).legacy().as_deref(), Some("Supple"));
    }

    #[test]
    fn single_name_fields_have_no_alias() {
        assert_eq!(FieldKey::InsuredGroupNumber.legacy(), None);
        assert_eq!(FieldKey::GroupId.canonical(), "grp1");
        assert_eq!(
            FieldKey::NumDiagnoses.name(NamingScheme::Legacy),
            None
        );
    }

    #[test]
    fn metadata_and_selection_kinds() {
        assert_eq!(FieldKey::DiagnosisDescription(4).kind(), FieldKind::Metadata);
        assert_eq!(FieldKey::ProcedureDescription(1).kind(), FieldKind::Metadata);
        assert_eq!(FieldKey::InsuranceTypeName.kind(), FieldKind::SelectionDisplay);
        assert_eq!(FieldKey::AccidentPlace.kind(), FieldKind::Text);
    }
}
