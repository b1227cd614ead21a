//! The synthetic claim record and its sub-records.
//!
//! A [`ClaimRecord`] is built whole by the generator and never mutated
//! afterwards. Optional groups of boxes are modelled as `Option<Block>` so
//! that a group is either fully populated or fully blank.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::DateRange;
use crate::enums::{
    ClinicalCategory, EpsdtIndicator, InsuranceCategory, Relationship, Sex, TaxIdType,
    TypeOfService, YesNo,
};
use crate::ids::{DiagnosisPointer, Dollars, Npi};

/// Maximum number of box 21 diagnosis entries.
pub const MAX_DIAGNOSES: usize = 12;
/// Number of box 24 service-line rows.
pub const MAX_SERVICE_LINES: usize = 6;
/// Modifier slots per service line (one primary plus three extra).
pub const MODIFIER_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    /// `street, city, ST zip`
    pub fn single_line(&self) -> String {
        format!("{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

/// Phone number split the way the form prints it: `(area) NNN-NNNN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub area_code: String,
    pub number: String,
}

impl PhoneNumber {
    pub fn display(&self) -> String {
        format!("({}) {}", self.area_code, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub account_number: String,
    pub address: Address,
    pub phone: PhoneNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insurer {
    pub name: String,
    pub address: String,
}

/// Box 7 insured address, present or absent as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuredAddress {
    pub address: Address,
    pub phone: PhoneNumber,
}

/// Boxes 9, 9a and 9d.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherInsurance {
    pub insured_name: String,
    pub policy_number: String,
    pub plan_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub category: InsuranceCategory,
    pub policy_id: String,
    pub insured_name: String,
    pub insured_birth_date: NaiveDate,
    pub insured_sex: Sex,
    pub relationship: Relationship,
    pub insurer: Insurer,
    pub insured_address: Option<InsuredAddress>,
    pub other_insurance: Option<OtherInsurance>,
    pub plan_name: Option<String>,
    pub group_number: Option<String>,
    pub other_benefit_plan: YesNo,
}

/// Box 10 "is patient's condition related to" indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionIndicators {
    pub employment: YesNo,
    pub auto_accident: YesNo,
    pub other_accident: YesNo,
    /// State where the accident happened; set exactly when an accident
    /// indicator is YES.
    pub accident_place: Option<String>,
}

impl ConditionIndicators {
    pub fn any_accident(&self) -> bool {
        self.auto_accident.is_yes() || self.other_accident.is_yes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingProvider {
    pub name: String,
    pub address: String,
    pub phone: PhoneNumber,
    pub npi: Npi,
    pub tax_id: String,
    pub tax_id_type: TaxIdType,
}

/// Box 17 block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferringProvider {
    pub name: String,
    pub npi: Npi,
    pub qualifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub code: String,
    pub description: String,
    pub category: ClinicalCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLine {
    pub procedure_code: String,
    pub description: String,
    /// Primary modifier followed by the three extra slots; any slot may be empty.
    pub modifiers: [Option<String>; MODIFIER_SLOTS],
    pub place_of_service: String,
    pub type_of_service: TypeOfService,
    pub emergency: bool,
    /// From/to service dates. Generated lines always cover a single day.
    pub dates: DateRange,
    pub charge: Dollars,
    pub units: u8,
    pub days: Option<u8>,
    pub diagnosis_pointer: DiagnosisPointer,
}

impl ServiceLine {
    /// `CODE` or `CODE-MOD` using the primary modifier.
    pub fn code_with_modifier(&self) -> String {
        match &self.modifiers[0] {
            Some(modifier) => format!("{}-{}", self.procedure_code, modifier),
            None => self.procedure_code.clone(),
        }
    }
}

/// Boxes 20 and 27-30.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Financials {
    pub total_charge: Dollars,
    pub amount_paid: Dollars,
    pub balance_due: Dollars,
    pub outside_lab: YesNo,
    pub accept_assignment: YesNo,
}

/// Boxes 14-16 and 18.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeTimeline {
    pub illness_onset: Option<NaiveDate>,
    pub similar_illness: Option<NaiveDate>,
    pub work_disability: Option<DateRange>,
    pub hospitalization: Option<DateRange>,
}

/// Boxes 22 and 23.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub medicaid_resubmission: Option<String>,
    pub original_reference: Option<String>,
    pub prior_authorization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub signer: String,
    pub date: NaiveDate,
}

/// Boxes 12, 13 and 31.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatures {
    pub patient: Option<Signature>,
    pub insured_on_file: bool,
    pub physician: Signature,
}

/// Box 32 block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFacility {
    pub name: String,
    pub street: String,
    pub location: String,
}

/// Identifiers that sit in the payer header or unnumbered areas of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrativeIds {
    pub insurance_id: Option<String>,
    pub insurance_address2: Option<String>,
    pub insurance_city_state_zip: Option<String>,
    pub pin: Option<String>,
    pub pin1: Option<String>,
    pub group_id: Option<String>,
    pub doc_location: Option<String>,
    pub nucc_use: Option<String>,
}

/// Per-row supplemental codes printed in the shaded band of box 24.
///
/// These are indexed by form row, independent of how many service lines
/// the claim actually bills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementalCodes {
    pub supplemental: [Option<String>; MAX_SERVICE_LINES],
    pub local_use: [Option<String>; MAX_SERVICE_LINES],
    pub local_use_alt: [Option<String>; MAX_SERVICE_LINES],
    pub epsdt: [Option<EpsdtIndicator>; MAX_SERVICE_LINES],
    pub plan: [Option<String>; MAX_SERVICE_LINES],
}

/// One synthetic CMS-1500 claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub patient: Patient,
    pub coverage: Coverage,
    pub conditions: ConditionIndicators,
    pub billing: BillingProvider,
    pub referring_provider: Option<ReferringProvider>,
    pub diagnoses: Vec<Diagnosis>,
    pub service_lines: Vec<ServiceLine>,
    pub financials: Financials,
    pub timeline: EpisodeTimeline,
    pub authorization: Authorization,
    pub signatures: Signatures,
    pub service_facility: Option<ServiceFacility>,
    pub administrative: AdministrativeIds,
    pub supplemental: SupplementalCodes,
}

impl ClaimRecord {
    pub fn num_diagnoses(&self) -> usize {
        self.diagnoses.len()
    }

    pub fn num_service_lines(&self) -> usize {
        self.service_lines.len()
    }

    pub fn primary_diagnosis(&self) -> Option<&Diagnosis> {
        self.diagnoses.first()
    }

    pub fn primary_service(&self) -> Option<&ServiceLine> {
        self.service_lines.first()
    }
}
