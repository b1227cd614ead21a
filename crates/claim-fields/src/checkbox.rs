//! Encoding table for checkbox and radio groups.
//!
//! The fillable template models each box as a button group whose kids carry
//! export names. A group is set by naming the kid to turn on; the token here
//! is that export name without the leading `/`.

use std::fmt;

use serde::Serialize;

use crate::key::FieldKey;
use crate::value::FieldValue;

/// Export name of the button to select within a group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SelectionToken(String);

impl SelectionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// PDF name form, `/TOKEN`.
    pub fn pdf_name(&self) -> String {
        format!("/{}", self.0)
    }
}

impl fmt::Display for SelectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckboxGroup {
    InsuranceType,
    PatientSex,
    Relationship,
    Employment,
    AutoAccident,
    OtherAccident,
    InsuredSex,
    OtherBenefitPlan,
    OutsideLab,
    TaxIdType,
    AcceptAssignment,
}

const YES_NO: &[(&str, &str)] = &[("YES", "YES"), ("NO", "NO")];

impl CheckboxGroup {
    pub const ALL: [CheckboxGroup; 11] = [
        CheckboxGroup::InsuranceType,
        CheckboxGroup::PatientSex,
        CheckboxGroup::Relationship,
        CheckboxGroup::Employment,
        CheckboxGroup::AutoAccident,
        CheckboxGroup::OtherAccident,
        CheckboxGroup::InsuredSex,
        CheckboxGroup::OtherBenefitPlan,
        CheckboxGroup::OutsideLab,
        CheckboxGroup::TaxIdType,
        CheckboxGroup::AcceptAssignment,
    ];

    /// Name of the button group in the fillable template.
    pub fn form_field(self) -> &'static str {
        match self {
            CheckboxGroup::InsuranceType => "insurance_type",
            CheckboxGroup::PatientSex => "sex",
            CheckboxGroup::Relationship => "rel_to_ins",
            CheckboxGroup::Employment => "employment",
            CheckboxGroup::AutoAccident => "pt_auto_accident",
            CheckboxGroup::OtherAccident => "other_accident",
            CheckboxGroup::InsuredSex => "ins_sex",
            CheckboxGroup::OtherBenefitPlan => "ins_benefit_plan",
            CheckboxGroup::OutsideLab => "lab",
            CheckboxGroup::TaxIdType => "ssn",
            CheckboxGroup::AcceptAssignment => "assignment",
        }
    }

    /// Projected field whose value selects the button.
    pub fn source(self) -> FieldKey {
        match self {
            CheckboxGroup::InsuranceType => FieldKey::InsuranceTypeIndex,
            CheckboxGroup::PatientSex => FieldKey::PatientSex,
            CheckboxGroup::Relationship => FieldKey::PatientRelationship,
            CheckboxGroup::Employment => FieldKey::EmploymentRelated,
            CheckboxGroup::AutoAccident => FieldKey::AutoAccidentRelated,
            CheckboxGroup::OtherAccident => FieldKey::OtherAccidentRelated,
            CheckboxGroup::InsuredSex => FieldKey::InsuredSex,
            CheckboxGroup::OtherBenefitPlan => FieldKey::OtherHealthBenefitPlan,
            CheckboxGroup::OutsideLab => FieldKey::OutsideLab,
            CheckboxGroup::TaxIdType => FieldKey::TaxIdType,
            CheckboxGroup::AcceptAssignment => FieldKey::AcceptAssignment,
        }
    }

    /// `(projected value, token)` pairs. Insurance type is keyed by the
    /// decimal radio index.
    pub fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            CheckboxGroup::InsuranceType => &[
                ("0", "Medicare"),
                ("1", "Medicaid"),
                ("2", "Tricare"),
                ("3", "Champva"),
                ("4", "Group"),
                ("5", "Feca"),
                ("6", "Other"),
            ],
            CheckboxGroup::PatientSex => &[("M", "M"), ("F", "F")],
            CheckboxGroup::Relationship => &[("S", "S"), ("M", "M"), ("C", "C"), ("O", "O")],
            CheckboxGroup::InsuredSex => &[("MALE", "MALE"), ("FEMALE", "FEMALE")],
            CheckboxGroup::TaxIdType => &[("SSN", "SSN"), ("EIN", "EIN")],
            CheckboxGroup::Employment
            | CheckboxGroup::AutoAccident
            | CheckboxGroup::OtherAccident
            | CheckboxGroup::OtherBenefitPlan
            | CheckboxGroup::OutsideLab
            | CheckboxGroup::AcceptAssignment => YES_NO,
        }
    }

    /// Token for a projected value; `None` when the value is not in the table.
    pub fn encode(self, value: &FieldValue) -> Option<SelectionToken> {
        let raw = value.to_string();
        self.table()
            .iter()
            .find(|(input, _)| *input == raw)
            .map(|(_, token)| SelectionToken((*token).to_string()))
    }
}

impl fmt::Display for CheckboxGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_field())
    }
}
