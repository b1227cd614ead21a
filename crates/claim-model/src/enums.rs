//! Coded values that appear as checkboxes, radio groups or short codes on
//! the CMS-1500 form.
//!
//! Each enum exposes the code printed on (or exported by) the form through
//! `as_str`, so the projection layer never hand-writes these literals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Box 1 insurance program.
///
/// The discriminant order matches the radio-button order on the form and
/// is exposed through [`InsuranceCategory::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InsuranceCategory {
    Medicare,
    Medicaid,
    Tricare,
    Champva,
    GroupHealthPlan,
    FecaBlackLung,
    Other,
}

impl InsuranceCategory {
    pub const ALL: [InsuranceCategory; 7] = [
        InsuranceCategory::Medicare,
        InsuranceCategory::Medicaid,
        InsuranceCategory::Tricare,
        InsuranceCategory::Champva,
        InsuranceCategory::GroupHealthPlan,
        InsuranceCategory::FecaBlackLung,
        InsuranceCategory::Other,
    ];

    /// Position of the program in the box 1 radio group (0-based).
    pub fn index(self) -> u8 {
        match self {
            InsuranceCategory::Medicare => 0,
            InsuranceCategory::Medicaid => 1,
            InsuranceCategory::Tricare => 2,
            InsuranceCategory::Champva => 3,
            InsuranceCategory::GroupHealthPlan => 4,
            InsuranceCategory::FecaBlackLung => 5,
            InsuranceCategory::Other => 6,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Program name as printed in box 1.
    pub fn as_str(self) -> &'static str {
        match self {
            InsuranceCategory::Medicare => "Medicare",
            InsuranceCategory::Medicaid => "Medicaid",
            InsuranceCategory::Tricare => "Tricare/Champus",
            InsuranceCategory::Champva => "Champva",
            InsuranceCategory::GroupHealthPlan => "Group Health Plan",
            InsuranceCategory::FecaBlackLung => "FECA BLK LUNG",
            InsuranceCategory::Other => "Other",
        }
    }
}

impl fmt::Display for InsuranceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsuranceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown insurance category: {s}"))
    }
}

/// Administrative sex.
///
/// Box 3 (patient) uses single-letter codes while box 11a (insured) uses
/// the spelled-out words, so both renderings live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    /// Box 3 code: `M` or `F`.
    pub fn patient_code(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }

    /// Box 11a code: `MALE` or `FEMALE`.
    pub fn insured_code(self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Box 6 patient relationship to insured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    #[serde(rename = "self")]
    SelfInsured,
    Spouse,
    Child,
    Other,
}

impl Relationship {
    pub const ALL: [Relationship; 4] = [
        Relationship::SelfInsured,
        Relationship::Spouse,
        Relationship::Child,
        Relationship::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::SelfInsured => "S",
            Relationship::Spouse => "M",
            Relationship::Child => "C",
            Relationship::Other => "O",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Relationship::SelfInsured => "Self",
            Relationship::Spouse => "Spouse",
            Relationship::Child => "Child",
            Relationship::Other => "Other",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// YES/NO checkbox pair (boxes 10a-c, 11d, 20, 27).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        matches!(self, YesNo::Yes)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "YES",
            YesNo::No => "NO",
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Box 25 federal tax ID kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxIdType {
    Ssn,
    Ein,
}

impl TaxIdType {
    pub const ALL: [TaxIdType; 2] = [TaxIdType::Ssn, TaxIdType::Ein];

    pub fn as_str(self) -> &'static str {
        match self {
            TaxIdType::Ssn => "SSN",
            TaxIdType::Ein => "EIN",
        }
    }
}

impl fmt::Display for TaxIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-of-service code carried on each service line.
///
/// Only the categories the procedure catalog can produce are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeOfService {
    /// `1`: medical care, including evaluation and management.
    MedicalCare,
    /// `2`: surgery.
    Surgery,
    /// `3`: consultation.
    Consultation,
    /// `4`: diagnostic X-ray and other diagnostic tests.
    DiagnosticXray,
    /// `5`: diagnostic laboratory.
    DiagnosticLab,
    /// `V`: pneumococcal/influenza vaccine and immunization administration.
    Vaccine,
}

impl TypeOfService {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeOfService::MedicalCare => "1",
            TypeOfService::Surgery => "2",
            TypeOfService::Consultation => "3",
            TypeOfService::DiagnosticXray => "4",
            TypeOfService::DiagnosticLab => "5",
            TypeOfService::Vaccine => "V",
        }
    }
}

impl fmt::Display for TypeOfService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Box 24H EPSDT indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpsdtIndicator {
    Yes,
    No,
    Pending,
}

impl EpsdtIndicator {
    pub const ALL: [EpsdtIndicator; 3] = [
        EpsdtIndicator::Yes,
        EpsdtIndicator::No,
        EpsdtIndicator::Pending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EpsdtIndicator::Yes => "Y",
            EpsdtIndicator::No => "N",
            EpsdtIndicator::Pending => "P",
        }
    }
}

/// Clinical grouping used to pair diagnoses with plausible procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalCategory {
    Diabetes,
    Hypertension,
    Respiratory,
    Preventive,
    Infection,
    Injury,
    Symptoms,
}

impl ClinicalCategory {
    pub const ALL: [ClinicalCategory; 7] = [
        ClinicalCategory::Diabetes,
        ClinicalCategory::Hypertension,
        ClinicalCategory::Respiratory,
        ClinicalCategory::Preventive,
        ClinicalCategory::Infection,
        ClinicalCategory::Injury,
        ClinicalCategory::Symptoms,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClinicalCategory::Diabetes => "diabetes",
            ClinicalCategory::Hypertension => "hypertension",
            ClinicalCategory::Respiratory => "respiratory",
            ClinicalCategory::Preventive => "preventive",
            ClinicalCategory::Infection => "infection",
            ClinicalCategory::Injury => "injury",
            ClinicalCategory::Symptoms => "symptoms",
        }
    }
}

impl fmt::Display for ClinicalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
