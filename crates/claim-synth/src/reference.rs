//! Fixed administrative reference lists.

use claim_model::InsuranceCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsurerEntry {
    pub name: &'static str,
    pub address: &'static str,
}

const fn insurer(name: &'static str, address: &'static str) -> InsurerEntry {
    InsurerEntry { name, address }
}

/// Commercial payers, drawn for every category except Medicare and Medicaid.
pub const COMMERCIAL_INSURERS: [InsurerEntry; 7] = [
    insurer("Blue Cross Blue Shield", "123 Insurance Way, Hartford, CT 06103"),
    insurer("Aetna", "151 Farmington Ave, Hartford, CT 06156"),
    insurer("Cigna", "900 Cottage Grove Rd, Bloomfield, CT 06002"),
    insurer("UnitedHealth", "9900 Bren Rd E, Minnetonka, MN 55343"),
    insurer("Humana", "500 W Main St, Louisville, KY 40202"),
    insurer("Anthem", "220 Virginia Ave, Indianapolis, IN 46204"),
    insurer("Kaiser Permanente", "1 Kaiser Plaza, Oakland, CA 94612"),
];

pub const MEDICARE_INSURER: InsurerEntry =
    insurer("Medicare", "7500 Security Blvd, Baltimore, MD 21244");

pub const MEDICAID_INSURER: InsurerEntry = insurer(
    "Medicaid",
    "Centers for Medicare & Medicaid Services, Baltimore, MD 21244",
);

/// Insurer fixed by the coverage category, if any.
pub fn fixed_insurer(category: InsuranceCategory) -> Option<InsurerEntry> {
    match category {
        InsuranceCategory::Medicare => Some(MEDICARE_INSURER),
        InsuranceCategory::Medicaid => Some(MEDICAID_INSURER),
        _ => None,
    }
}

/// Box 1a policy ID pattern (`#` digit, `?` letter) for a category.
pub fn policy_id_pattern(category: InsuranceCategory) -> &'static str {
    match category {
        InsuranceCategory::Medicare => "#??######?",
        InsuranceCategory::Medicaid => "##########",
        _ => "??########",
    }
}

pub const FACILITY_NAMES: [&str; 7] = [
    "City General Hospital",
    "Regional Medical Center",
    "Outpatient Surgery Center",
    "Diagnostic Imaging Center",
    "Physical Therapy Clinic",
    "Urgent Care Center",
    "Community Health Center",
];

pub const PLAN_NAMES: [&str; 14] = [
    "HMO Basic",
    "PPO Premium",
    "EPO Standard",
    "POS Select",
    "Medicare Supplement Plan F",
    "Medicare Advantage",
    "Medigap Plan G",
    "Employee Health Plan",
    "Family Coverage",
    "Individual Plan",
    "High Deductible Health Plan",
    "Bronze Plan",
    "Silver Plan",
    "Gold Plan",
];

pub const US_STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

/// Prefixes for box 24J local-use codes (followed by three digits).
pub const LOCAL_USE_PREFIXES: [&str; 6] = ["LOC", "MED", "REG", "SPEC", "PROV", "FAC"];

/// Prefixes for per-row plan codes (followed by two digits).
pub const PLAN_CODE_PREFIXES: [&str; 6] = ["PREV", "THER", "DIAG", "SURG", "EMRG", "ROUT"];

pub const PATIENT_SIGNATURE: &str = "Patient Signature on File";
/// Box 17b qualifier for an NPI.
pub const REFERRING_QUALIFIER: &str = "1B";
