//! Static clinical reference data.
//!
//! Diagnoses are grouped into seven clinical categories, each paired with
//! the procedures a claim for that category plausibly bills.

use std::collections::BTreeSet;

use claim_model::ClinicalCategory;

/// One ICD-10-CM entry in the diagnosis pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosisEntry {
    pub code: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryEntry {
    pub category: ClinicalCategory,
    pub diagnoses: &'static [DiagnosisEntry],
    pub procedures: &'static [&'static str],
}

const fn dx(code: &'static str, description: &'static str) -> DiagnosisEntry {
    DiagnosisEntry { code, description }
}

pub const CATEGORIES: [CategoryEntry; 7] = [
    CategoryEntry {
        category: ClinicalCategory::Diabetes,
        diagnoses: &[
            dx("E11.9", "Type 2 diabetes mellitus without complications"),
            dx(
                "E11.40",
                "Type 2 diabetes mellitus with diabetic neuropathy, unspecified",
            ),
            dx("E11.65", "Type 2 diabetes mellitus with hyperglycemia"),
        ],
        procedures: &["99213", "99214", "80053", "85025"],
    },
    CategoryEntry {
        category: ClinicalCategory::Hypertension,
        diagnoses: &[
            dx("I10", "Essential hypertension"),
            dx(
                "I12.9",
                "Hypertensive chronic kidney disease with stage 1 through stage 4 chronic kidney disease, or unspecified chronic kidney disease",
            ),
        ],
        procedures: &["99213", "93000", "80053"],
    },
    CategoryEntry {
        category: ClinicalCategory::Respiratory,
        diagnoses: &[
            dx(
                "J44.1",
                "Chronic obstructive pulmonary disease with acute exacerbation",
            ),
            dx("J45.9", "Asthma, unspecified"),
            dx("J06.9", "Acute upper respiratory infection, unspecified"),
        ],
        procedures: &["99213", "94010", "71020"],
    },
    CategoryEntry {
        category: ClinicalCategory::Preventive,
        diagnoses: &[dx(
            "Z00.00",
            "Encounter for general adult medical examination without abnormal findings",
        )],
        procedures: &["99396", "85025", "80053", "90471"],
    },
    CategoryEntry {
        category: ClinicalCategory::Infection,
        diagnoses: &[
            dx("A49.9", "Bacterial infection, unspecified"),
            dx("B34.9", "Viral infection, unspecified"),
        ],
        procedures: &["99213", "85025", "36415"],
    },
    CategoryEntry {
        category: ClinicalCategory::Injury,
        diagnoses: &[
            dx(
                "S72.001A",
                "Fracture of unspecified part of neck of right femur, initial encounter for closed fracture",
            ),
            dx("T14.90XA", "Injury, unspecified, initial encounter"),
        ],
        procedures: &["99283", "73060", "12001"],
    },
    CategoryEntry {
        category: ClinicalCategory::Symptoms,
        diagnoses: &[
            dx("R50.9", "Fever, unspecified"),
            dx("R06.02", "Shortness of breath"),
            dx("R51", "Headache"),
        ],
        procedures: &["99213", "99214", "85025"],
    },
];

/// Procedures used when no diagnosis matches any category.
pub const FALLBACK_PROCEDURES: [&str; 4] = ["99213", "99214", "99203", "85025"];

/// Procedures used to widen a compatible set that is smaller than the
/// requested number of service lines.
pub const GENERAL_PROCEDURES: [&str; 14] = [
    "99213", "99214", "99203", "99204", "85025", "80053", "36415", "90471", "93000", "94010",
    "71020", "73030", "12001", "11042",
];

const PROCEDURE_DESCRIPTIONS: [(&str, &str); 24] = [
    ("99213", "Office visit, established patient, moderate complexity"),
    ("99214", "Office visit, established patient, high complexity"),
    ("99203", "Office visit, new patient, moderate complexity"),
    ("99204", "Office visit, new patient, high complexity"),
    ("99282", "Emergency department visit, moderate complexity"),
    ("99283", "Emergency department visit, high complexity"),
    ("99395", "Periodic comprehensive preventive medicine, 18-39 years"),
    ("99396", "Periodic comprehensive preventive medicine, 40-64 years"),
    ("99397", "Periodic comprehensive preventive medicine, 65+ years"),
    ("80053", "Comprehensive metabolic panel"),
    ("85025", "Complete blood count with differential"),
    ("36415", "Routine venipuncture for collection of specimen"),
    ("80061", "Lipid panel"),
    ("85027", "Complete blood count, automated"),
    ("73030", "Radiologic examination, shoulder, 2 views"),
    ("71020", "Radiologic examination, chest, 2 views"),
    ("73060", "Radiologic examination, knee, 2 views"),
    ("72148", "MRI lumbar spine without contrast"),
    ("12001", "Simple repair of superficial wounds of scalp, neck"),
    ("11042", "Debridement, subcutaneous tissue"),
    ("20610", "Arthrocentesis, major joint"),
    ("90471", "Immunization administration"),
    ("93000", "Electrocardiogram, routine ECG with interpretation"),
    ("94010", "Spirometry"),
];

/// Text before the first `.`, e.g. `E11` for `E11.65`.
fn root_segment(code: &str) -> &str {
    code.split('.').next().unwrap_or(code)
}

fn matches_category(code: &str, entry: &CategoryEntry) -> bool {
    entry
        .diagnoses
        .iter()
        .any(|diagnosis| code.starts_with(root_segment(diagnosis.code)))
}

/// Every diagnosis in the catalog paired with its category, in table order.
pub fn diagnosis_pool() -> Vec<(ClinicalCategory, DiagnosisEntry)> {
    CATEGORIES
        .iter()
        .flat_map(|entry| entry.diagnoses.iter().map(|dx| (entry.category, *dx)))
        .collect()
}

/// Category that lists `code` verbatim.
pub fn category_of(code: &str) -> Option<ClinicalCategory> {
    CATEGORIES
        .iter()
        .find(|entry| entry.diagnoses.iter().any(|dx| dx.code == code))
        .map(|entry| entry.category)
}

/// Union of the procedures of every category matched by `codes`.
///
/// Falls back to [`FALLBACK_PROCEDURES`] when nothing matches, so the result
/// is never empty.
pub fn compatible_procedures<S: AsRef<str>>(codes: &[S]) -> BTreeSet<&'static str> {
    let matched: BTreeSet<&'static str> = CATEGORIES
        .iter()
        .filter(|entry| {
            codes
                .iter()
                .any(|code| matches_category(code.as_ref(), entry))
        })
        .flat_map(|entry| entry.procedures.iter().copied())
        .collect();
    if matched.is_empty() {
        FALLBACK_PROCEDURES.into_iter().collect()
    } else {
        matched
    }
}

pub fn procedure_description(code: &str) -> Option<&'static str> {
    PROCEDURE_DESCRIPTIONS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, description)| *description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_has_eighteen_unique_codes() {
        let pool = diagnosis_pool();
        assert_eq!(pool.len(), 18);
        let unique: BTreeSet<_> = pool.iter().map(|(_, dx)| dx.code).collect();
        assert_eq!(unique.len(), 18);
    }

    #[test]
    fn every_pool_code_belongs_to_one_category() {
        for (category, dx) in diagnosis_pool() {
            let matching: Vec<_> = CATEGORIES
                .iter()
                .filter(|entry| matches_category(dx.code, entry))
                .collect();
            assert_eq!(matching.len(), 1, "{} matched {}", dx.code, matching.len());
            assert_eq!(matching[0].category, category);
            assert_eq!(category_of(dx.code), Some(category));
        }
    }

    #[test]
    fn diabetes_only_yields_diabetes_procedures() {
        let set = compatible_procedures(&["E11.9", "E11.65"]);
        let expected: BTreeSet<_> = ["99213", "99214", "80053", "85025"].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn categories_union() {
        let set = compatible_procedures(&["I10", "J45.9"]);
        let expected: BTreeSet<_> = ["99213", "93000", "80053", "94010", "71020"]
            .into_iter()
            .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn root_segment_matches_other_codes_in_the_family() {
        // E11.21 is not in the table but shares the E11 root.
        let set = compatible_procedures(&["E11.21"]);
        assert!(set.contains("80053"));
    }

    #[test]
    fn unknown_codes_use_fallback() {
        let set = compatible_procedures(&["F41.9"]);
        let expected: BTreeSet<_> = FALLBACK_PROCEDURES.into_iter().collect();
        assert_eq!(set, expected);
        let empty: [&str; 0] = [];
        assert_eq!(compatible_procedures(&empty), expected);
    }

    #[test]
    fn every_catalog_procedure_has_a_description() {
        let all = CATEGORIES
            .iter()
            .flat_map(|entry| entry.procedures.iter().copied())
            .chain(GENERAL_PROCEDURES)
            .chain(FALLBACK_PROCEDURES);
        for code in all {
            assert!(procedure_description(code).is_some(), "{code}");
        }
    }
}
