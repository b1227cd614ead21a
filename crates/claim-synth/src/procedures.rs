//! Rules derived from a procedure code: type of service, unit ranges,
//! emergency and laboratory classification.

use std::ops::RangeInclusive;

use claim_model::TypeOfService;

/// Modifiers drawn for the box 24D modifier slots.
pub const MODIFIERS: [&str; 7] = ["25", "59", "RT", "LT", "50", "26", "TC"];

/// Place-of-service codes for box 24B.
pub const PLACES_OF_SERVICE: [&str; 31] = [
    "11", "12", "21", "22", "23", "24", "25", "26", "31", "32", "33", "34", "41", "49", "50", "51",
    "52", "53", "54", "55", "56", "57", "58", "60", "61", "62", "65", "71", "72", "81", "99",
];

/// Emergency department visit codes; these lines are always flagged.
pub const EMERGENCY_CODES: [&str; 5] = ["99281", "99282", "99283", "99284", "99285"];

/// Procedures that force the box 20 outside-lab indicator to YES.
pub const LAB_SERVICE_CODES: [&str; 7] = [
    "80053", "80061", "85025", "85027", "36415", "81002", "82962",
];

fn has_any_prefix(code: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| code.starts_with(prefix))
}

/// Type of service for a procedure.
///
/// Codes matching no rule are medical care (`1`).
pub fn type_of_service(code: &str) -> TypeOfService {
    if code.starts_with("99") {
        TypeOfService::MedicalCare
    } else if has_any_prefix(code, &["10", "11", "12", "20", "21"]) {
        TypeOfService::Surgery
    } else if has_any_prefix(code, &["70", "71", "72", "73", "74", "75", "76", "77"]) {
        TypeOfService::DiagnosticXray
    } else if has_any_prefix(
        code,
        &["80", "81", "82", "83", "84", "85", "86", "87", "88", "89"],
    ) || code.starts_with("36415")
    {
        TypeOfService::DiagnosticLab
    } else if code.starts_with("90471") {
        TypeOfService::Vaccine
    } else if code.starts_with("93000") || code.starts_with("94010") {
        TypeOfService::DiagnosticXray
    } else {
        TypeOfService::MedicalCare
    }
}

/// Allowed unit counts for a procedure.
pub fn unit_range(code: &str) -> RangeInclusive<u8> {
    if code.starts_with("90471") {
        1..=1
    } else if has_any_prefix(code, &["80", "81", "82", "83", "84", "85", "86", "87", "88"]) {
        1..=2
    } else if code.starts_with("99") {
        1..=1
    } else {
        1..=5
    }
}

pub fn is_emergency_code(code: &str) -> bool {
    has_any_prefix(code, &EMERGENCY_CODES)
}

pub fn is_lab_service(code: &str) -> bool {
    has_any_prefix(code, &LAB_SERVICE_CODES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_of_service_rules() {
        assert_eq!(type_of_service("99213"), TypeOfService::MedicalCare);
        assert_eq!(type_of_service("12001"), TypeOfService::Surgery);
        assert_eq!(type_of_service("11042"), TypeOfService::Surgery);
        assert_eq!(type_of_service("71020"), TypeOfService::DiagnosticXray);
        assert_eq!(type_of_service("73060"), TypeOfService::DiagnosticXray);
        assert_eq!(type_of_service("80053"), TypeOfService::DiagnosticLab);
        assert_eq!(type_of_service("85025"), TypeOfService::DiagnosticLab);
        assert_eq!(type_of_service("36415"), TypeOfService::DiagnosticLab);
        assert_eq!(type_of_service("90471"), TypeOfService::Vaccine);
        assert_eq!(type_of_service("93000"), TypeOfService::DiagnosticXray);
        assert_eq!(type_of_service("94010"), TypeOfService::DiagnosticXray);
    }

    #[test]
    fn unmatched_codes_default_to_medical_care() {
        assert_eq!(type_of_service("G0008"), TypeOfService::MedicalCare);
        assert_eq!(type_of_service("95000"), TypeOfService::MedicalCare);
    }

    #[test]
    fn unit_ranges() {
        assert_eq!(unit_range("90471"), 1..=1);
        assert_eq!(unit_range("80053"), 1..=2);
        assert_eq!(unit_range("99214"), 1..=1);
        assert_eq!(unit_range("12001"), 1..=5);
        assert_eq!(unit_range("36415"), 1..=5);
    }

    #[test]
    fn classification() {
        assert!(is_emergency_code("99283"));
        assert!(!is_emergency_code("99213"));
        assert!(is_lab_service("36415"));
        assert!(!is_lab_service("99213"));
    }
}
