//! Integration tests for claim generation.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use claim_model::{ClinicalCategory, InsuranceCategory, Npi, max_paid};
use claim_synth::catalog::GENERAL_PROCEDURES;
use claim_synth::{
    GeneratorOptions, PresenceRates, RecordAssembler, compatible_procedures,
};
use proptest::prelude::*;

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

fn assembler(seed: u64) -> RecordAssembler {
    RecordAssembler::new(
        GeneratorOptions::new()
            .with_seed(seed)
            .with_reference_date(reference_date()),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn financials_reconcile(seed in any::<u64>()) {
        let record = assembler(seed).assemble();
        let sum: u32 = record.service_lines.iter().map(|line| line.charge.amount()).sum();
        let financials = &record.financials;
        prop_assert_eq!(financials.total_charge.amount(), sum);
        prop_assert!(financials.amount_paid <= max_paid(financials.total_charge));
        prop_assert_eq!(
            financials.balance_due.amount() + financials.amount_paid.amount(),
            financials.total_charge.amount()
        );
    }

    #[test]
    fn counts_and_uniqueness(seed in any::<u64>()) {
        let record = assembler(seed).assemble();
        prop_assert!((1..=12).contains(&record.diagnoses.len()));
        prop_assert!((1..=6).contains(&record.service_lines.len()));
        let codes: BTreeSet<_> = record.diagnoses.iter().map(|dx| dx.code.as_str()).collect();
        prop_assert_eq!(codes.len(), record.diagnoses.len());
        let procedures: BTreeSet<_> = record
            .service_lines
            .iter()
            .map(|line| line.procedure_code.as_str())
            .collect();
        prop_assert_eq!(procedures.len(), record.service_lines.len());
    }

    #[test]
    fn procedures_come_from_compatible_or_general_set(seed in any::<u64>()) {
        let record = assembler(seed).assemble();
        let codes: Vec<&str> = record.diagnoses.iter().map(|dx| dx.code.as_str()).collect();
        let compatible = compatible_procedures(&codes);
        for line in &record.service_lines {
            let code = line.procedure_code.as_str();
            prop_assert!(
                compatible.contains(code) || GENERAL_PROCEDURES.contains(&code),
                "{} is neither compatible nor general", code
            );
        }
    }

    #[test]
    fn pointers_reference_existing_diagnoses(seed in any::<u64>()) {
        let record = assembler(seed).assemble();
        let limit = record.diagnoses.len().min(6);
        for line in &record.service_lines {
            prop_assert!(line.diagnosis_pointer.index() < limit);
            prop_assert!(line.diagnosis_pointer.letter() <= 'F');
        }
    }

    #[test]
    fn identifiers_pass_checksum(seed in any::<u64>()) {
        let record = assembler(seed).assemble();
        prop_assert!(Npi::is_valid(record.billing.npi.as_str()));
        if let Some(referring) = &record.referring_provider {
            prop_assert!(Npi::is_valid(referring.npi.as_str()));
            prop_assert_eq!(referring.qualifier.as_str(), "1B");
        }
    }

    #[test]
    fn dates_are_ordered(seed in any::<u64>()) {
        let record = assembler(seed).assemble();
        let today = reference_date();
        let timeline = &record.timeline;
        for range in [timeline.work_disability, timeline.hospitalization].into_iter().flatten() {
            prop_assert!(range.end() >= range.start());
            prop_assert!(range.end() <= today);
        }
        if let Some(onset) = timeline.illness_onset {
            prop_assert!(onset <= today);
        }
        for line in &record.service_lines {
            prop_assert_eq!(line.dates.start(), line.dates.end());
        }
    }

    #[test]
    fn invariants_hold(seed in any::<u64>()) {
        prop_assert!(assembler(seed).assemble().check_invariants().is_ok());
    }
}

#[test]
fn medicare_claims_use_the_fixed_insurer() {
    let mut assembler = assembler(2024);
    let mut medicare_seen = 0;
    for _ in 0..300 {
        let record = assembler.assemble();
        if record.coverage.category == InsuranceCategory::Medicare {
            medicare_seen += 1;
            assert_eq!(record.coverage.insurer.name, "Medicare");
            assert_eq!(
                record.coverage.insurer.address,
                "7500 Security Blvd, Baltimore, MD 21244"
            );
        }
    }
    assert!(medicare_seen > 0);
}

#[test]
fn diabetes_only_claims_bill_diabetes_procedures() {
    let diabetes: BTreeSet<&str> = ["99213", "99214", "80053", "85025"].into_iter().collect();
    let mut assembler = assembler(77);
    let mut seen = 0;
    for _ in 0..2_000 {
        let record = assembler.assemble();
        let only_diabetes = record
            .diagnoses
            .iter()
            .all(|dx| dx.category == ClinicalCategory::Diabetes);
        if !only_diabetes || record.service_lines.len() > diabetes.len() {
            continue;
        }
        seen += 1;
        let codes: Vec<&str> = record.diagnoses.iter().map(|dx| dx.code.as_str()).collect();
        assert_eq!(compatible_procedures(&codes), diabetes);
        for line in &record.service_lines {
            assert!(diabetes.contains(line.procedure_code.as_str()));
        }
    }
    assert!(seen > 0);
}

#[test]
fn accident_place_tracks_indicators() {
    let mut assembler = assembler(5);
    for _ in 0..200 {
        let record = assembler.assemble();
        let conditions = &record.conditions;
        assert_eq!(
            conditions.accident_place.is_some(),
            conditions.auto_accident.is_yes() || conditions.other_accident.is_yes()
        );
    }
}

#[test]
fn lab_services_force_outside_lab() {
    let mut assembler = assembler(8);
    for _ in 0..200 {
        let record = assembler.assemble();
        let has_lab = record
            .service_lines
            .iter()
            .any(|line| claim_synth::procedures::is_lab_service(&line.procedure_code));
        if has_lab {
            assert!(record.financials.outside_lab.is_yes());
        }
    }
}

#[test]
fn presence_rates_control_optional_blocks() {
    let mut always = RecordAssembler::new(
        GeneratorOptions::new()
            .with_seed(1)
            .with_reference_date(reference_date())
            .with_rates(PresenceRates::always()),
    );
    let record = always.assemble();
    assert!(record.referring_provider.is_some());
    assert!(record.service_facility.is_some());
    assert!(record.coverage.other_insurance.is_some());
    assert!(record.timeline.hospitalization.is_some());
    assert!(record.supplemental.plan.iter().all(Option::is_some));
    assert!(record.service_lines.iter().all(|line| line.emergency));
    assert!(record.service_lines.iter().all(|line| line.modifiers.iter().all(Option::is_some)));

    let mut never = RecordAssembler::new(
        GeneratorOptions::new()
            .with_seed(1)
            .with_reference_date(reference_date())
            .with_rates(PresenceRates::never()),
    );
    let record = never.assemble();
    assert!(record.referring_provider.is_none());
    assert!(record.service_facility.is_none());
    assert!(record.signatures.patient.is_none());
    assert_eq!(record.timeline, Default::default());
    assert!(record.supplemental.epsdt.iter().all(Option::is_none));
}

#[test]
fn seeded_sequences_are_reproducible() {
    let mut a = assembler(31);
    let mut b = assembler(31);
    for _ in 0..10 {
        assert_eq!(a.assemble(), b.assemble());
    }
    assert_eq!(a.seed(), 31);
}
