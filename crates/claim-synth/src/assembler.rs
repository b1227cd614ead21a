//! Assembly of one complete, internally consistent claim.
//!
//! Generation order matters: diagnoses are drawn before procedures so that
//! every billed procedure is compatible with at least one diagnosis, and
//! line charges are fixed before the financial totals are derived.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use claim_model::{
    AdministrativeIds, Authorization, BillingProvider, ClaimRecord, ClinicalCategory,
    ConditionIndicators, Coverage, DateRange, Diagnosis, DiagnosisPointer, Dollars,
    EpisodeTimeline, EpsdtIndicator, Financials, InsuranceCategory, InsuredAddress, Insurer,
    MAX_SERVICE_LINES, MODIFIER_SLOTS, OtherInsurance, Patient, ReferringProvider, Relationship,
    ServiceFacility, ServiceLine, Sex, Signature, Signatures, SupplementalCodes, TaxIdType, YesNo,
    max_paid,
};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::catalog::{self, DiagnosisEntry, GENERAL_PROCEDURES};
use crate::demographics::{
    address, birth_date, chance, city, city_state_zip, date_between, days_ago, fill_pattern,
    person_name, phone, provider_name, state,
};
use crate::npi::generate_npi;
use crate::options::GeneratorOptions;
use crate::procedures::{
    MODIFIERS, PLACES_OF_SERVICE, is_emergency_code, is_lab_service, type_of_service, unit_range,
};
use crate::reference::{
    COMMERCIAL_INSURERS, FACILITY_NAMES, LOCAL_USE_PREFIXES, PATIENT_SIGNATURE,
    PLAN_CODE_PREFIXES, PLAN_NAMES, REFERRING_QUALIFIER, US_STATES, fixed_insurer,
    policy_id_pattern,
};
use crate::sampler::WeightedSampler;

/// Uniformly pick one element of a non-empty slice.
fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

fn yes_no<R: Rng + ?Sized>(rng: &mut R) -> YesNo {
    YesNo::from(rng.random_bool(0.5))
}

/// Range from `start` to a uniform day between `start` and `today`.
fn range_until<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, today: NaiveDate) -> DateRange {
    let end = date_between(rng, start, today.max(start));
    DateRange::new(start, end).unwrap_or_else(|_| DateRange::single(start))
}

/// Seeded claim generator.
///
/// Two assemblers built from the same seed, reference date and options
/// produce identical record sequences.
#[derive(Debug)]
pub struct RecordAssembler {
    rng: ChaCha8Rng,
    seed: u64,
    today: NaiveDate,
    options: GeneratorOptions,
    diagnosis_count: WeightedSampler<usize>,
    pool: Vec<(ClinicalCategory, DiagnosisEntry)>,
}

impl RecordAssembler {
    pub fn new(options: GeneratorOptions) -> Self {
        let seed = options.seed.unwrap_or_else(|| rand::rng().random());
        let today = options
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        debug!(seed, %today, "claim generator initialised");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            today,
            options,
            diagnosis_count: WeightedSampler::diagnosis_count(),
            pool: catalog::diagnosis_pool(),
        }
    }

    /// Seed actually in use, including one drawn from entropy.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.today
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate the next claim.
    pub fn assemble(&mut self) -> ClaimRecord {
        let patient = self.patient();
        let coverage = self.coverage(&patient);
        let conditions = self.conditions();
        let billing = self.billing_provider();
        let diagnoses = self.diagnoses();
        let service_lines = self.service_lines(&diagnoses);
        let financials = self.financials(&service_lines);
        let timeline = self.timeline();
        let authorization = self.authorization();
        let referring_provider = self.referring_provider();
        let signatures = self.signatures(&billing);
        let service_facility = self.service_facility();
        let administrative = self.administrative_ids();
        let supplemental = self.supplemental_codes();

        let record = ClaimRecord {
            patient,
            coverage,
            conditions,
            billing,
            referring_provider,
            diagnoses,
            service_lines,
            financials,
            timeline,
            authorization,
            signatures,
            service_facility,
            administrative,
            supplemental,
        };
        debug_assert!(
            record.check_invariants().is_ok(),
            "assembled claim violates invariants: {:?}",
            record.check_invariants()
        );
        debug!(
            diagnoses = record.num_diagnoses(),
            service_lines = record.num_service_lines(),
            total_charge = record.financials.total_charge.amount(),
            "claim assembled"
        );
        record
    }

    fn patient(&mut self) -> Patient {
        let rng = &mut self.rng;
        Patient {
            name: person_name(rng),
            birth_date: birth_date(rng, self.today, 18, 80),
            sex: *pick(rng, &Sex::ALL),
            account_number: fill_pattern(rng, "####-###-####"),
            address: address(rng),
            phone: phone(rng),
        }
    }

    fn coverage(&mut self, patient: &Patient) -> Coverage {
        let rates = &self.options.rates;
        let rng = &mut self.rng;
        let category = *pick(rng, &InsuranceCategory::ALL);
        let relationship = *pick(rng, &Relationship::ALL);
        let (insured_name, insured_birth_date, insured_sex) =
            if chance(rng, rates.insured_is_patient) {
                (patient.name.clone(), patient.birth_date, patient.sex)
            } else {
                (
                    person_name(rng),
                    birth_date(rng, self.today, 18, 80),
                    *pick(rng, &Sex::ALL),
                )
            };
        let insurer = fixed_insurer(category).unwrap_or_else(|| *pick(rng, &COMMERCIAL_INSURERS));
        let insured_address = chance(rng, rates.insured_address).then(|| InsuredAddress {
            address: address(rng),
            phone: phone(rng),
        });
        let other_insurance = chance(rng, rates.secondary_insurance).then(|| OtherInsurance {
            insured_name: person_name(rng),
            policy_number: fill_pattern(rng, "??########"),
            plan_name: pick(rng, &COMMERCIAL_INSURERS).name.to_string(),
        });
        let plan_name = chance(rng, rates.plan_name).then(|| pick(rng, &PLAN_NAMES).to_string());
        let group_number =
            chance(rng, rates.group_number).then(|| fill_pattern(rng, "GRP######"));
        trace!(category = %category, insurer = insurer.name, "coverage drawn");
        Coverage {
            category,
            policy_id: fill_pattern(rng, policy_id_pattern(category)),
            insured_name,
            insured_birth_date,
            insured_sex,
            relationship,
            insurer: Insurer {
                name: insurer.name.to_string(),
                address: insurer.address.to_string(),
            },
            insured_address,
            other_insurance,
            plan_name,
            group_number,
            other_benefit_plan: yes_no(rng),
        }
    }

    fn conditions(&mut self) -> ConditionIndicators {
        let rng = &mut self.rng;
        let employment = yes_no(rng);
        let auto_accident = yes_no(rng);
        let other_accident = yes_no(rng);
        let accident_place = (auto_accident.is_yes() || other_accident.is_yes())
            .then(|| pick(rng, &US_STATES).to_string());
        ConditionIndicators {
            employment,
            auto_accident,
            other_accident,
            accident_place,
        }
    }

    fn billing_provider(&mut self) -> BillingProvider {
        let rng = &mut self.rng;
        BillingProvider {
            name: provider_name(rng),
            address: address(rng).single_line(),
            phone: phone(rng),
            npi: generate_npi(rng),
            tax_id: fill_pattern(rng, "##-#######"),
            tax_id_type: *pick(rng, &TaxIdType::ALL),
        }
    }

    fn diagnoses(&mut self) -> Vec<Diagnosis> {
        let count = self
            .diagnosis_count
            .sample(&mut self.rng)
            .clamp(1, self.pool.len());
        index::sample(&mut self.rng, self.pool.len(), count)
            .into_iter()
            .map(|i| {
                let (category, entry) = self.pool[i];
                Diagnosis {
                    code: entry.code.to_string(),
                    description: entry.description.to_string(),
                    category,
                }
            })
            .collect()
    }

    /// Unique procedure codes for the claim, compatible with `diagnoses`
    /// or drawn from the general list when the compatible set is too small.
    fn procedure_codes(&mut self, diagnoses: &[Diagnosis]) -> Vec<&'static str> {
        let codes: Vec<&str> = diagnoses.iter().map(|dx| dx.code.as_str()).collect();
        let compatible = catalog::compatible_procedures(&codes);
        let mut line_count = self.rng.random_range(1..=MAX_SERVICE_LINES);
        let available: Vec<&'static str> = if compatible.len() >= line_count {
            compatible.into_iter().collect()
        } else {
            let widened: BTreeSet<&'static str> =
                compatible.into_iter().chain(GENERAL_PROCEDURES).collect();
            line_count = line_count.min(widened.len());
            widened.into_iter().collect()
        };
        index::sample(&mut self.rng, available.len(), line_count)
            .into_iter()
            .map(|i| available[i])
            .collect()
    }

    fn service_lines(&mut self, diagnoses: &[Diagnosis]) -> Vec<ServiceLine> {
        let max_pointer = diagnoses
            .len()
            .saturating_sub(1)
            .min(usize::from(DiagnosisPointer::MAX_LETTERS) - 1);
        self.procedure_codes(diagnoses)
            .into_iter()
            .map(|code| self.service_line(code, max_pointer))
            .collect()
    }

    fn service_line(&mut self, code: &'static str, max_pointer: usize) -> ServiceLine {
        let rates = &self.options.rates;
        let rng = &mut self.rng;
        let mut modifiers: [Option<String>; MODIFIER_SLOTS] = Default::default();
        for (slot, modifier) in modifiers.iter_mut().enumerate() {
            let percent = if slot == 0 {
                rates.primary_modifier
            } else {
                rates.extra_modifier
            };
            *modifier = chance(rng, percent).then(|| pick(rng, &MODIFIERS).to_string());
        }

        let description = catalog::procedure_description(code)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Medical service for {code}"));
        let emergency = is_emergency_code(code) || chance(rng, rates.emergency);
        let day = days_ago(rng, self.today, 30, 0);
        let pointer_index = rng.random_range(0..=max_pointer);
        let diagnosis_pointer = DiagnosisPointer::saturating(pointer_index);
        ServiceLine {
            procedure_code: code.to_string(),
            description,
            modifiers,
            place_of_service: pick(rng, &PLACES_OF_SERVICE).to_string(),
            type_of_service: type_of_service(code),
            emergency,
            dates: DateRange::single(day),
            charge: Dollars(rng.random_range(self.options.charge_range())),
            units: rng.random_range(unit_range(code)),
            days: chance(rng, rates.service_days).then(|| rng.random_range(1..=30)),
            diagnosis_pointer,
        }
    }

    fn financials(&mut self, lines: &[ServiceLine]) -> Financials {
        let rng = &mut self.rng;
        let total_charge: Dollars = lines.iter().map(|line| line.charge).sum();
        let amount_paid = Dollars(rng.random_range(0..=max_paid(total_charge).amount()));
        let has_lab = lines.iter().any(|line| is_lab_service(&line.procedure_code));
        let drawn_lab = yes_no(rng);
        Financials {
            total_charge,
            amount_paid,
            balance_due: Dollars(total_charge.amount() - amount_paid.amount()),
            outside_lab: if has_lab { YesNo::Yes } else { drawn_lab },
            accept_assignment: yes_no(rng),
        }
    }

    fn timeline(&mut self) -> EpisodeTimeline {
        let rates = &self.options.rates;
        let today = self.today;
        let rng = &mut self.rng;
        let illness_onset = chance(rng, rates.illness_onset).then(|| days_ago(rng, today, 365, 30));
        let similar_illness =
            chance(rng, rates.similar_illness).then(|| days_ago(rng, today, 730, 182));
        let work_disability = chance(rng, rates.work_disability).then(|| {
            let start = days_ago(rng, today, 90, 7);
            range_until(rng, start, today)
        });
        let hospitalization = chance(rng, rates.hospitalization).then(|| {
            let admit = days_ago(rng, today, 30, 3);
            range_until(rng, admit, today)
        });
        EpisodeTimeline {
            illness_onset,
            similar_illness,
            work_disability,
            hospitalization,
        }
    }

    fn authorization(&mut self) -> Authorization {
        let rates = &self.options.rates;
        let rng = &mut self.rng;
        Authorization {
            prior_authorization: chance(rng, rates.prior_authorization)
                .then(|| fill_pattern(rng, "PA########")),
            original_reference: chance(rng, rates.original_reference)
                .then(|| fill_pattern(rng, "REF#######")),
            medicaid_resubmission: chance(rng, rates.medicaid_resubmission)
                .then(|| fill_pattern(rng, "###")),
        }
    }

    fn referring_provider(&mut self) -> Option<ReferringProvider> {
        let rng = &mut self.rng;
        chance(rng, self.options.rates.referring_provider).then(|| ReferringProvider {
            name: provider_name(rng),
            npi: generate_npi(rng),
            qualifier: REFERRING_QUALIFIER.to_string(),
        })
    }

    fn signatures(&mut self, billing: &BillingProvider) -> Signatures {
        let rates = &self.options.rates;
        let today = self.today;
        let rng = &mut self.rng;
        let patient = chance(rng, rates.patient_signature).then(|| Signature {
            signer: PATIENT_SIGNATURE.to_string(),
            date: days_ago(rng, today, 30, 0),
        });
        let insured_on_file = chance(rng, rates.insured_signature);
        Signatures {
            patient,
            insured_on_file,
            physician: Signature {
                signer: billing.name.clone(),
                date: days_ago(rng, today, 7, 0),
            },
        }
    }

    fn service_facility(&mut self) -> Option<ServiceFacility> {
        let rng = &mut self.rng;
        chance(rng, self.options.rates.service_facility).then(|| ServiceFacility {
            name: pick(rng, &FACILITY_NAMES).to_string(),
            street: address(rng).single_line(),
            location: city_state_zip(rng),
        })
    }

    fn administrative_ids(&mut self) -> AdministrativeIds {
        let rates = &self.options.rates;
        let rng = &mut self.rng;
        AdministrativeIds {
            insurance_id: chance(rng, rates.insurance_id).then(|| fill_pattern(rng, "##########")),
            insurance_address2: chance(rng, rates.insurance_suite)
                .then(|| format!("Suite {}", rng.random_range(100..=999))),
            insurance_city_state_zip: chance(rng, rates.insurance_city_state_zip)
                .then(|| city_state_zip(rng)),
            pin: chance(rng, rates.pin).then(|| fill_pattern(rng, "##########")),
            pin1: chance(rng, rates.pin1).then(|| fill_pattern(rng, "##########")),
            group_id: chance(rng, rates.group_id).then(|| fill_pattern(rng, "######")),
            doc_location: chance(rng, rates.doc_location)
                .then(|| format!("{}, {}", city(rng), state(rng))),
            nucc_use: chance(rng, rates.nucc_use).then(|| fill_pattern(rng, "NUCC###")),
        }
    }

    fn supplemental_codes(&mut self) -> SupplementalCodes {
        let rates = &self.options.rates;
        let rng = &mut self.rng;
        let mut codes = SupplementalCodes::default();
        for slot in 0..MAX_SERVICE_LINES {
            codes.supplemental[slot] =
                chance(rng, rates.supplemental).then(|| fill_pattern(rng, "SUP###"));
        }
        for slot in 0..MAX_SERVICE_LINES {
            codes.local_use[slot] = chance(rng, rates.local_use).then(|| local_use_code(rng));
            codes.local_use_alt[slot] = chance(rng, rates.local_use).then(|| local_use_code(rng));
        }
        for slot in 0..MAX_SERVICE_LINES {
            codes.epsdt[slot] = chance(rng, rates.epsdt).then(|| *pick(rng, &EpsdtIndicator::ALL));
        }
        for slot in 0..MAX_SERVICE_LINES {
            codes.plan[slot] = chance(rng, rates.plan_code).then(|| {
                let prefix = pick(rng, &PLAN_CODE_PREFIXES);
                format!("{prefix}{}", fill_pattern(rng, "##"))
            });
        }
        codes
    }
}

fn local_use_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix = pick(rng, &LOCAL_USE_PREFIXES);
    format!("{prefix}{}", fill_pattern(rng, "###"))
}
