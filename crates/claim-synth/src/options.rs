//! Configuration options for claim generation.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Presence probabilities, in whole percent, for optional fields and blocks.
///
/// Each value is compared against a uniform draw in `1..=100`, so `0` never
/// fires and `100` always does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRates {
    pub insured_is_patient: u8,
    pub primary_modifier: u8,
    /// Applies to each of the three extra modifier slots independently.
    pub extra_modifier: u8,
    pub emergency: u8,
    pub service_days: u8,

    pub illness_onset: u8,
    pub similar_illness: u8,
    pub work_disability: u8,
    pub hospitalization: u8,

    pub secondary_insurance: u8,
    pub prior_authorization: u8,
    pub original_reference: u8,
    pub medicaid_resubmission: u8,
    pub referring_provider: u8,
    pub patient_signature: u8,
    pub insured_signature: u8,
    pub service_facility: u8,
    pub insured_address: u8,
    pub plan_name: u8,

    pub insurance_id: u8,
    pub insurance_suite: u8,
    pub insurance_city_state_zip: u8,
    pub pin: u8,
    pub pin1: u8,
    pub group_number: u8,
    pub group_id: u8,
    pub doc_location: u8,
    pub nucc_use: u8,

    /// Per form row.
    pub supplemental: u8,
    /// Per form row and per column (`local{n}` and `local{n}a`).
    pub local_use: u8,
    pub epsdt: u8,
    pub plan_code: u8,
}

impl Default for PresenceRates {
    fn default() -> Self {
        Self {
            insured_is_patient: 70,
            primary_modifier: 20,
            extra_modifier: 10,
            emergency: 8,
            service_days: 15,
            illness_onset: 60,
            similar_illness: 20,
            work_disability: 25,
            hospitalization: 15,
            secondary_insurance: 30,
            prior_authorization: 25,
            original_reference: 15,
            medicaid_resubmission: 10,
            referring_provider: 40,
            patient_signature: 85,
            insured_signature: 70,
            service_facility: 35,
            insured_address: 85,
            plan_name: 75,
            insurance_id: 70,
            insurance_suite: 30,
            insurance_city_state_zip: 60,
            pin: 40,
            pin1: 35,
            group_number: 50,
            group_id: 45,
            doc_location: 55,
            nucc_use: 20,
            supplemental: 15,
            local_use: 25,
            epsdt: 20,
            plan_code: 30,
        }
    }
}

impl PresenceRates {
    /// Rates that make every optional block present.
    pub fn always() -> Self {
        Self::uniform(100)
    }

    /// Rates that make every optional block absent.
    pub fn never() -> Self {
        Self::uniform(0)
    }

    fn uniform(percent: u8) -> Self {
        Self {
            insured_is_patient: percent,
            primary_modifier: percent,
            extra_modifier: percent,
            emergency: percent,
            service_days: percent,
            illness_onset: percent,
            similar_illness: percent,
            work_disability: percent,
            hospitalization: percent,
            secondary_insurance: percent,
            prior_authorization: percent,
            original_reference: percent,
            medicaid_resubmission: percent,
            referring_provider: percent,
            patient_signature: percent,
            insured_signature: percent,
            service_facility: percent,
            insured_address: percent,
            plan_name: percent,
            insurance_id: percent,
            insurance_suite: percent,
            insurance_city_state_zip: percent,
            pin: percent,
            pin1: percent,
            group_number: percent,
            group_id: percent,
            doc_location: percent,
            nucc_use: percent,
            supplemental: percent,
            local_use: percent,
            epsdt: percent,
            plan_code: percent,
        }
    }
}

/// Options controlling claim generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Seed for the generator's RNG. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    /// "Today" for every relative date. `None` uses the local date.
    pub reference_date: Option<NaiveDate>,
    /// Whole-dollar bounds for a service line charge.
    pub charge_min: u32,
    pub charge_max: u32,
    pub rates: PresenceRates,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            seed: None,
            reference_date: None,
            charge_min: 50,
            charge_max: 500,
            rates: PresenceRates::default(),
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Set the charge bounds; reversed bounds are swapped.
    #[must_use]
    pub fn with_charge_range(mut self, min: u32, max: u32) -> Self {
        self.charge_min = min.min(max);
        self.charge_max = min.max(max);
        self
    }

    #[must_use]
    pub fn with_rates(mut self, rates: PresenceRates) -> Self {
        self.rates = rates;
        self
    }

    pub fn charge_range(&self) -> RangeInclusive<u32> {
        self.charge_min.min(self.charge_max)..=self.charge_max.max(self.charge_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_rates() {
        let options = GeneratorOptions::default();
        assert_eq!(options.charge_range(), 50..=500);
        assert_eq!(options.rates.illness_onset, 60);
        assert_eq!(options.rates.referring_provider, 40);
        assert!(options.seed.is_none());
    }

    #[test]
    fn charge_range_swaps_reversed_bounds() {
        let options = GeneratorOptions::new().with_charge_range(400, 100);
        assert_eq!(options.charge_range(), 100..=400);
    }
}
