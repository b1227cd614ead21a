//! Consistency rules every generated claim satisfies.

use std::collections::HashSet;

use crate::error::{ModelError, Result};
use crate::ids::Dollars;
use crate::record::{ClaimRecord, MAX_DIAGNOSES, MAX_SERVICE_LINES};

/// Largest amount the payer may have paid: `floor(0.8 * total)`.
pub fn max_paid(total: Dollars) -> Dollars {
    Dollars(total.amount() * 4 / 5)
}

impl ClaimRecord {
    /// Check the structural and financial rules of the claim.
    ///
    /// The generator upholds these by construction, so a failure here points
    /// at a defect rather than bad input.
    pub fn check_invariants(&self) -> Result<()> {
        self.check_diagnoses()?;
        self.check_service_lines()?;
        self.check_financials()?;
        self.check_conditions()?;
        // Date ranges validate themselves on construction.
        Ok(())
    }

    fn check_diagnoses(&self) -> Result<()> {
        let count = self.diagnoses.len();
        if !(1..=MAX_DIAGNOSES).contains(&count) {
            return Err(ModelError::DiagnosisCount(count));
        }
        let mut seen = HashSet::new();
        for diagnosis in &self.diagnoses {
            if !seen.insert(diagnosis.code.as_str()) {
                return Err(ModelError::DuplicateDiagnosis(diagnosis.code.clone()));
            }
        }
        Ok(())
    }

    fn check_service_lines(&self) -> Result<()> {
        let count = self.service_lines.len();
        if !(1..=MAX_SERVICE_LINES).contains(&count) {
            return Err(ModelError::ServiceLineCount(count));
        }
        let mut seen = HashSet::new();
        for (index, line) in self.service_lines.iter().enumerate() {
            if !seen.insert(line.procedure_code.as_str()) {
                return Err(ModelError::DuplicateProcedure(line.procedure_code.clone()));
            }
            if line.diagnosis_pointer.index() >= self.diagnoses.len() {
                return Err(ModelError::PointerOutOfRange {
                    line: index + 1,
                    pointer: line.diagnosis_pointer.letter(),
                    diagnoses: self.diagnoses.len(),
                });
            }
            if !line.dates.is_single_day() {
                return Err(ModelError::ServiceDateSpan { line: index + 1 });
            }
        }
        Ok(())
    }

    fn check_financials(&self) -> Result<()> {
        let financials = &self.financials;
        let sum: Dollars = self.service_lines.iter().map(|line| line.charge).sum();
        let total = financials.total_charge;
        let paid = financials.amount_paid;
        if total != sum {
            return Err(ModelError::TotalMismatch {
                total: total.amount(),
                sum: sum.amount(),
            });
        }
        if paid > max_paid(total) {
            return Err(ModelError::PaidExceedsLimit {
                paid: paid.amount(),
                total: total.amount(),
            });
        }
        if financials.balance_due.amount() + paid.amount() != total.amount() {
            return Err(ModelError::BalanceMismatch {
                balance: financials.balance_due.amount(),
                total: total.amount(),
                paid: paid.amount(),
            });
        }
        Ok(())
    }

    fn check_conditions(&self) -> Result<()> {
        if self.conditions.any_accident() != self.conditions.accident_place.is_some() {
            return Err(ModelError::AccidentPlaceMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_paid_floors() {
        assert_eq!(max_paid(Dollars(0)), Dollars(0));
        assert_eq!(max_paid(Dollars(101)), Dollars(80));
        assert_eq!(max_paid(Dollars(125)), Dollars(100));
        assert_eq!(max_paid(Dollars(3)), Dollars(2));
    }
}
