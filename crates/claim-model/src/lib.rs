//! Domain types for synthetic CMS-1500 claims.

pub mod dates;
pub mod enums;
pub mod error;
pub mod ids;
pub mod invariants;
pub mod record;

pub use dates::{DateRange, FormDate};
pub use enums::{
    ClinicalCategory, EpsdtIndicator, InsuranceCategory, Relationship, Sex, TaxIdType,
    TypeOfService, YesNo,
};
pub use error::{ModelError, Result};
pub use ids::{DiagnosisPointer, Dollars, NPI_CHECK_PREFIX, Npi, npi_check_digit};
pub use invariants::max_paid;
pub use record::{
    Address, AdministrativeIds, Authorization, BillingProvider, ClaimRecord, ConditionIndicators,
    Coverage, Diagnosis, EpisodeTimeline, Financials, InsuredAddress, Insurer,
    MAX_DIAGNOSES, MAX_SERVICE_LINES, MODIFIER_SLOTS, OtherInsurance, Patient, PhoneNumber,
    ReferringProvider, ServiceFacility, ServiceLine, Signature, Signatures, SupplementalCodes,
};
