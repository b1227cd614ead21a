//! Checksum-valid National Provider Identifiers.

use claim_model::Npi;
use rand::Rng;

/// Generate a random NPI whose tenth digit is the Luhn check digit.
///
/// The leading digit is `1` or `2`, the two prefixes issued to real
/// providers, followed by eight random digits.
pub fn generate_npi<R: Rng + ?Sized>(rng: &mut R) -> Npi {
    let mut digits = [0u8; 9];
    digits[0] = rng.random_range(1..=2);
    for digit in &mut digits[1..] {
        *digit = rng.random_range(0..10);
    }
    Npi::from_digits(digits)
}
