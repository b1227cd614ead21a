//! Names, addresses, phone numbers and patterned identifiers.

use chrono::{NaiveDate, TimeDelta};
use claim_model::{Address, PhoneNumber};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName};
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;

/// Expand a pattern: `#` becomes a digit, `?` an uppercase letter, and every
/// other character is copied through.
pub fn fill_pattern<R: Rng + ?Sized>(rng: &mut R, pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.random_range(0..10u8)),
            '?' => char::from(b'A' + rng.random_range(0..26u8)),
            other => other,
        })
        .collect()
}

/// `percent` chance of `true`, using a uniform draw in `1..=100`.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, percent: u8) -> bool {
    rng.random_range(1..=100u8) <= percent
}

/// Two- or three-part person name.
pub fn person_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first: String = FirstName().fake_with_rng(rng);
    let last: String = LastName().fake_with_rng(rng);
    if chance(rng, 25) {
        let middle: String = FirstName().fake_with_rng(rng);
        format!("{first} {middle} {last}")
    } else {
        format!("{first} {last}")
    }
}

/// `Dr. First Last, MD`
pub fn provider_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first: String = FirstName().fake_with_rng(rng);
    let last: String = LastName().fake_with_rng(rng);
    format!("Dr. {first} {last}, MD")
}

pub fn street<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let name: String = StreetName().fake_with_rng(rng);
    format!("{number} {name}")
}

pub fn city<R: Rng + ?Sized>(rng: &mut R) -> String {
    CityName().fake_with_rng(rng)
}

pub fn state<R: Rng + ?Sized>(rng: &mut R) -> String {
    StateAbbr().fake_with_rng(rng)
}

pub fn zip<R: Rng + ?Sized>(rng: &mut R) -> String {
    fill_pattern(rng, "#####")
}

pub fn address<R: Rng + ?Sized>(rng: &mut R) -> Address {
    Address {
        street: street(rng),
        city: city(rng),
        state: state(rng),
        zip: zip(rng),
    }
}

/// `City, ST 12345`
pub fn city_state_zip<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}, {} {}", city(rng), state(rng), zip(rng))
}

pub fn phone<R: Rng + ?Sized>(rng: &mut R) -> PhoneNumber {
    PhoneNumber {
        area_code: rng.random_range(200..=999u16).to_string(),
        number: fill_pattern(rng, "###-####"),
    }
}

/// Uniform date in `start..=end` (arguments may be given in either order).
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let (low, high) = if start <= end { (start, end) } else { (end, start) };
    let span = (high - low).num_days();
    low + TimeDelta::days(rng.random_range(0..=span))
}

/// Uniform date between `oldest` and `newest` days before `today`.
pub fn days_ago<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate, oldest: i64, newest: i64) -> NaiveDate {
    date_between(
        rng,
        today - TimeDelta::days(oldest),
        today - TimeDelta::days(newest),
    )
}

/// Birth date for someone aged `min_age..=max_age` on `today`.
pub fn birth_date<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate, min_age: i64, max_age: i64) -> NaiveDate {
    // 365 days per year keeps the bounds conservative.
    days_ago(rng, today, (max_age + 1) * 365 - 1, min_age * 366)
}
