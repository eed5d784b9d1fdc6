//! Public case-code generation.

use chrono::{Datelike, Utc};
use rand::Rng;

/// Generate a human-readable case code of the form `ODR/{year}/{serial}`.
///
/// The serial is a random six-digit number; codes are not guaranteed unique
/// and callers that require uniqueness must check against the store.
pub fn generate_case_code() -> String {
    let year = Utc::now().year();
    let serial: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    format!("ODR/{}/{}", year, serial)
}
