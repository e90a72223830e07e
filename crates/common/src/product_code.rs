//! Checksummed product codes for catalog variants.
//!
//! A code is 13 ASCII digits: a 12-digit base derived from the collection
//! name, the variant name and a nonce, followed by an EAN-13 check digit.
//!
//! Letters are transliterated to their 1-based alphabet position, digits
//! pass through, everything else is dropped. Only the trailing 12 digits are
//! kept so the nonce suffix always dominates the base.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Number of digits in the base, before the check digit.
pub const BASE_LEN: usize = 12;

/// Total length of a product code.
pub const CODE_LEN: usize = BASE_LEN + 1;

static LAST_NONCE: AtomicU64 = AtomicU64::new(0);

/// Generate a product code for a variant of a collection.
///
/// Uses the wall clock in nanoseconds as the nonce, bumped so that two calls
/// in the same process never share one.
#[must_use]
pub fn generate(collection_name: &str, variant_name: &str) -> String {
    generate_with_nonce(collection_name, variant_name, next_nonce())
}

/// Generate a product code with an explicit nonce.
#[must_use]
pub fn generate_with_nonce(collection_name: &str, variant_name: &str, nonce: u64) -> String {
    let digits = transliterate(&format!("{collection_name}{variant_name}{nonce}"));

    let tail = &digits[digits.len().saturating_sub(BASE_LEN)..];
    let mut code = format!("{tail:0>BASE_LEN$}");
    code.push(char::from(b'0' + check_digit(&code)));
    code
}

/// Compute the EAN-13 check digit for a 12-digit base.
///
/// Digits at even 0-based positions weigh 1, odd positions weigh 3.
/// Non-digit characters are ignored.
#[must_use]
pub fn check_digit(base: &str) -> u8 {
    let sum: u32 = base
        .bytes()
        .filter(u8::is_ascii_digit)
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 { d } else { d * 3 }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Whether `code` is a well-formed product code with a matching check digit.
#[must_use]
pub fn is_valid(code: &str) -> bool {
    if code.len() != CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (base, check) = code.split_at(BASE_LEN);
    check.as_bytes()[0] - b'0' == check_digit(base)
}

fn transliterate(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c.is_ascii_alphabetic() {
            let position = u32::from(c.to_ascii_lowercase()) - u32::from('a') + 1;
            out.push_str(&position.to_string());
        }
    }
    out
}

fn next_nonce() -> u64 {
    let now = Utc::now()
        .timestamp_nanos_opt()
        .map_or_else(|| Utc::now().timestamp_micros() as u64 * 1_000, |n| n as u64);

    let mut last = LAST_NONCE.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_NONCE.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}
