//! Luhn (mod 10) check digits for numeric IDs.
//!
//! Integers and decimal strings have separate entry points; strings are
//! validated digit by digit and may be longer than a `u64`.
//!
//! ```
//! use flakeid::luhn;
//!
//! assert_eq!(luhn::check_digit(7_992_739_871), 3);
//! assert!(luhn::is_valid_u64(79_927_398_713));
//! assert_eq!(luhn::check_digit_str("7992739871"), Ok(3));
//! assert!(luhn::is_valid_str("79927398713"));
//! ```

use crate::{Error, Result};

/// Computes the check digit to append to `payload`.
pub fn check_digit(payload: u64) -> u8 {
    let mut rest = payload;
    let digits = core::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        let d = (rest % 10) as u8;
        rest /= 10;
        Some(d)
    });
    from_reversed_digits(digits)
}

/// Computes the check digit for a decimal string.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `payload` is empty
/// - [`Error::InvalidDigit`] if a character is not an ASCII digit
pub fn check_digit_str(payload: &str) -> Result<u8> {
    if payload.is_empty() {
        return Err(Error::EmptyInput);
    }
    validate_digits(payload)?;
    Ok(from_reversed_digits(payload.bytes().rev().map(|b| b - b'0')))
}

/// Returns `true` if the last decimal digit of `n` is the check digit of the
/// digits before it.
pub fn is_valid_u64(n: u64) -> bool {
    check_digit(n / 10) == (n % 10) as u8
}

/// Returns `true` if `s` is all decimal digits and its last digit is the
/// check digit of the rest.
pub fn is_valid_str(s: &str) -> bool {
    let Some((&last, payload)) = s.as_bytes().split_last() else {
        return false;
    };
    if !last.is_ascii_digit() || !payload.iter().all(u8::is_ascii_digit) {
        return false;
    }
    from_reversed_digits(payload.iter().rev().map(|b| b - b'0')) == last - b'0'
}

/// Appends the check digit to `payload`, or `None` if the result would not
/// fit in a `u64`.
pub fn append_check_digit(payload: u64) -> Option<u64> {
    payload
        .checked_mul(10)?
        .checked_add(u64::from(check_digit(payload)))
}

fn validate_digits(s: &str) -> Result<()> {
    match s.bytes().enumerate().find(|(_, b)| !b.is_ascii_digit()) {
        Some((index, byte)) => Err(Error::InvalidDigit { byte, index }),
        None => Ok(()),
    }
}

// digits arrive least significant first; every other one starting with the
// first is doubled
fn from_reversed_digits(digits: impl Iterator<Item = u8>) -> u8 {
    let sum: u32 = digits
        .enumerate()
        .map(|(i, d)| {
            let d = u32::from(d);
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_check_digits() {
        assert_eq!(check_digit(7_992_739_871), 3);
        assert_eq!(check_digit(0), 0);
        assert_eq!(check_digit(1), 8);
        assert_eq!(check_digit(453_914_880_343_646), 7);
    }

    #[test]
    fn integer_and_string_paths_agree() {
        for n in [0_u64, 5, 18, 7_992_739_871, u64::MAX / 10] {
            let s = n.to_string();
            assert_eq!(check_digit_str(&s), Ok(check_digit(n)), "{n}");
        }
    }

    #[test]
    fn validates_appended_digit() {
        let full = append_check_digit(7_992_739_871).unwrap();
        assert_eq!(full, 79_927_398_713);
        assert!(is_valid_u64(full));
        assert!(!is_valid_u64(full + 1));
        assert!(is_valid_str(&full.to_string()));
        assert!(!is_valid_str("79927398710"));
        assert_eq!(append_check_digit(u64::MAX), None);
    }

    #[test]
    fn strings_longer_than_u64() {
        let s = "123456789012345678901234567890";
        let d = check_digit_str(s).unwrap();
        assert!(is_valid_str(&format!("{s}{d}")));
    }

    #[test]
    fn leading_zeros_do_not_change_the_digit() {
        assert_eq!(check_digit_str("0007992739871"), Ok(3));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!(check_digit_str(""), Err(Error::EmptyInput));
        assert_eq!(
            check_digit_str("12a4"),
            Err(Error::InvalidDigit {
                byte: b'a',
                index: 2
            })
        );
        assert!(!is_valid_str(""));
        assert!(!is_valid_str("7992739871x"));
        assert!(!is_valid_str("-18"));
        assert!(is_valid_str("0"));
        assert!(is_valid_str("18"));
    }
}
