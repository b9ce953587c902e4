//! Luhn (mod 10) check digits for the numeric fields of a clave.

use super::error::ClaveError;

/// Compute the Luhn check digit for a string of ASCII digits.
///
/// The returned digit, appended to `digits`, makes the whole sequence pass
/// [`is_valid`]. Starting from the rightmost digit of `digits`, every second
/// digit is doubled (subtracting 9 when the product exceeds 9).
pub fn check_digit(digits: &str) -> Result<u8, ClaveError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClaveError::NonNumeric { field: "luhn input" });
    }
    let sum = weighted_sum(digits, true);
    Ok(((10 - sum % 10) % 10) as u8)
}

/// Validate a digit string whose last digit is a Luhn check digit.
///
/// Returns `false` for empty or non-numeric input.
pub fn is_valid(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    weighted_sum(digits, false) % 10 == 0
}

fn weighted_sum(digits: &str, double_first: bool) -> u32 {
    digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            let doubled = (i % 2 == 0) == double_first;
            match (doubled, d * 2) {
                (true, p) if p > 9 => p - 9,
                (true, p) => p,
                (false, _) => d,
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_check_digits() {
        assert_eq!(check_digit("7992739871").unwrap(), 3);
        assert_eq!(check_digit("506").unwrap(), 6);
        assert_eq!(check_digit("010324").unwrap(), 2);
        assert_eq!(check_digit("003101123456").unwrap(), 9);
        assert_eq!(check_digit("1").unwrap(), 8);
        assert_eq!(check_digit("3").unwrap(), 4);
        assert_eq!(check_digit("0").unwrap(), 0);
    }

    #[test]
    fn validates_with_appended_digit() {
        assert!(is_valid("79927398713"));
        assert!(!is_valid("79927398710"));
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(check_digit("12a4").is_err());
        assert!(check_digit("").is_err());
        assert!(!is_valid("12 4"));
        assert!(!is_valid(""));
    }

    #[test]
    fn only_one_digit_passes() {
        for field in ["506", "010324", "00100", "0000000001"] {
            let passing: Vec<u8> = (0..10)
                .filter(|d| is_valid(&format!("{field}{d}")))
                .collect();
            assert_eq!(passing, vec![check_digit(field).unwrap()]);
        }
    }
}
