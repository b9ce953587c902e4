//! Property-based tests for clave generation and the Luhn check digits.

use chrono::NaiveDate;
use factura_cr::core::*;
use proptest::prelude::*;

// ── Proptest Strategies ─────────────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Issuer IDs of 1 to 12 digits.
fn arb_issuer() -> impl Strategy<Value = String> {
    "[0-9]{1,12}"
}

fn arb_consecutivo() -> impl Strategy<Value = Consecutivo> {
    "[0-9]{20}".prop_map(|s| Consecutivo::parse(&s).unwrap())
}

fn arb_situation() -> impl Strategy<Value = Situation> {
    prop_oneof![
        Just(Situation::Normal),
        Just(Situation::Contingency),
        Just(Situation::NoConnectivity),
    ]
}

proptest! {
    #[test]
    fn clave_is_fifty_digits(
        date in arb_date(),
        issuer in arb_issuer(),
        consecutivo in arb_consecutivo(),
        situation in arb_situation(),
    ) {
        let clave = generate_clave(CR_COUNTRY_CODE, date, &issuer, &consecutivo, situation).unwrap();
        prop_assert_eq!(clave.as_str().len(), 50);
        prop_assert!(clave.as_str().bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn generation_is_idempotent(
        date in arb_date(),
        issuer in arb_issuer(),
        consecutivo in arb_consecutivo(),
        situation in arb_situation(),
    ) {
        let a = generate_clave(CR_COUNTRY_CODE, date, &issuer, &consecutivo, situation).unwrap();
        let b = generate_clave(CR_COUNTRY_CODE, date, &issuer, &consecutivo, situation).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn generated_claves_parse(
        date in arb_date(),
        issuer in arb_issuer(),
        consecutivo in arb_consecutivo(),
        situation in arb_situation(),
    ) {
        let clave = generate_clave(CR_COUNTRY_CODE, date, &issuer, &consecutivo, situation).unwrap();
        let parsed = Clave::parse(clave.as_str()).unwrap();
        prop_assert_eq!(parsed.issue_date(), Some(date));
        prop_assert_eq!(parsed.situation(), situation);
        prop_assert_eq!(parsed.consecutivo(), consecutivo);
    }

    #[test]
    fn offline_differs_only_in_situation_and_last_digit(
        date in arb_date(),
        issuer in arb_issuer(),
        consecutivo in arb_consecutivo(),
    ) {
        let normal = generate_clave(CR_COUNTRY_CODE, date, &issuer, &consecutivo, Situation::Normal).unwrap();
        let offline = generate_clave(CR_COUNTRY_CODE, date, &issuer, &consecutivo, Situation::NoConnectivity).unwrap();
        prop_assert_eq!(&normal.as_str()[..41], &offline.as_str()[..41]);
        prop_assert_eq!(&normal.as_str()[42..49], &offline.as_str()[42..49]);
        prop_assert_ne!(&normal.as_str()[41..42], &offline.as_str()[41..42]);
        prop_assert_ne!(&normal.as_str()[49..], &offline.as_str()[49..]);
    }

    #[test]
    fn luhn_digit_is_unique(field in "[0-9]{1,20}") {
        let digit = luhn::check_digit(&field).unwrap();
        let completed = format!("{}{}", field, digit);
        prop_assert!(luhn::is_valid(&completed));
        for other in (0u8..10).filter(|d| *d != digit) {
            let wrong = format!("{}{}", field, other);
            prop_assert!(!luhn::is_valid(&wrong), "{} passed the check", wrong);
        }
    }

    #[test]
    fn short_issuers_are_left_padded(issuer in "[0-9]{1,12}") {
        let padded = normalize_issuer(&issuer).unwrap();
        prop_assert_eq!(padded.len(), 12);
        prop_assert!(padded.ends_with(issuer.as_str()));
        prop_assert!(padded[..12 - issuer.len()].bytes().all(|b| b == b'0'));
    }

    #[test]
    fn long_issuers_are_rejected(issuer in "[0-9]{13,20}") {
        prop_assert!(normalize_issuer(&issuer).is_err());
    }
}
