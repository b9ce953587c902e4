#![no_main]

use chrono::NaiveDate;
use factura_cr::core::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str, u8)| {
    let (issuer, consecutivo, situation) = input;
    let Ok(consecutivo) = Consecutivo::parse(consecutivo) else {
        return;
    };
    let situation = match situation % 3 {
        0 => Situation::Normal,
        1 => Situation::Contingency,
        _ => Situation::NoConnectivity,
    };
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    if let Ok(clave) = generate_clave(CR_COUNTRY_CODE, date, issuer, &consecutivo, situation) {
        // Every generated clave must parse back.
        assert_eq!(Clave::parse(clave.as_str()).unwrap(), clave);
    }
});
