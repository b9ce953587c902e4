#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine; a panic here is a bug.
        if let Ok(clave) = factura_cr::core::Clave::parse(s) {
            let _ = clave.consecutivo();
            let _ = clave.issue_date();
        }
        let _ = factura_cr::core::Consecutivo::parse(s);
    }
});
