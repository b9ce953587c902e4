use chrono::Utc;
use factura_cr::core::*;

fn main() {
    // Number the first three invoices of branch 1, terminal 1
    let mut numbering = ConsecutivoSequence::new(1, 1, DocumentKind::FacturaElectronica).unwrap();
    let today = costa_rica_date(Utc::now());

    for _ in 0..3 {
        let consecutivo = numbering.next_consecutivo().unwrap();
        let normal = generate_clave(
            CR_COUNTRY_CODE,
            today,
            "3-101-123456",
            &consecutivo,
            Situation::Normal,
        )
        .unwrap();
        let offline = generate_clave(
            CR_COUNTRY_CODE,
            today,
            "3-101-123456",
            &consecutivo,
            Situation::NoConnectivity,
        )
        .unwrap();

        println!("Consecutivo:      {consecutivo}");
        println!("  normal:         {normal}");
        println!("  no connectivity {offline}");
        println!("  check digits:   {}", normal.check_digits());
    }

    // Parsing verifies every check digit
    match Clave::parse("50601032400310112345600100001010000000001362988888") {
        Ok(clave) => println!("unexpectedly valid: {clave}"),
        Err(e) => println!("Rejected patched clave: {e}"),
    }
}
