use chrono::NaiveDate;
use factura_cr::core::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn consecutivo() -> Consecutivo {
    Consecutivo::parse("00100001010000000001").unwrap()
}

fn clave(situation: Situation) -> Clave {
    generate_clave(
        CR_COUNTRY_CODE,
        date(2024, 3, 1),
        "3101123456",
        &consecutivo(),
        situation,
    )
    .unwrap()
}

// --- Reference scenario ---

#[test]
fn reference_scenario_segments() {
    let clave = clave(Situation::Normal);
    let s = clave.as_str();
    assert_eq!(s.len(), 50);
    assert!(s.bytes().all(|b| b.is_ascii_digit()));
    assert_eq!(&s[0..3], "506");
    assert_eq!(&s[3..9], "010324");
    assert_eq!(&s[9..21], "003101123456");
    assert_eq!(&s[21..41], "00100001010000000001");
    assert_eq!(&s[41..42], "1");
    assert_eq!(&s[42..], "62988888");
}

#[test]
fn every_check_digit_validates_its_field() {
    let clave = clave(Situation::Normal);
    let c = clave.consecutivo();
    let situation = clave.situation().code().to_string();
    let fields = [
        clave.country(),
        clave.date_segment(),
        clave.issuer(),
        c.branch(),
        c.terminal(),
        c.kind_code(),
        c.sequence(),
        situation.as_str(),
    ];
    for (field, digit) in fields.iter().zip(clave.check_digits().chars()) {
        assert!(
            luhn::is_valid(&format!("{field}{digit}")),
            "{field} + {digit} should validate"
        );
    }
}

// --- Situation ---

#[test]
fn situation_change_touches_only_situation_and_last_digit() {
    let normal = clave(Situation::Normal);
    let offline = clave(Situation::NoConnectivity);
    let differing: Vec<usize> = normal
        .as_str()
        .bytes()
        .zip(offline.as_str().bytes())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(differing, vec![41, 49]);
    assert_eq!(offline.situation(), Situation::NoConnectivity);
}

#[test]
fn contingency_clave() {
    let clave = clave(Situation::Contingency);
    assert_eq!(&clave.as_str()[41..42], "2");
    assert_eq!(clave.check_digits(), "62988886");
}

#[test]
fn generation_is_deterministic() {
    assert_eq!(clave(Situation::Normal), clave(Situation::Normal));
    assert_eq!(
        clave(Situation::NoConnectivity),
        clave(Situation::NoConnectivity)
    );
}

// --- Issuer ---

#[test]
fn issuer_padding() {
    let clave = clave(Situation::Normal);
    assert_eq!(clave.issuer(), "003101123456");
}

#[test]
fn twelve_digit_issuer_is_not_padded() {
    let clave = generate_clave(
        CR_COUNTRY_CODE,
        date(2024, 3, 1),
        "155812345678",
        &consecutivo(),
        Situation::Normal,
    )
    .unwrap();
    assert_eq!(clave.issuer(), "155812345678");
}

#[test]
fn issuer_overflow_is_fatal() {
    let err = generate_clave(
        CR_COUNTRY_CODE,
        date(2024, 3, 1),
        "1558123456789",
        &consecutivo(),
        Situation::Normal,
    )
    .unwrap_err();
    assert!(matches!(err, ClaveError::IssuerTooLong(_)));
}

#[test]
fn physical_person_id_with_separators() {
    let clave = generate_clave(
        CR_COUNTRY_CODE,
        date(2024, 6, 15),
        "1-1448-0790",
        &Consecutivo::parse("00200003040000000042").unwrap(),
        Situation::Normal,
    )
    .unwrap();
    assert_eq!(
        clave.as_str(),
        "50615062400011448079000200003040000000042165464228"
    );
}

// --- Parsing ---

#[test]
fn parse_round_trip_keeps_fields() {
    let generated = clave(Situation::NoConnectivity);
    let parsed: Clave = generated.as_str().parse().unwrap();
    assert_eq!(parsed, generated);
    assert_eq!(parsed.situation(), Situation::NoConnectivity);
    assert_eq!(parsed.issue_date(), Some(date(2024, 3, 1)));
    assert_eq!(
        parsed.consecutivo().document_kind(),
        Some(DocumentKind::FacturaElectronica)
    );
}

#[test]
fn parse_rejects_wrong_issuer_check_digit() {
    let mut s = clave(Situation::Normal).to_string();
    s.replace_range(44..45, "0");
    assert_eq!(
        Clave::parse(&s),
        Err(ClaveError::CheckDigit { field: "issuer" })
    );
}

// --- Numbering feeds generation ---

#[test]
fn sequence_then_clave() {
    let mut seq = ConsecutivoSequence::new(1, 1, DocumentKind::FacturaElectronica).unwrap();
    let first = seq.next_consecutivo().unwrap();
    let second = seq.next_consecutivo().unwrap();
    let a = generate_clave(CR_COUNTRY_CODE, date(2024, 3, 1), "3101123456", &first, Situation::Normal)
        .unwrap();
    let b = generate_clave(CR_COUNTRY_CODE, date(2024, 3, 1), "3101123456", &second, Situation::Normal)
        .unwrap();
    assert_eq!(a, clave(Situation::Normal));
    assert_ne!(a, b);
}

// --- Transmission status ---

#[test]
fn status_lifecycle() {
    let status = TransmissionStatus::Pending;
    let status = status.advance(TransmissionStatus::Sent).unwrap();
    let status = status.advance(TransmissionStatus::Confirmed).unwrap();
    let status = status.advance(TransmissionStatus::AcceptedPartial).unwrap();
    assert!(status.is_final());
    assert!(status.advance(TransmissionStatus::AcceptedFull).is_err());
}
