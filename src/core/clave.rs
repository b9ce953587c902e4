use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ClaveError;
use super::luhn;
use super::numbering::{CONSECUTIVO_LEN, Consecutivo};
use super::types::Situation;

/// Length of every clave.
pub const CLAVE_LEN: usize = 50;

/// Country calling code of Costa Rica, the first segment of every clave.
pub const CR_COUNTRY_CODE: &str = "506";

/// Width of the zero-padded issuer tax ID segment.
pub const ISSUER_WIDTH: usize = 12;

const COUNTRY_END: usize = 3;
const DATE_END: usize = COUNTRY_END + 6;
const ISSUER_END: usize = DATE_END + ISSUER_WIDTH;
const CONSECUTIVO_END: usize = ISSUER_END + CONSECUTIVO_LEN;
const SITUATION_END: usize = CONSECUTIVO_END + 1;

/// Costa Rica civil time: UTC−06:00 all year round.
const CR_UTC_OFFSET_SECS: i32 = -6 * 3600;

/// The 50-digit document key ("clave") required by Hacienda.
///
/// Layout: country (3), issue date `DDMMYY` (6), issuer tax ID (12),
/// consecutivo (20), situation (1), then one Luhn check digit for each of
/// country, date, issuer, the four consecutivo slices and the situation.
///
/// A clave is immutable. Changing the situation means generating a new one,
/// because the last check digit depends on it too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Clave {
    value: String,
    situation: Situation,
}

impl Clave {
    /// Parse and fully verify an existing clave, including all check digits.
    pub fn parse(value: &str) -> Result<Self, ClaveError> {
        if value.len() != CLAVE_LEN {
            return Err(ClaveError::Length {
                expected: CLAVE_LEN,
                actual: value.len(),
            });
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClaveError::NonNumeric { field: "clave" });
        }
        let situation = Situation::from_code(value.as_bytes()[CONSECUTIVO_END] as char)?;
        let candidate = Self {
            value: value.to_string(),
            situation,
        };
        let consecutivo = candidate.consecutivo();
        let expected = check_digits(
            candidate.country(),
            candidate.date_segment(),
            candidate.issuer(),
            &consecutivo,
            situation,
        )?;
        for ((field, want), got) in expected.into_iter().zip(candidate.check_digits().bytes()) {
            if want != got {
                return Err(ClaveError::CheckDigit { field });
            }
        }
        Ok(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn country(&self) -> &str {
        &self.value[..COUNTRY_END]
    }

    /// Issue date as stored, `DDMMYY`.
    pub fn date_segment(&self) -> &str {
        &self.value[COUNTRY_END..DATE_END]
    }

    /// Issue date decoded from the `DDMMYY` segment (years 2000–2099).
    pub fn issue_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("20{}", self.date_segment_reversed()), "%Y%m%d").ok()
    }

    /// Issuer tax ID, zero-padded to 12 digits.
    pub fn issuer(&self) -> &str {
        &self.value[DATE_END..ISSUER_END]
    }

    pub fn consecutivo(&self) -> Consecutivo {
        Consecutivo::from_digits(&self.value[ISSUER_END..CONSECUTIVO_END])
    }

    pub fn situation(&self) -> Situation {
        self.situation
    }

    /// The trailing 8 Luhn digits.
    pub fn check_digits(&self) -> &str {
        &self.value[SITUATION_END..]
    }

    fn date_segment_reversed(&self) -> String {
        let d = self.date_segment();
        format!("{}{}{}", &d[4..6], &d[2..4], &d[0..2])
    }
}

impl fmt::Display for Clave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Clave {
    type Err = ClaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Clave {
    type Error = ClaveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Clave> for String {
    fn from(value: Clave) -> Self {
        value.value
    }
}

impl AsRef<str> for Clave {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Generate the clave for a document.
///
/// `issue_date` must already be the Costa Rica civil date (see
/// [`costa_rica_date`]). `issuer_tax_id` may contain separators; only its
/// digits are used, left-padded with zeros to 12.
///
/// ```
/// use chrono::NaiveDate;
/// use factura_cr::core::*;
///
/// let consecutivo = Consecutivo::parse("00100001010000000001").unwrap();
/// let clave = generate_clave(
///     CR_COUNTRY_CODE,
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     "3-101-123456",
///     &consecutivo,
///     Situation::Normal,
/// )
/// .unwrap();
/// assert_eq!(clave.as_str(), "50601032400310112345600100001010000000001162988888");
/// ```
pub fn generate_clave(
    country_code: &str,
    issue_date: NaiveDate,
    issuer_tax_id: &str,
    consecutivo: &Consecutivo,
    situation: Situation,
) -> Result<Clave, ClaveError> {
    if country_code.len() != COUNTRY_END || !country_code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClaveError::Country(country_code.into()));
    }
    let date = issue_date.format("%d%m%y").to_string();
    let issuer = normalize_issuer(issuer_tax_id)?;

    let digits = check_digits(country_code, &date, &issuer, consecutivo, situation)?;

    let mut clave = String::with_capacity(CLAVE_LEN);
    clave.push_str(country_code);
    clave.push_str(&date);
    clave.push_str(&issuer);
    clave.push_str(consecutivo.as_str());
    clave.push(situation.code());
    clave.extend(digits.iter().map(|(_, d)| *d as char));

    if clave.len() != CLAVE_LEN {
        return Err(ClaveError::Length {
            expected: CLAVE_LEN,
            actual: clave.len(),
        });
    }
    Ok(Clave {
        value: clave,
        situation,
    })
}

/// Strip non-digits from a tax ID and left-pad it to 12 digits.
pub fn normalize_issuer(tax_id: &str) -> Result<String, ClaveError> {
    let digits: String = tax_id.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ClaveError::IssuerEmpty);
    }
    if digits.len() > ISSUER_WIDTH {
        return Err(ClaveError::IssuerTooLong(tax_id.into()));
    }
    Ok(format!("{digits:0>width$}", width = ISSUER_WIDTH))
}

/// Civil date in Costa Rica for an instant.
pub fn costa_rica_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&costa_rica_offset()).date_naive()
}

/// Fixed UTC−06:00 offset used for Costa Rica timestamps.
pub fn costa_rica_offset() -> FixedOffset {
    FixedOffset::east_opt(CR_UTC_OFFSET_SECS).unwrap_or_else(|| unreachable!("offset in range"))
}

/// Check digits as ASCII bytes, tagged with the field they protect.
fn check_digits(
    country: &str,
    date: &str,
    issuer: &str,
    consecutivo: &Consecutivo,
    situation: Situation,
) -> Result<[(&'static str, u8); 8], ClaveError> {
    let situation = situation.code().to_string();
    let [branch, terminal, kind, sequence] = consecutivo.segments();
    let fields = [
        ("country", country),
        ("date", date),
        ("issuer", issuer),
        branch,
        terminal,
        kind,
        sequence,
        ("situation", situation.as_str()),
    ];
    let mut out = [("", b'0'); 8];
    for (slot, (name, value)) in out.iter_mut().zip(fields) {
        *slot = (name, b'0' + luhn::check_digit(value)?);
    }
    Ok(out)
}
