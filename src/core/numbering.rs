use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ClaveError;
use super::types::DocumentKind;

/// Total width of a consecutivo.
pub const CONSECUTIVO_LEN: usize = 20;

/// Branch (sucursal) segment, `[0:3)`.
pub const BRANCH_RANGE: std::ops::Range<usize> = 0..3;
/// Terminal / point-of-sale segment, `[3:8)`.
pub const TERMINAL_RANGE: std::ops::Range<usize> = 3..8;
/// Two-character document kind code, `[8:10)`.
pub const KIND_RANGE: std::ops::Range<usize> = 8..10;
/// Sequence number, the final 10 characters.
pub const SEQUENCE_RANGE: std::ops::Range<usize> = 10..20;

const MAX_BRANCH: u64 = 999;
const MAX_TERMINAL: u64 = 99_999;
const MAX_SEQUENCE: u64 = 9_999_999_999;

/// The 20-digit document number assigned from the issuer's numbering range.
///
/// The four sub-slices are fixed by Hacienda's numbering scheme and feed
/// four of the clave's check digits, so the offsets above never change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Consecutivo(String);

impl Consecutivo {
    pub fn parse(value: &str) -> Result<Self, ClaveError> {
        if value.len() != CONSECUTIVO_LEN {
            return Err(ClaveError::Consecutivo {
                value: value.into(),
                reason: format!("must be {CONSECUTIVO_LEN} digits, got {}", value.len()),
            });
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClaveError::Consecutivo {
                value: value.into(),
                reason: "must contain only digits".into(),
            });
        }
        Ok(Self(value.to_string()))
    }

    /// Wrap digits already known to be a valid consecutivo.
    pub(crate) fn from_digits(digits: &str) -> Self {
        debug_assert!(digits.len() == CONSECUTIVO_LEN);
        Self(digits.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn branch(&self) -> &str {
        &self.0[BRANCH_RANGE]
    }

    pub fn terminal(&self) -> &str {
        &self.0[TERMINAL_RANGE]
    }

    /// Raw document kind code, e.g. `"01"`.
    pub fn kind_code(&self) -> &str {
        &self.0[KIND_RANGE]
    }

    /// Document kind, if the code is one Hacienda defines.
    pub fn document_kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_code(self.kind_code())
    }

    pub fn sequence(&self) -> &str {
        &self.0[SEQUENCE_RANGE]
    }

    /// The four slices in the order their check digits appear in the clave.
    pub(crate) fn segments(&self) -> [(&'static str, &str); 4] {
        [
            ("consecutivo branch", self.branch()),
            ("consecutivo terminal", self.terminal()),
            ("consecutivo kind", self.kind_code()),
            ("consecutivo sequence", self.sequence()),
        ]
    }
}

impl fmt::Display for Consecutivo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Consecutivo {
    type Err = ClaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Consecutivo {
    type Error = ClaveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Consecutivo> for String {
    fn from(value: Consecutivo) -> Self {
        value.0
    }
}

/// Gapless consecutivo generator for one branch, terminal and document kind.
///
/// Hacienda requires each (branch, terminal, kind) range to be numbered
/// sequentially starting at 1. This struct tracks the next number to hand out.
#[derive(Debug, Clone)]
pub struct ConsecutivoSequence {
    branch: u16,
    terminal: u32,
    kind: DocumentKind,
    next_number: u64,
}

impl ConsecutivoSequence {
    /// Create a new sequence starting at 1.
    pub fn new(branch: u16, terminal: u32, kind: DocumentKind) -> Result<Self, ClaveError> {
        Self::starting_at(branch, terminal, kind, 1)
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(
        branch: u16,
        terminal: u32,
        kind: DocumentKind,
        next_number: u64,
    ) -> Result<Self, ClaveError> {
        check_width("branch", u64::from(branch), MAX_BRANCH, 3)?;
        check_width("terminal", u64::from(terminal), MAX_TERMINAL, 5)?;
        Ok(Self {
            branch,
            terminal,
            kind,
            next_number,
        })
    }

    /// Hand out the next consecutivo.
    pub fn next_consecutivo(&mut self) -> Result<Consecutivo, ClaveError> {
        let consecutivo = self.peek()?;
        self.next_number += 1;
        Ok(consecutivo)
    }

    /// Preview the next consecutivo without consuming it.
    pub fn peek(&self) -> Result<Consecutivo, ClaveError> {
        if self.next_number == 0 || self.next_number > MAX_SEQUENCE {
            return Err(ClaveError::SequenceExhausted);
        }
        Ok(Consecutivo(format!(
            "{:03}{:05}{}{:010}",
            self.branch,
            self.terminal,
            self.kind.code(),
            self.next_number
        )))
    }

    /// Get the next number that will be issued (without formatting).
    pub fn next_raw(&self) -> u64 {
        self.next_number
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}

fn check_width(field: &'static str, value: u64, max: u64, width: usize) -> Result<(), ClaveError> {
    if value > max {
        return Err(ClaveError::SegmentOverflow {
            field,
            value,
            width,
        });
    }
    Ok(())
}
