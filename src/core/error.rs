use thiserror::Error;

/// Errors raised while building, parsing or inspecting a clave.
///
/// Every variant is structural: it points at a programming or configuration
/// mistake and is never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ClaveError {
    /// The composed or parsed clave is not exactly 50 characters long.
    #[error("clave must be {expected} digits, got {actual}")]
    Length { expected: usize, actual: usize },

    /// The issuer tax ID has more digits than the 12-digit segment allows.
    #[error("issuer ID '{0}' exceeds 12 digits")]
    IssuerTooLong(String),

    /// The issuer tax ID contains no digits at all.
    #[error("issuer ID is empty")]
    IssuerEmpty,

    /// The country code is not a 3-digit numeric code.
    #[error("invalid country code '{0}'")]
    Country(String),

    /// The consecutivo is not a 20-digit numeric string.
    #[error("invalid consecutivo '{value}': {reason}")]
    Consecutivo { value: String, reason: String },

    /// A field that must be numeric contains other characters.
    #[error("{field} must be numeric")]
    NonNumeric { field: &'static str },

    /// A situation digit outside 1..=3.
    #[error("unknown situation code '{0}'")]
    Situation(char),

    /// A check digit in a parsed clave does not match its field.
    #[error("check digit mismatch for {field}")]
    CheckDigit { field: &'static str },

    /// A consecutivo sequence ran past its 10-digit range.
    #[error("consecutivo sequence exhausted")]
    SequenceExhausted,

    /// A branch or terminal number does not fit its segment.
    #[error("{field} {value} does not fit in {width} digits")]
    SegmentOverflow {
        field: &'static str,
        value: u64,
        width: usize,
    },

    /// The transmission status cannot move from `from` to `to`.
    #[error("cannot move transmission status from {from} to {to}")]
    StatusTransition { from: String, to: String },

    /// The document already left the normal situation once.
    #[error("situation already changed to {0}")]
    SituationLocked(String),
}
