use thiserror::Error;

use super::collaborators::BackendError;
use crate::core::{Clave, ClaveError, TransmissionStatus};

/// Errors that stop a submission.
///
/// Rejections and connectivity problems are not errors; they are reported
/// through [`SubmissionOutcome`](super::SubmissionOutcome).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    /// The issuer is not registered with this system.
    #[error("issuer {0} is not registered")]
    UnregisteredIssuer(String),

    /// The issuer registry could not be queried.
    #[error("issuer registry failed: {0}")]
    Registry(#[source] BackendError),

    /// Clave generation or a state transition failed.
    #[error(transparent)]
    Clave(#[from] ClaveError),

    /// Only `Pending` documents can be submitted.
    #[error("document {clave} is {status}, not pending")]
    NotPending {
        clave: Clave,
        status: TransmissionStatus,
    },

    /// The XML builder failed.
    #[error("could not serialize document: {0}")]
    Payload(#[source] BackendError),

    /// The reception endpoint could not be resolved or is malformed.
    #[error("reception endpoint error: {0}")]
    Endpoint(#[source] BackendError),

    /// The HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// The final state could not be stored.
    ///
    /// When `transmitted` is true Hacienda already holds the document, so the
    /// record must be reconciled rather than resubmitted blindly.
    #[error("could not store document {clave} ({status}): {source}")]
    Persistence {
        clave: Clave,
        status: TransmissionStatus,
        transmitted: bool,
        #[source]
        source: BackendError,
    },
}
