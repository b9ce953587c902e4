//! Traits for the services a submission depends on.
//!
//! Implementations must be shareable across tasks: many documents are
//! submitted concurrently through one [`Submitter`](super::Submitter).

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::DocumentData;
use crate::core::{Clave, TransmissionStatus};

/// Error type returned by collaborator implementations.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Registry of taxpayers allowed to issue documents through this system.
pub trait IssuerRegistry: Send + Sync {
    /// Whether `tax_id` is a registered issuer.
    fn exists(&self, tax_id: &str) -> impl Future<Output = Result<bool, BackendError>> + Send;
}

/// Serializes (and signs) a document for transmission.
///
/// Called once for every clave a document is sent or stored under.
pub trait XmlBuilder<P>: Send + Sync {
    fn build(&self, clave: &Clave, data: &DocumentData<P>) -> Result<Vec<u8>, BackendError>;
}

/// Bearer token for the reception API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    /// When the token stops being accepted, if the provider reported it.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    pub fn expiring_at(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at: Some(expires_at),
        }
    }
}

/// Source of access tokens for an issuer's credentials.
///
/// Any failure to obtain a token is reported as `None`; a submission treats
/// it exactly like an unreachable API.
///
/// The fetch is bounded by the reception timeout; a provider that does not
/// answer in time is treated as unreachable too.
pub trait TokenProvider: Send + Sync {
    fn get_token(&self, issuer: &str) -> impl Future<Output = Option<AccessToken>> + Send;

    /// Hacienda refused `issuer`'s token with 401 or 403.
    fn refused(&self, _issuer: &str) {}
}

/// Maps an issuer to the base URI of the reception API it must use.
///
/// The returned URI ends with `/`; the reception endpoint is
/// `base + "recepcion"`.
pub trait EndpointResolver: Send + Sync {
    fn resolve(&self, issuer: &str) -> impl Future<Output = Result<String, BackendError>> + Send;
}

/// One stored submission, keyed by its clave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub clave: Clave,
    pub issuer: String,
    pub status: TransmissionStatus,
    /// Serialized document as built for `clave`.
    pub xml: Vec<u8>,
}

/// Persistence for submitted documents.
///
/// Receives structured fields only; escaping and parameterization are the
/// backend's job.
pub trait DocumentStore: Send + Sync {
    fn save(&self, record: StoredDocument) -> impl Future<Output = Result<(), BackendError>> + Send;
}
