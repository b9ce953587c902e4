//! Submission of electronic documents to the Hacienda reception API.
//!
//! A [`Submitter`] ties together the collaborators a submission needs
//! (issuer registry, XML builder, token provider, endpoint resolver and
//! document store) and runs one transmission attempt per call:
//!
//! 1. serialize the document under its current clave,
//! 2. obtain an access token for the issuer,
//! 3. POST the envelope to `<base URI>recepcion`,
//! 4. on HTTP 201/202 mark the document `Sent`; on 4xx keep it `Pending`;
//!    if no token was available or the API was unreachable, switch the
//!    document to `NoConnectivity` and regenerate its clave,
//! 5. store the final clave, status and XML.
//!
//! # Example
//!
//! ```no_run
//! use factura_cr::core::*;
//! use factura_cr::reception::*;
//!
//! struct Xml;
//! impl XmlBuilder<String> for Xml {
//!     fn build(&self, clave: &Clave, data: &DocumentData<String>) -> Result<Vec<u8>, BackendError> {
//!         Ok(format!("<FacturaElectronica><Clave>{clave}</Clave>{}</FacturaElectronica>", data.body).into_bytes())
//!     }
//! }
//!
//! struct Tokens;
//! impl TokenProvider for Tokens {
//!     async fn get_token(&self, _issuer: &str) -> Option<AccessToken> {
//!         Some(AccessToken::new("token"))
//!     }
//! }
//!
//! # async fn run(data: DocumentData<String>) -> Result<(), SubmitError> {
//! let submitter = Submitter::new(
//!     StaticRegistry::new(["3101123456"]),
//!     Xml,
//!     CachedTokens::new(Tokens),
//!     StaticEndpoints::with_default(Environment::Sandbox),
//!     MemoryStore::new(),
//!     ReceptionClient::new(&ReceptionConfig::default())?,
//! );
//! let mut document = submitter.create_document(data).await?;
//! let report = submitter.submit(&mut document).await?;
//! println!("stored under {}: {:?}", report.clave, report.outcome);
//! # Ok(())
//! # }
//! ```

mod client;
mod collaborators;
mod document;
mod endpoints;
mod error;
mod memory;
mod submit;
mod token_cache;

pub use client::{
    Envelope, GatewayFailure, GatewayReply, Party, RECEPTION_PATH, ReceptionClient,
    ReceptionConfig,
};
pub use collaborators::{
    AccessToken, BackendError, DocumentStore, EndpointResolver, IssuerRegistry, StoredDocument,
    TokenProvider, XmlBuilder,
};
pub use document::{Document, DocumentData};
pub use endpoints::{Environment, StaticEndpoints};
pub use error::SubmitError;
pub use memory::{MemoryStore, StaticRegistry};
pub use submit::{OfflineReason, SubmissionOutcome, SubmissionReport, Submitter};
pub use token_cache::CachedTokens;
