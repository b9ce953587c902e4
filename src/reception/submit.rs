//! Drives a document through one transmission attempt.

use tracing::{debug, info, warn};

use super::client::{Envelope, GatewayFailure, GatewayReply, RECEPTION_PATH, ReceptionClient};
use super::collaborators::{
    DocumentStore, EndpointResolver, IssuerRegistry, StoredDocument, TokenProvider, XmlBuilder,
};
use super::document::{Document, DocumentData};
use super::error::SubmitError;
use crate::core::{Clave, Situation, TransmissionStatus};

/// Why a document could not reach the reception API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfflineReason {
    /// The token provider returned nothing.
    NoToken,
    /// The token provider did not answer within the reception timeout.
    TokenTimeout,
    /// Connect, DNS, timeout or I/O failure.
    Connection(String),
}

/// How one submission attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Received by Hacienda (HTTP 201/202); status is now `Sent`.
    Sent { status: u16 },
    /// Refused by Hacienda (HTTP 4xx); the document stays `Pending` under
    /// its original clave.
    Rejected {
        status: u16,
        cause: Option<String>,
        body: String,
    },
    /// Answered with a status that is neither acceptance nor a client
    /// error; the document stays `Pending` under its original clave.
    Unexpected { status: u16 },
    /// Hacienda was not reached; the document now carries a
    /// `NoConnectivity` clave and waits for a later transmission pass.
    Offline(OfflineReason),
}

/// Result of [`Submitter::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    /// Clave the document was stored under.
    pub clave: Clave,
    pub outcome: SubmissionOutcome,
}

/// Creates documents and submits them to the Hacienda reception API.
///
/// Holds no per-document state; one instance can serve many concurrent
/// submissions.
pub struct Submitter<R, X, T, E, S> {
    registry: R,
    builder: X,
    tokens: T,
    endpoints: E,
    store: S,
    client: ReceptionClient,
}

impl<R, X, T, E, S> Submitter<R, X, T, E, S>
where
    R: IssuerRegistry,
    T: TokenProvider,
    E: EndpointResolver,
    S: DocumentStore,
{
    pub fn new(
        registry: R,
        builder: X,
        tokens: T,
        endpoints: E,
        store: S,
        client: ReceptionClient,
    ) -> Self {
        Self {
            registry,
            builder,
            tokens,
            endpoints,
            store,
            client,
        }
    }

    pub fn builder(&self) -> &X {
        &self.builder
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    /// Create a document with situation `Normal`, status `Pending` and a fresh clave.
    ///
    /// Fails if the issuer is not registered.
    pub async fn create_document<P>(&self, data: DocumentData<P>) -> Result<Document<P>, SubmitError> {
        let issuer = &data.issuer.number;
        if !self
            .registry
            .exists(issuer)
            .await
            .map_err(SubmitError::Registry)?
        {
            return Err(SubmitError::UnregisteredIssuer(issuer.clone()));
        }
        let document = Document::new(data)?;
        debug!(clave = %document.clave(), "document created");
        Ok(document)
    }

    /// Submit `document` once and store the result.
    ///
    /// When the API cannot be reached (no token, a token fetch slower than
    /// the client timeout, or a connection-level failure) the document switches to `NoConnectivity` and gets a new
    /// clave; it is stored under that clave without a resend. A 4xx reply
    /// leaves the document `Pending` under its original clave.
    ///
    /// Returns the clave the document was stored under, together with the
    /// outcome of the attempt.
    #[tracing::instrument(skip_all, fields(clave = %document.clave(), issuer = %document.issuer_number()))]
    pub async fn submit<P: Sync>(
        &self,
        document: &mut Document<P>,
    ) -> Result<SubmissionReport, SubmitError>
    where
        X: XmlBuilder<P>,
    {
        match document.status() {
            TransmissionStatus::Pending => {}
            status @ (TransmissionStatus::Sent
            | TransmissionStatus::Confirmed
            | TransmissionStatus::AcceptedFull
            | TransmissionStatus::AcceptedPartial
            | TransmissionStatus::Rejected) => {
                return Err(SubmitError::NotPending {
                    clave: document.clave().clone(),
                    status,
                });
            }
        }

        let mut xml = self.build(document)?;
        let outcome = self.transmit(document, &xml).await?;

        match &outcome {
            SubmissionOutcome::Sent { status } => {
                info!(status, "document received by Hacienda");
                document.advance(TransmissionStatus::Sent)?;
            }
            SubmissionOutcome::Rejected { status, cause, .. } => {
                warn!(status, cause = cause.as_deref(), "document rejected by Hacienda");
            }
            SubmissionOutcome::Unexpected { status } => {
                warn!(status, "unexpected reply from reception API");
            }
            SubmissionOutcome::Offline(reason) => {
                warn!(?reason, "reception API unreachable");
                match document.situation() {
                    Situation::Normal | Situation::Contingency => {
                        let clave = document.go_offline()?;
                        info!(new_clave = %clave, "clave regenerated for offline issue");
                        xml = self.build(document)?;
                    }
                    Situation::NoConnectivity => {
                        debug!("document already offline, keeping clave");
                    }
                }
            }
        }

        let clave = document.clave().clone();
        let status = document.status();
        let record = StoredDocument {
            clave: clave.clone(),
            issuer: document.issuer_number().to_string(),
            status,
            xml,
        };
        if let Err(source) = self.store.save(record).await {
            return Err(SubmitError::Persistence {
                clave,
                status,
                transmitted: matches!(outcome, SubmissionOutcome::Sent { .. }),
                source,
            });
        }

        Ok(SubmissionReport { clave, outcome })
    }

    fn build<P>(&self, document: &Document<P>) -> Result<Vec<u8>, SubmitError>
    where
        X: XmlBuilder<P>,
    {
        self.builder
            .build(document.clave(), document.data())
            .map_err(SubmitError::Payload)
    }

    async fn transmit<P>(
        &self,
        document: &Document<P>,
        xml: &[u8],
    ) -> Result<SubmissionOutcome, SubmitError> {
        let issuer = document.issuer_number();
        let fetch = self.tokens.get_token(issuer);
        let token = match tokio::time::timeout(self.client.timeout(), fetch).await {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(SubmissionOutcome::Offline(OfflineReason::NoToken)),
            Err(_) => {
                debug!(timeout = ?self.client.timeout(), "token provider timed out");
                return Ok(SubmissionOutcome::Offline(OfflineReason::TokenTimeout));
            }
        };

        let base = self
            .endpoints
            .resolve(issuer)
            .await
            .map_err(SubmitError::Endpoint)?;
        let url = format!("{base}{RECEPTION_PATH}");
        let envelope = Envelope::new(document, xml);
        debug!(%url, "posting document");

        let outcome = match self.client.post(&url, &token.value, &envelope).await {
            Ok(GatewayReply::Accepted { status }) => SubmissionOutcome::Sent { status },
            Ok(GatewayReply::Rejected {
                status,
                cause,
                body,
            }) => {
                if matches!(status, 401 | 403) {
                    self.tokens.refused(issuer);
                }
                SubmissionOutcome::Rejected {
                    status,
                    cause,
                    body,
                }
            }
            Ok(GatewayReply::Unexpected { status }) => SubmissionOutcome::Unexpected { status },
            Err(GatewayFailure::Unreachable(err)) => {
                SubmissionOutcome::Offline(OfflineReason::Connection(err.to_string()))
            }
            Err(err @ GatewayFailure::InvalidRequest(_)) => {
                return Err(SubmitError::Endpoint(Box::new(err)));
            }
        };
        Ok(outcome)
    }
}
