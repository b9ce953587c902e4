//! HTTP client for the Hacienda reception endpoint.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::SecondsFormat;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::document::Document;
use crate::core::IdentificationType;

/// Path appended to an issuer's base URI.
pub const RECEPTION_PATH: &str = "recepcion";

/// Header in which Hacienda explains a rejected request.
const ERROR_CAUSE_HEADER: &str = "x-error-cause";

/// Settings for [`ReceptionClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceptionConfig {
    /// Upper bound for a whole request, connect included.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ReceptionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("factura-cr/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ReceptionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `emisor` / `receptor` object of the request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub tipo_identificacion: IdentificationType,
    pub numero_identificacion: String,
}

/// JSON body POSTed to the reception endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub clave: String,
    pub fecha: String,
    pub emisor: Party,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receptor: Option<Party>,
    /// Base64 of the serialized document.
    pub comprobante_xml: String,
}

impl Envelope {
    /// Build the body for `document`, whose serialized form is `xml`.
    pub fn new<P>(document: &Document<P>, xml: &[u8]) -> Self {
        let data = document.data();
        Self {
            clave: document.clave().to_string(),
            fecha: data.issued_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            emisor: Party {
                tipo_identificacion: data.issuer.kind,
                numero_identificacion: data.issuer.number.clone(),
            },
            receptor: data.receiver.as_ref().map(|r| Party {
                tipo_identificacion: r.kind,
                numero_identificacion: r.number.clone(),
            }),
            comprobante_xml: STANDARD.encode(xml),
        }
    }
}

/// A response from the reception endpoint, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply {
    /// 201 or 202: the document was received for processing.
    Accepted { status: u16 },
    /// 4xx: Hacienda understood the request and refused it.
    Rejected {
        status: u16,
        cause: Option<String>,
        body: String,
    },
    /// Any other status.
    Unexpected { status: u16 },
}

/// The request never produced a response.
#[derive(Debug, thiserror::Error)]
pub enum GatewayFailure {
    /// Connect, DNS, timeout or I/O failure.
    #[error("reception API unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    /// The request could not be built, e.g. a malformed endpoint URI.
    #[error("invalid reception request: {0}")]
    InvalidRequest(#[source] reqwest::Error),
}

/// Thin wrapper over a [`reqwest::Client`] with the reception timeout applied.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ReceptionClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReceptionClient {
    pub fn new(config: &ReceptionConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    /// Upper bound applied to each request, and to the token fetch before it.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST `envelope` to `url` with a bearer token.
    pub async fn post(
        &self,
        url: &str,
        token: &str,
        envelope: &Envelope,
    ) -> Result<GatewayReply, GatewayFailure> {
        let resp = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, format!("bearer {token}"))
            .json(envelope)
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        if status == StatusCode::CREATED || status == StatusCode::ACCEPTED {
            return Ok(GatewayReply::Accepted {
                status: status.as_u16(),
            });
        }
        if status.is_client_error() {
            let cause = resp
                .headers()
                .get(ERROR_CAUSE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = match resp.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(status = status.as_u16(), %err, "could not read rejection body");
                    String::new()
                }
            };
            return Ok(GatewayReply::Rejected {
                status: status.as_u16(),
                cause,
                body,
            });
        }
        Ok(GatewayReply::Unexpected {
            status: status.as_u16(),
        })
    }
}

fn classify(err: reqwest::Error) -> GatewayFailure {
    if err.is_builder() {
        GatewayFailure::InvalidRequest(err)
    } else {
        GatewayFailure::Unreachable(err)
    }
}
