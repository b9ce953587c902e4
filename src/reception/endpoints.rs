//! Hacienda environments and a configuration-backed [`EndpointResolver`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::collaborators::{BackendError, EndpointResolver};

const SANDBOX_URI: &str = "https://api-sandbox.comprobanteselectronicos.go.cr/recepcion/v1/";
const PRODUCTION_URI: &str = "https://api.comprobanteselectronicos.go.cr/recepcion/v1/";

/// A Hacienda reception environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Testing environment ("pruebas").
    Sandbox,
    Production,
    /// Any other base URI, e.g. a local stub.
    Custom(String),
}

impl Environment {
    /// Base URI, always ending with `/`.
    pub fn base_uri(&self) -> String {
        match self {
            Self::Sandbox => SANDBOX_URI.to_string(),
            Self::Production => PRODUCTION_URI.to_string(),
            Self::Custom(uri) if uri.ends_with('/') => uri.clone(),
            Self::Custom(uri) => format!("{uri}/"),
        }
    }
}

/// Issuer → environment table, typically loaded from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticEndpoints {
    /// Used for issuers without an explicit entry.
    pub default: Option<Environment>,
    pub issuers: HashMap<String, Environment>,
}

impl StaticEndpoints {
    pub fn with_default(environment: Environment) -> Self {
        Self {
            default: Some(environment),
            issuers: HashMap::new(),
        }
    }

    pub fn issuer(mut self, tax_id: impl Into<String>, environment: Environment) -> Self {
        self.issuers.insert(tax_id.into(), environment);
        self
    }

    fn lookup(&self, issuer: &str) -> Option<&Environment> {
        self.issuers.get(issuer).or(self.default.as_ref())
    }
}

impl EndpointResolver for StaticEndpoints {
    async fn resolve(&self, issuer: &str) -> Result<String, BackendError> {
        self.lookup(issuer)
            .map(Environment::base_uri)
            .ok_or_else(|| format!("no reception environment configured for issuer {issuer}").into())
    }
}
