// ── Runtime connection configuration ──
//
// Describes how to reach one ReportPortal instance. The CLI resolves
// profiles, tokens and flags into a `ServiceConfig`; core never reads
// config files.

use std::sync::Arc;
use std::time::Duration;

use rpdac_api::{ReportPortalClient, TransportConfig};
use secrecy::SecretString;

use crate::error::CoreError;
use crate::reconcile::Reconciler;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Instance URL (e.g. `https://reportportal.example.com`).
    pub endpoint: String,
    /// Bearer access token.
    pub token: SecretString,
    pub timeout: Duration,
    /// Accept self-signed certificates.
    pub insecure: bool,
}

impl ServiceConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_insecure_tls(self.insecure)
    }

    pub fn client(&self) -> Result<ReportPortalClient, CoreError> {
        ReportPortalClient::from_token(&self.endpoint, &self.token, &self.transport()).map_err(
            |source| CoreError::Client {
                endpoint: self.endpoint.clone(),
                source,
            },
        )
    }

    /// Build a [`Reconciler`] talking to this instance.
    pub fn connect(&self) -> Result<Reconciler, CoreError> {
        Ok(Reconciler::new(Arc::new(self.client()?)))
    }
}
