//! Application state

use common::Config;
use webhook::SignatureVerifier;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub verifier: SignatureVerifier,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let verifier = SignatureVerifier::new(config.webhook_secret.clone());
        Self { config, verifier }
    }
}
