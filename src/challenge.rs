use anyhow::Context;
use axum::async_trait;
use serde::Deserialize;

use crate::config::ChallengeConfig;

/// External proof-of-humanity collaborator.
#[async_trait]
pub trait ChallengeVerifier: Send + Sync {
    /// Returns true when the challenge service accepts the client token.
    async fn verify(&self, token: &str) -> anyhow::Result<bool>;
}

/// Verifies challenge tokens against an HTTP verification endpoint.
pub struct HttpChallengeVerifier {
    client: reqwest::Client,
    verify_url: String,
    secret: String,
}

#[derive(Debug, Deserialize)]
struct ChallengeOutcome {
    success: bool,
}

impl HttpChallengeVerifier {
    pub fn new(config: &ChallengeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url: config.verify_url.clone(),
            secret: config.secret.clone(),
        }
    }
}

#[async_trait]
impl ChallengeVerifier for HttpChallengeVerifier {
    async fn verify(&self, token: &str) -> anyhow::Result<bool> {
        let outcome: ChallengeOutcome = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await
            .context("challenge verification request")?
            .error_for_status()
            .context("challenge verification status")?
            .json()
            .await
            .context("decode challenge verification response")?;
        Ok(outcome.success)
    }
}
