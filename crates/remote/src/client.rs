//! HTTP clients for the neural-net scorer and text analyzer (§2, §4.3, §5).
//! Grounded on the original `orchestrator/orchestrator/main.py`'s
//! `call_llm_interface`/`call_neural_net_service` httpx posts; the
//! `reqwest::Client` builder and per-call timeout pattern follow
//! `hashdive_api.rs`'s `HashdiveScraper`.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use tokio::time::timeout;

use crate::error::RemoteError;
use crate::types::{ScoreRequest, ScoreResponse};
use riskguard_core::Transaction;

/// Default per-call deadline (§5: "default remote timeout e.g. 2s").
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerKind {
    NeuralNet,
    TextAnalyzer,
}

impl AnalyzerKind {
    fn label(self) -> &'static str {
        match self {
            AnalyzerKind::NeuralNet => "neural_net_service",
            AnalyzerKind::TextAnalyzer => "text_analyzer",
        }
    }

    fn path(self) -> &'static str {
        match self {
            AnalyzerKind::NeuralNet => "/score",
            AnalyzerKind::TextAnalyzer => "/analyze",
        }
    }
}

/// A thin wrapper around a `reqwest::Client` pointed at one remote analyzer.
/// Every call is bound to an explicit deadline so a slow dependency never
/// blocks the orchestrator's writer lock or overall request budget (§5).
pub struct RemoteAnalyzerClient {
    kind: AnalyzerKind,
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl RemoteAnalyzerClient {
    pub fn new(kind: AnalyzerKind, base_url: impl Into<String>) -> Self {
        Self::with_timeout(kind, base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(kind: AnalyzerKind, base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { kind, base_url: base_url.into(), client, timeout }
    }

    pub fn neural_net(base_url: impl Into<String>) -> Self {
        Self::new(AnalyzerKind::NeuralNet, base_url)
    }

    pub fn text_analyzer(base_url: impl Into<String>) -> Self {
        Self::new(AnalyzerKind::TextAnalyzer, base_url)
    }

    /// Scores a transaction. Not idempotent - a POST - so it is never
    /// retried (§5): a timeout or transport error surfaces directly and the
    /// orchestrator demotes it to a zero sub-score plus an `errors` entry.
    pub async fn score(&self, transaction: &Transaction) -> Result<ScoreResponse, RemoteError> {
        let url = format!("{}{}", self.base_url, self.kind.path());
        let request = ScoreRequest::new(transaction);

        let send = self.client.post(&url).json(&request).send();
        let response = timeout(self.timeout, send)
            .await
            .map_err(|_| RemoteError::Timeout { service: self.kind.label(), timeout_ms: self.timeout.as_millis() as u64 })?
            .map_err(|source| RemoteError::Request { service: self.kind.label(), source })?;

        let response = response.error_for_status().map_err(|source| RemoteError::Request {
            service: self.kind.label(),
            source,
        })?;

        timeout(self.timeout, response.json::<ScoreResponse>())
            .await
            .map_err(|_| RemoteError::Timeout { service: self.kind.label(), timeout_ms: self.timeout.as_millis() as u64 })?
            .map_err(|e| RemoteError::InvalidResponse { service: self.kind.label(), reason: e.to_string() })
    }

    /// Idempotent health probe. §5 permits "at-most-once retries with
    /// jitter for idempotent GETs only" - applied here, never to `score`.
    pub async fn health(&self) -> Result<(), RemoteError> {
        let url = format!("{}/health", self.base_url);
        const MAX_ATTEMPTS: u32 = 2;

        let mut last_err = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let jitter_ms = rand::thread_rng().gen_range(10..50);
                tokio::time::sleep(Duration::from_millis(jitter_ms)).await;
            }
            let send = self.client.get(&url).send();
            match timeout(self.timeout, send).await {
                Ok(Ok(resp)) if resp.status().is_success() => return Ok(()),
                Ok(Ok(resp)) => {
                    last_err = Some(RemoteError::InvalidResponse {
                        service: self.kind.label(),
                        reason: format!("status {}", resp.status()),
                    })
                }
                Ok(Err(source)) => last_err = Some(RemoteError::Request { service: self.kind.label(), source }),
                Err(_) => {
                    last_err = Some(RemoteError::Timeout {
                        service: self.kind.label(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    })
                }
            }
        }
        Err(last_err.unwrap_or(RemoteError::InvalidResponse {
            service: self.kind.label(),
            reason: "no attempts made".to_string(),
        }))
    }
}
