use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::invoke::CALLER_ID_HEADER;
use crate::config::{ClientConfig, TargetConfig};

/// Per-request failure as seen by one client stream. Every variant is
/// recoverable: the stream logs it and moves on to its next request.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("response body is not valid JSON: {body}")]
    MalformedResponse { body: String },
}

/// One continuously looping invocation stream against a single target.
#[derive(Clone)]
pub struct StreamWorker {
    client: reqwest::Client,
    target_name: String,
    url: String,
    caller_id: String,
    prompt: String,
}

impl StreamWorker {
    pub fn new(client: reqwest::Client, target: &TargetConfig, caller_id: &str, prompt: &str) -> Self {
        Self {
            client,
            target_name: target.name.clone(),
            url: format!("{}/invoke", target.base_url.trim_end_matches('/')),
            caller_id: caller_id.to_string(),
            prompt: prompt.to_string(),
        }
    }

    /// Issue exactly one invocation and parse the `response` payload out of
    /// the body. The unique request id embedded in the args lets responses
    /// be matched back to the request that produced them.
    pub async fn send_once(&self) -> Result<Value, StreamError> {
        let request_id = Uuid::new_v4();
        let body = json!({
            "args": {
                "prompt": self.prompt,
                "request_id": request_id,
            }
        });

        let response = self
            .client
            .post(&self.url)
            .header(CALLER_ID_HEADER, &self.caller_id)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // All non-2xx are reported uniformly; the raw body is kept for
        // diagnosis and must never break the logging path.
        if !status.is_success() {
            return Err(StreamError::Status { status, body: text });
        }

        let value: Value =
            serde_json::from_str(&text).map_err(|_| StreamError::MalformedResponse { body: text })?;
        Ok(value.get("response").cloned().unwrap_or(value))
    }

    /// Loop until cancelled or until the optional iteration cap is hit.
    /// A single failure never terminates the stream.
    pub async fn run(&self, stream_id: usize, iterations: Option<u64>, cancel: CancellationToken) {
        let mut sent: u64 = 0;
        let mut failed: u64 = 0;

        loop {
            if let Some(cap) = iterations {
                if sent >= cap {
                    break;
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                outcome = self.send_once() => {
                    sent += 1;
                    match outcome {
                        Ok(payload) => {
                            info!(
                                target_name = %self.target_name,
                                stream = stream_id,
                                %payload,
                                "invocation succeeded"
                            );
                        }
                        Err(e) => {
                            failed += 1;
                            warn!(
                                target_name = %self.target_name,
                                stream = stream_id,
                                error = %e,
                                "invocation failed"
                            );
                        }
                    }
                }
            }
        }

        info!(
            target_name = %self.target_name,
            stream = stream_id,
            sent,
            failed,
            "stream finished"
        );
    }
}

/// Drives N independent streams per configured target until cancelled.
pub struct LoadGenerator {
    client: reqwest::Client,
    cfg: ClientConfig,
}

impl LoadGenerator {
    pub fn new(cfg: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, cfg })
    }

    pub async fn run(&self, cancel: CancellationToken) {
        let mut streams = JoinSet::new();

        for target in &self.cfg.targets {
            let worker =
                StreamWorker::new(self.client.clone(), target, &self.cfg.caller_id, &self.cfg.prompt);
            for stream_id in 0..self.cfg.concurrency.max(1) {
                let worker = worker.clone();
                let cancel = cancel.clone();
                let iterations = self.cfg.iterations;
                streams.spawn(async move {
                    worker.run(stream_id, iterations, cancel).await;
                });
            }
        }

        info!(
            caller_id = %self.cfg.caller_id,
            targets = self.cfg.targets.len(),
            concurrency = self.cfg.concurrency.max(1),
            "load generation started"
        );

        // Streams are independent; a stalled one never blocks the others.
        // This only returns once every stream has wound down.
        while streams.join_next().await.is_some() {}
    }
}
