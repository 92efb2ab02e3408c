//! Client for the automation webhook that turns tasks into board items.

use crate::config::{ConfigError, HubConfig};
use crate::task::{ExpandedTask, SubmissionPayload};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook endpoint is not configured")]
    NotConfigured,
    #[error("webhook rejected the payload with HTTP {status}")]
    Rejected { status: u16 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Outcome of posting a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub tarefa: String,
    /// `None` when the request never got a response.
    pub status: Option<u16>,
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub ok: bool,
    pub message: String,
    pub results: Vec<DeliveryResult>,
}

pub struct WebhookClient {
    endpoint: String,
    delay: Duration,
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        delay: Duration,
    ) -> Result<Self, WebhookError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(WebhookError::NotConfigured);
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint,
            delay,
            client,
        })
    }

    pub fn from_config(config: &HubConfig) -> Result<Self, WebhookError> {
        if !config.endpoint_configured() {
            return Err(WebhookError::NotConfigured);
        }
        Self::new(config.make_endpoint.clone(), config.timeout(), config.delay()?)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts every task in order, one request each, waiting `delay` between
    /// requests.
    ///
    /// Per-task failures are collected into the report instead of aborting the
    /// run. `progress` receives the completed fraction after each task.
    pub async fn send_tasks<F>(&self, tasks: &[ExpandedTask], mut progress: F) -> DeliveryReport
    where
        F: FnMut(f64),
    {
        let total = tasks.len();
        let mut results = Vec::with_capacity(total);
        let mut errors = Vec::new();

        for (idx, task) in tasks.iter().enumerate() {
            match self.client.post(&self.endpoint).json(task).send().await {
                Ok(response) => {
                    let status = response.status();
                    let ok = status.is_success();
                    if !ok {
                        warn!(tarefa = %task.tarefa, status = status.as_u16(), "webhook rejected task");
                        errors.push(format!("{}: HTTP {}", task.tarefa, status.as_u16()));
                    }
                    results.push(DeliveryResult {
                        tarefa: task.tarefa.clone(),
                        status: Some(status.as_u16()),
                        ok,
                    });
                }
                Err(err) => {
                    warn!(tarefa = %task.tarefa, error = %err, "webhook request failed");
                    errors.push(format!("{}: {err}", task.tarefa));
                    results.push(DeliveryResult {
                        tarefa: task.tarefa.clone(),
                        status: None,
                        ok: false,
                    });
                }
            }

            progress((idx + 1) as f64 / total as f64);

            if idx + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let report = if errors.is_empty() {
            DeliveryReport {
                ok: true,
                message: format!("{total} tarefas criadas com sucesso!"),
                results,
            }
        } else {
            DeliveryReport {
                ok: false,
                message: format!("Erros em {} tarefas:\n{}", errors.len(), errors.join("\n")),
                results,
            }
        };
        info!(total, failed = errors.len(), "webhook delivery finished");
        report
    }

    /// Posts the combined submission object in a single request.
    pub async fn send_payload(&self, payload: &SubmissionPayload) -> Result<(), WebhookError> {
        let response = self.client.post(&self.endpoint).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(pending_id = %payload.pending_id, status = status.as_u16(), "webhook rejected payload");
            return Err(WebhookError::Rejected {
                status: status.as_u16(),
            });
        }
        debug!(pending_id = %payload.pending_id, "payload delivered");
        Ok(())
    }
}
