//! HTTP token-classification recognizer
//!
//! Talks to an inference endpoint using the Hugging Face token-classification
//! protocol:
//!
//! ```text
//! POST {endpoint}
//! {"inputs": "...", "parameters": {"aggregation_strategy": "simple", "ignore_labels": ["O"]},
//!  "options": {"wait_for_model": false}}
//! ```
//!
//! The response is a JSON array of entity spans. A `503` carrying an
//! `estimated_time` means the model is still being loaded.

use super::{EntityRecognizer, RawSpan, RecognitionOptions};
use crate::config::{OffsetUnit, RecognizerConfig, SecretString};
use crate::domain::{RecognizerError, Result, VeilError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text sent by the initialization probe
const PROBE_TEXT: &str = "Initialization probe for John Smith.";

/// HTTP recognizer
///
/// # Example
///
/// ```no_run
/// use veil::adapters::recognizer::{EntityRecognizer, HttpRecognizer, RecognitionOptions};
/// use veil::config::RecognizerConfig;
///
/// # async fn example() -> veil::domain::Result<()> {
/// let config = RecognizerConfig {
///     enabled: true,
///     endpoint: "http://localhost:8080/predict".to_string(),
///     ..RecognizerConfig::default()
/// };
/// let recognizer = HttpRecognizer::new(&config)?;
/// let spans = recognizer
///     .recognize("Mail jane@example.com", &RecognitionOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpRecognizer {
    endpoint: String,
    client: Client,
    api_token: Option<SecretString>,
    options: RecognitionOptions,
    load_timeout: Duration,
    offset_unit: OffsetUnit,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a RecognitionOptions,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

/// Single input responses are flat; some servers wrap them in a batch
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Flat(Vec<RawSpan>),
    Batched(Vec<Vec<RawSpan>>),
}

#[derive(Deserialize)]
struct LoadingBody {
    #[serde(default)]
    estimated_time: Option<f64>,
}

impl HttpRecognizer {
    /// Create a recognizer from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn new(config: &RecognizerConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .build()
            .map_err(|e| VeilError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
            api_token: config.api_token.clone(),
            options: RecognitionOptions::from(config),
            load_timeout: Duration::from_secs(config.load_timeout_seconds),
            offset_unit: config.offset_unit,
        })
    }

    async fn send(
        &self,
        text: &str,
        options: &RecognitionOptions,
        wait_for_model: bool,
        timeout: Option<Duration>,
    ) -> std::result::Result<Vec<RawSpan>, RecognizerError> {
        let body = InferenceRequest {
            inputs: text,
            parameters: options,
            options: RequestOptions { wait_for_model },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref token) = self.api_token {
            request = request.bearer_auth(token.expose_secret().as_ref());
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let resp = request.send().await.map_err(map_transport_error)?;
        let status = resp.status();

        match status {
            StatusCode::OK => {
                let parsed: InferenceResponse = resp
                    .json()
                    .await
                    .map_err(|e| RecognizerError::InvalidResponse(e.to_string()))?;
                Ok(match parsed {
                    InferenceResponse::Flat(spans) => spans,
                    InferenceResponse::Batched(batches) => {
                        batches.into_iter().next().unwrap_or_default()
                    }
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = resp.text().await.unwrap_or_default();
                Err(RecognizerError::AuthenticationFailed(format!("{status}: {body}")))
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                let body = resp.text().await.unwrap_or_default();
                match serde_json::from_str::<LoadingBody>(&body) {
                    Ok(LoadingBody {
                        estimated_time: Some(seconds),
                    }) => Err(RecognizerError::ModelLoading(seconds)),
                    _ => Err(RecognizerError::ServerError {
                        status: status.as_u16(),
                        message: body,
                    }),
                }
            }
            status if status.is_client_error() => Err(RecognizerError::ClientError {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            }),
            status if status.is_server_error() => Err(RecognizerError::ServerError {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            }),
            status => Err(RecognizerError::InvalidResponse(format!(
                "Unexpected status {status}"
            ))),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> RecognizerError {
    if e.is_timeout() {
        RecognizerError::Timeout(e.to_string())
    } else {
        RecognizerError::ConnectionFailed(e.to_string())
    }
}

#[async_trait]
impl EntityRecognizer for HttpRecognizer {
    async fn load(&self) -> std::result::Result<(), RecognizerError> {
        tracing::debug!(endpoint = %self.endpoint, "Probing recognizer endpoint");
        self.send(PROBE_TEXT, &self.options, true, Some(self.load_timeout))
            .await
            .map(|_| ())
    }

    async fn recognize(
        &self,
        text: &str,
        options: &RecognitionOptions,
    ) -> std::result::Result<Vec<RawSpan>, RecognizerError> {
        self.send(text, options, false, None).await
    }

    fn offset_unit(&self) -> OffsetUnit {
        self.offset_unit
    }
}
