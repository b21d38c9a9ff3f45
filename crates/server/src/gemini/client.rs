//! Gemini API client.
//!
//! Provides both streaming and non-streaming access to the
//! `generateContent` endpoints of the Generative Language API.

use std::sync::Arc;

use async_stream::stream;
use futures::Stream;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{GenerateContentRequest, GenerateContentResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    api_base: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::Config` if the API key is not a valid header
    /// value and `GeminiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| GeminiError::Config("API key contains invalid characters".to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.inner.api_base)
    }

    /// Generate a complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers with an
    /// error status.
    #[instrument(skip(self, request))]
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(model, "generateContent"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Generate a response as a stream of partial responses.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial request fails.
    #[instrument(skip(self, request))]
    pub async fn generate_stream(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<impl Stream<Item = Result<GenerateContentResponse, GeminiError>>, GeminiError>
    {
        let url = format!("{}?alt=sse", self.endpoint(model, "streamGenerateContent"));
        let response = self.inner.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        Ok(stream! {
            use futures::StreamExt;

            let mut buffer: Vec<u8> = Vec::new();
            let mut byte_stream = std::pin::pin!(response.bytes_stream());

            while let Some(chunk_result) = byte_stream.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        buffer.extend(chunk.iter().filter(|b| **b != b'\r'));

                        while let Some(event) = extract_sse_event(&mut buffer) {
                            if let Some(parsed) = parse_sse_event(&event) {
                                yield parsed;
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(GeminiError::Stream(e.to_string()));
                    }
                }
            }

            // Final event may arrive without a trailing blank line.
            if !buffer.is_empty() {
                let tail = String::from_utf8_lossy(&buffer).into_owned();
                if let Some(parsed) = parse_sse_event(&tail) {
                    yield parsed;
                }
            }
        })
    }
}

/// Map an error status to a `GeminiError`.
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> GeminiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return GeminiError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return GeminiError::Unauthorized("API key rejected".to_string());
    }

    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => GeminiError::Api {
                status: api_error.error.status,
                message: api_error.error.message,
            },
            Err(_) => GeminiError::Api {
                status: status.to_string(),
                message: body,
            },
        },
        Err(e) => GeminiError::Http(e),
    }
}

/// Take one complete SSE event (terminated by a blank line) off the buffer.
fn extract_sse_event(buffer: &mut Vec<u8>) -> Option<String> {
    let idx = buffer.windows(2).position(|w| w == b"\n\n")?;
    let mut event: Vec<u8> = buffer.drain(..idx + 2).collect();
    event.truncate(idx);
    Some(String::from_utf8_lossy(&event).into_owned())
}

/// Parse the `data:` payload of an SSE event.
fn parse_sse_event(event: &str) -> Option<Result<GenerateContentResponse, GeminiError>> {
    if event.trim().is_empty() {
        return None;
    }

    let data: String = event
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n");

    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    Some(
        serde_json::from_str::<GenerateContentResponse>(&data)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse stream event: {e}"))),
    )
}
