use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{GenerationError, GenerationParams, GenerationRequest, GenerationResult, Generator};

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    inputs: &'a str,
    parameters: RequestParameters<'a>,
}

#[derive(Debug, Serialize)]
struct RequestParameters<'a> {
    #[serde(flatten)]
    params: &'a GenerationParams,
    truncation: bool,
    padding: bool,
    skip_special_tokens: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Response shapes accepted from inference servers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseBody {
    Sequences { sequences: Vec<String> },
    Plain(Vec<String>),
    Generated(Vec<GeneratedText>),
}

impl ResponseBody {
    fn into_sequences(self) -> Vec<String> {
        match self {
            Self::Sequences { sequences } | Self::Plain(sequences) => sequences,
            Self::Generated(items) => items.into_iter().map(|g| g.generated_text).collect(),
        }
    }
}

/// Calls a sequence-to-sequence model served over HTTP. One attempt per
/// request, no retries.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: Client,
    endpoint: Url,
}

impl HttpGenerator {
    pub fn new(endpoint: &str, timeout: Duration) -> GenerationResult<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Generator for HttpGenerator {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<Vec<String>> {
        let body = RequestBody {
            inputs: &request.text,
            parameters: RequestParameters {
                params: &request.params,
                truncation: true,
                padding: true,
                skip_special_tokens: false,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GenerationError::Unavailable(e.to_string())
                } else {
                    GenerationError::Http(e)
                }
            })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ResponseBody = serde_json::from_str(&text)
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        let sequences = parsed.into_sequences();

        tracing::debug!(
            endpoint = %self.endpoint,
            sequences = sequences.len(),
            "model returned candidate sequences"
        );
        Ok(sequences)
    }
}
