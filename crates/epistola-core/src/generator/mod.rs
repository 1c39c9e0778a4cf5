mod http;
mod mock;

pub use http::HttpGenerator;
pub use mock::MockGenerator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Model server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
    #[error("Model unavailable: {0}")]
    Unavailable(String),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Decoding parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Input is truncated or padded to this many tokens by the server's
    /// tokenizer.
    pub max_input_tokens: usize,
    pub max_length: usize,
    pub num_beams: usize,
    pub num_return_sequences: usize,
    pub length_penalty: f32,
    /// Language tag of the input text.
    pub source_lang: String,
    /// Start token selecting the output language/format.
    pub decoder_start_token: String,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_input_tokens: 256,
            max_length: 256,
            num_beams: 3,
            num_return_sequences: 3,
            length_penalty: 0.0,
            source_lang: "it_XX".into(),
            decoder_start_token: "tp_XX".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub text: String,
    pub params: GenerationParams,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(text: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }
}

/// A relation-extraction model behind some boundary. Returns the raw
/// candidate sequences, special tokens included.
///
/// Implementations are created once per run and shared read-only.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<Vec<String>>;
}
