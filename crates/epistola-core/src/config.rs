use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::generator::GenerationParams;
use crate::pipeline::FailurePolicy;
use crate::tei::CorrespondentPolicy;
use crate::triplet::DecoderConfig;
use crate::{Error, Result};

/// Run configuration. Defaults reproduce the reference run; `from_env`
/// overlays `EPISTOLA_*` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory searched for input documents.
    pub input_dir: PathBuf,
    /// Filename pattern matched inside `input_dir`.
    pub pattern: String,
    /// Aggregate JSON output.
    pub output: PathBuf,
    /// Inference endpoint of the relation-extraction model.
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub generation: GenerationParams,
    pub decoder: DecoderConfig,
    pub failure_policy: FailurePolicy,
    pub correspondent_policy: CorrespondentPolicy,
    /// Documents processed at once.
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("xml_tei"),
            pattern: "*.txt".into(),
            output: PathBuf::from("triples.json"),
            endpoint: "http://127.0.0.1:8080/generate".into(),
            request_timeout_secs: 300,
            generation: GenerationParams::default(),
            decoder: DecoderConfig::default(),
            failure_policy: FailurePolicy::default(),
            correspondent_policy: CorrespondentPolicy::default(),
            concurrency: 1,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("EPISTOLA_INPUT_DIR") {
            config.input_dir = PathBuf::from(dir);
        }
        if let Some(pattern) = lookup("EPISTOLA_PATTERN") {
            config.pattern = pattern;
        }
        if let Some(output) = lookup("EPISTOLA_OUTPUT") {
            config.output = PathBuf::from(output);
        }
        if let Some(endpoint) = lookup("EPISTOLA_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(value) = lookup("EPISTOLA_TIMEOUT_SECS") {
            config.request_timeout_secs = parse("EPISTOLA_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("EPISTOLA_MAX_INPUT_TOKENS") {
            config.generation.max_input_tokens = parse("EPISTOLA_MAX_INPUT_TOKENS", &value)?;
        }
        if let Some(value) = lookup("EPISTOLA_MAX_LENGTH") {
            config.generation.max_length = parse("EPISTOLA_MAX_LENGTH", &value)?;
        }
        if let Some(value) = lookup("EPISTOLA_NUM_BEAMS") {
            config.generation.num_beams = parse("EPISTOLA_NUM_BEAMS", &value)?;
        }
        if let Some(value) = lookup("EPISTOLA_NUM_SEQUENCES") {
            config.generation.num_return_sequences = parse("EPISTOLA_NUM_SEQUENCES", &value)?;
        }
        if let Some(lang) = lookup("EPISTOLA_SOURCE_LANG") {
            config.generation.source_lang = lang;
        }
        if let Some(value) = lookup("EPISTOLA_FAILURE_POLICY") {
            config.failure_policy = value.parse()?;
        }
        if let Some(value) = lookup("EPISTOLA_CORRESPONDENT_POLICY") {
            config.correspondent_policy = value.parse()?;
        }
        if let Some(value) = lookup("EPISTOLA_CONCURRENCY") {
            config.concurrency = parse("EPISTOLA_CONCURRENCY", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::InvalidConfig {
                key: "concurrency".into(),
                value: "0".into(),
            });
        }
        if self.generation.num_return_sequences == 0 {
            return Err(Error::InvalidConfig {
                key: "num_return_sequences".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfig {
        key: key.into(),
        value: value.into(),
    })
}
