mod output;

pub use output::{render_records, write_records};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::PipelineConfig;
use crate::generator::{GenerationError, GenerationParams, GenerationRequest, Generator};
use crate::record::DocumentRecord;
use crate::tei::{ExtractionError, TeiExtractor};
use crate::triplet::{collect_triples, TripletDecoder};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Extraction failed for {path}: {source}")]
    Extraction {
        path: PathBuf,
        source: ExtractionError,
    },
    #[error("Generation failed for {path}: {source}")]
    Generation {
        path: PathBuf,
        source: GenerationError,
    },
    #[error("Invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Unreadable input entry: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Document task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// What a failing document does to the rest of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure and continue with the next document.
    #[default]
    Skip,
    /// Stop the run at the first failure.
    Abort,
}

impl std::str::FromStr for FailurePolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            _ => Err(crate::Error::InvalidConfig {
                key: "failure_policy".into(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Completed records, in input order.
    pub records: Vec<DocumentRecord>,
    pub failed: Vec<(PathBuf, PipelineError)>,
}

impl BatchOutput {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}

/// Extract, generate, decode and deduplicate, one document at a time or a
/// bounded number concurrently. A document contributes a complete record or
/// nothing.
#[derive(Clone)]
pub struct Pipeline {
    extractor: TeiExtractor,
    decoder: TripletDecoder,
    generator: Arc<dyn Generator>,
    params: GenerationParams,
    failure_policy: FailurePolicy,
    concurrency: usize,
}

impl Pipeline {
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            extractor: TeiExtractor::new(),
            decoder: TripletDecoder::new(),
            generator,
            params: GenerationParams::default(),
            failure_policy: FailurePolicy::default(),
            concurrency: 1,
        }
    }

    #[must_use]
    pub fn from_config(config: &PipelineConfig, generator: Arc<dyn Generator>) -> Self {
        Self::new(generator)
            .with_extractor(
                TeiExtractor::new().with_correspondent_policy(config.correspondent_policy),
            )
            .with_decoder(TripletDecoder::with_config(config.decoder.clone()))
            .with_params(config.generation.clone())
            .with_failure_policy(config.failure_policy)
            .with_concurrency(config.concurrency)
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: TeiExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: TripletDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Files in `dir` matching `pattern`, sorted.
    pub fn discover(dir: &Path, pattern: &str) -> PipelineResult<Vec<PathBuf>> {
        let escaped = glob::Pattern::escape(&dir.to_string_lossy());
        let full = format!("{escaped}/{pattern}");

        let mut paths = glob::glob(&full)?.collect::<Result<Vec<_>, _>>()?;
        paths.retain(|path| path.is_file());
        paths.sort();
        Ok(paths)
    }

    pub async fn process_file(&self, path: &Path) -> PipelineResult<DocumentRecord> {
        let record = self
            .extractor
            .extract_file(path)
            .await
            .map_err(|source| PipelineError::Extraction {
                path: path.to_path_buf(),
                source,
            })?;

        self.enrich(record)
            .await
            .map_err(|source| PipelineError::Generation {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Runs the model on the record's body text and attaches the
    /// deduplicated triples of every returned sequence.
    pub async fn enrich(&self, record: DocumentRecord) -> Result<DocumentRecord, GenerationError> {
        let request = GenerationRequest::new(record.body_text.clone(), self.params.clone());
        let sequences = self.generator.generate(&request).await?;

        let triples = collect_triples(&self.decoder, &sequences);
        tracing::debug!(
            id = %record.id,
            generator = self.generator.name(),
            sequences = sequences.len(),
            triples = triples.len(),
            "decoded triples"
        );

        Ok(record.with_triples(triples.into_vec()))
    }

    pub async fn run(&self, paths: &[PathBuf]) -> PipelineResult<BatchOutput> {
        if self.concurrency <= 1 {
            self.run_sequential(paths).await
        } else {
            self.run_concurrent(paths).await
        }
    }

    async fn run_sequential(&self, paths: &[PathBuf]) -> PipelineResult<BatchOutput> {
        let total = paths.len();
        let mut output = BatchOutput::default();

        for (index, path) in paths.iter().enumerate() {
            let result = self.process_file(path).await;
            self.settle(&mut output, path.clone(), result, index + 1, total)?;
        }

        Ok(output)
    }

    async fn run_concurrent(&self, paths: &[PathBuf]) -> PipelineResult<BatchOutput> {
        let total = paths.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::with_capacity(total);

        for (index, path) in paths.iter().cloned().enumerate() {
            let pipeline = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let task_path = path.clone();
            let handle = tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                pipeline.process_file(&task_path).await
            });
            pending.insert(handle.id(), (index, path));
        }

        let mut slots: Vec<Option<(PathBuf, PipelineResult<DocumentRecord>)>> =
            (0..total).map(|_| None).collect();
        let mut done = 0;

        while let Some(joined) = tasks.join_next_with_id().await {
            // A panicked or cancelled task counts as a failure of its document.
            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(error) => (error.id(), Err(PipelineError::Task(error))),
            };
            let Some((index, path)) = pending.remove(&id) else {
                continue;
            };
            done += 1;

            match result {
                Err(error) if self.failure_policy == FailurePolicy::Abort => {
                    tasks.abort_all();
                    tracing::error!(path = %path.display(), %error, "aborting run");
                    return Err(error);
                }
                result => {
                    log_progress(&path, result.as_ref(), done, total);
                    slots[index] = Some((path, result));
                }
            }
        }

        let mut output = BatchOutput::default();
        for (path, result) in slots.into_iter().flatten() {
            match result {
                Ok(record) => output.records.push(record),
                Err(error) => output.failed.push((path, error)),
            }
        }
        Ok(output)
    }

    fn settle(
        &self,
        output: &mut BatchOutput,
        path: PathBuf,
        result: PipelineResult<DocumentRecord>,
        done: usize,
        total: usize,
    ) -> PipelineResult<()> {
        match result {
            Ok(record) => {
                log_progress(&path, Ok(&record), done, total);
                output.records.push(record);
            }
            Err(error) if self.failure_policy == FailurePolicy::Abort => {
                tracing::error!(path = %path.display(), %error, "aborting run");
                return Err(error);
            }
            Err(error) => {
                log_progress(&path, Err(&error), done, total);
                output.failed.push((path, error));
            }
        }
        Ok(())
    }
}

fn log_progress(
    path: &Path,
    result: Result<&DocumentRecord, &PipelineError>,
    done: usize,
    total: usize,
) {
    match result {
        Ok(record) => tracing::info!(
            path = %path.display(),
            triples = record.triples.len(),
            "processed {done}/{total}"
        ),
        Err(error) => tracing::warn!(
            path = %path.display(),
            %error,
            "skipped {done}/{total}"
        ),
    }
}
