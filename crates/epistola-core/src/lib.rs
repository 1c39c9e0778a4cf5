pub mod config;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod record;
pub mod tei;
pub mod triplet;

#[cfg(test)]
mod fixtures;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use generator::{
    GenerationError, GenerationParams, GenerationRequest, GenerationResult, Generator,
    HttpGenerator, MockGenerator,
};
pub use pipeline::{
    render_records, write_records, BatchOutput, FailurePolicy, Pipeline, PipelineError,
    PipelineResult,
};
pub use record::{DocumentRecord, KeyedName, Person, Place};
pub use tei::{CorrespondentPolicy, ExtractionError, TeiExtractor};
pub use triplet::{collect_triples, DecoderConfig, Triple, TripleSet, TripletDecoder};
