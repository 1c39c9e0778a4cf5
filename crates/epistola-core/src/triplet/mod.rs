mod decoder;
mod normalizer;
mod triple;

pub use decoder::{DecoderConfig, TripletDecoder};
pub use normalizer::{collect_triples, TripleSet};
pub use triple::Triple;
