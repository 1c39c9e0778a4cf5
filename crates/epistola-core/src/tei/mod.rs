mod correspondence;
mod extractor;
mod tree;

pub use correspondence::{Correspondence, CorrespondentPolicy};
pub use extractor::{ExtractionError, ExtractionResult, TeiExtractor};
pub use tree::{Element, XmlError, XmlResult};
