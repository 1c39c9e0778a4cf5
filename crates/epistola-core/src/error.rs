use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid triple: {0}")]
    InvalidTriple(String),

    #[error("Invalid keyed name: {0}")]
    InvalidKeyedName(String),

    #[error("Invalid config value for {key}: {value}")]
    InvalidConfig { key: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
