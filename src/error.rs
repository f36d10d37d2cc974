use thiserror::Error;

#[derive(Debug, Error)]
pub enum NNError {
    // Propagation errors
    #[error("Invalid input size: expected {expected} values, got {actual}")]
    InvalidInputSize { expected: usize, actual: usize },
    #[error("Invalid expected size: expected {expected} values, got {actual}")]
    InvalidExpectedSize { expected: usize, actual: usize },

    // Construction errors
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // File operations
    #[error("Malformed persisted state: {0}")]
    MalformedPersistedState(String),

    // Dataset errors
    #[error("Dataset error: {0}")]
    DatasetError(String),
    #[error("Dataset has no examples")]
    EmptyDataset,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] Box<bincode::ErrorKind>),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, NNError>;
