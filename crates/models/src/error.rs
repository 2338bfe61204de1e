use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("'sequence' must be list")]
    SequenceNotList,

    #[error("'sequence' must contain only numbers")]
    SequenceNotNumeric,

    #[error("request body is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OracleError>;
