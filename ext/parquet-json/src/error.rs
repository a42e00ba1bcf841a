use parquet_records::DecodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// Bad or missing arguments; reported before any file is touched
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}
