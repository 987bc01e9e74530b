use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApneaError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Results requested before the analysis ended")]
    PrematureRead,

    #[error("Analysis aborted")]
    Aborted,
}

pub type Result<T> = std::result::Result<T, ApneaError>;
