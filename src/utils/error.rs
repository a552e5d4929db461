use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown output format: {0}")]
    Format(String),

    #[error("Invalid hostname: {0:?}")]
    InvalidHostname(String),
}

pub type Result<T> = std::result::Result<T, DiagError>;
