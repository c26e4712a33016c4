use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BlogError {
    fn from(err: reqwest::Error) -> Self {
        BlogError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
