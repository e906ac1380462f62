use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid regex: {0}")]
    InvalidPattern(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
