use crate::cycle::UpdatePhase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid update transition: {from} -> {to}")]
    InvalidTransition { from: UpdatePhase, to: UpdatePhase },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
