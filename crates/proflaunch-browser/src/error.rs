use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Chrome not found (any channel). Checked: {}", format_paths(.checked))]
    ExecutableNotFound { checked: Vec<PathBuf> },

    #[error("Profile directory not found for '{0}'")]
    ProfileNotFound(String),

    #[error("No target URLs to open")]
    NoTargetUrls,

    #[error("Failed to launch Chrome: {0}")]
    Launch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidate paths".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
