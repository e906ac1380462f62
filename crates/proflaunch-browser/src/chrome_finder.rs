use crate::{Channel, Error, Result};
use std::path::{Path, PathBuf};

/// Locates the Chrome binary on the system
pub struct ChromeFinder {
    custom_path: Option<PathBuf>,
    preferred: Channel,
}

impl ChromeFinder {
    /// Create a new ChromeFinder with an optional user-selected path and the
    /// preferred release channel
    pub fn new(custom_path: Option<PathBuf>, preferred: Channel) -> Self {
        Self {
            custom_path,
            preferred,
        }
    }

    /// Find Chrome: the custom path when it exists, then the preferred
    /// channel, then every channel in priority order
    pub fn find(&self) -> Result<PathBuf> {
        self.find_with(|channel| channel.install_paths())
    }

    /// Same as [`find`](Self::find) with the per-channel candidate paths
    /// supplied by the caller
    pub fn find_with<F>(&self, candidates: F) -> Result<PathBuf>
    where
        F: Fn(Channel) -> Vec<PathBuf>,
    {
        let mut checked = Vec::new();

        if let Some(ref path) = self.custom_path {
            if Self::is_present(path) {
                tracing::debug!("Using custom Chrome at {}", path.display());
                return Ok(path.clone());
            }
            tracing::warn!(
                "Custom Chrome path {} does not exist, probing install locations",
                path.display()
            );
            checked.push(path.clone());
        }

        let order = std::iter::once(self.preferred)
            .chain(Channel::PRIORITY.into_iter().filter(|c| *c != self.preferred));

        for channel in order {
            for path in candidates(channel) {
                if Self::is_present(&path) {
                    tracing::debug!("Found Chrome {} at {}", channel, path.display());
                    return Ok(path);
                }
                if !checked.contains(&path) {
                    checked.push(path);
                }
            }
        }

        Err(Error::ExecutableNotFound { checked })
    }

    fn is_present(path: &Path) -> bool {
        !path.as_os_str().is_empty() && path.exists()
    }
}
