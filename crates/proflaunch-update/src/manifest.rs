use serde::{Deserialize, Serialize};

/// Latest-release description published next to the artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateManifest {
    pub version: String,
    pub changelog: Vec<String>,
    pub download_url: String,
    pub required: bool,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    changelog: Vec<String>,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    required: bool,
}

impl UpdateManifest {
    /// Parse a manifest body. Missing fields take defaults; a missing or
    /// empty `download_url` takes `fallback_download_url`.
    pub fn parse(body: &str, fallback_download_url: &str) -> Option<Self> {
        let raw: RawManifest = match serde_json::from_str(body) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Malformed update manifest: {}", e);
                return None;
            }
        };

        Some(Self {
            version: raw.version.unwrap_or_else(|| "0.0.0".to_string()),
            changelog: raw.changelog,
            download_url: raw
                .download_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| fallback_download_url.to_string()),
            required: raw.required,
        })
    }
}
