use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Chrome release track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Stable,
    Beta,
    Dev,
    Canary,
}

impl Channel {
    /// Fallback order used when the preferred channel is not installed
    pub const PRIORITY: [Channel; 4] = [
        Channel::Stable,
        Channel::Beta,
        Channel::Dev,
        Channel::Canary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Stable => "Stable",
            Channel::Beta => "Beta",
            Channel::Dev => "Dev",
            Channel::Canary => "Canary",
        }
    }

    /// Well-known install locations of this channel on the current platform
    pub fn install_paths(&self) -> Vec<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            let program_files = std::env::var("ProgramFiles")
                .unwrap_or_else(|_| r"C:\Program Files".to_string());
            let program_files_x86 = std::env::var("ProgramFiles(x86)")
                .unwrap_or_else(|_| r"C:\Program Files (x86)".to_string());
            let local_appdata = std::env::var("LOCALAPPDATA").unwrap_or_default();

            let in_program_files = |folder: &str| {
                vec![
                    PathBuf::from(&program_files)
                        .join("Google")
                        .join(folder)
                        .join("Application")
                        .join("chrome.exe"),
                    PathBuf::from(&program_files_x86)
                        .join("Google")
                        .join(folder)
                        .join("Application")
                        .join("chrome.exe"),
                ]
            };

            return match self {
                Channel::Stable => in_program_files("Chrome"),
                Channel::Beta => in_program_files("Chrome Beta"),
                Channel::Dev => in_program_files("Chrome Dev"),
                Channel::Canary => vec![
                    PathBuf::from(local_appdata)
                        .join("Google")
                        .join("Chrome SxS")
                        .join("Application")
                        .join("chrome.exe"),
                ],
            };
        }

        #[cfg(target_os = "macos")]
        return match self {
            Channel::Stable => vec![PathBuf::from(
                "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            )],
            Channel::Beta => vec![PathBuf::from(
                "/Applications/Google Chrome Beta.app/Contents/MacOS/Google Chrome Beta",
            )],
            Channel::Dev => vec![PathBuf::from(
                "/Applications/Google Chrome Dev.app/Contents/MacOS/Google Chrome Dev",
            )],
            Channel::Canary => vec![PathBuf::from(
                "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
            )],
        };

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        return match self {
            Channel::Stable => vec![
                PathBuf::from("/usr/bin/google-chrome"),
                PathBuf::from("/usr/bin/google-chrome-stable"),
            ],
            Channel::Beta => vec![PathBuf::from("/usr/bin/google-chrome-beta")],
            Channel::Dev => vec![PathBuf::from("/usr/bin/google-chrome-unstable")],
            Channel::Canary => vec![],
        };
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stable" => Ok(Channel::Stable),
            "beta" => Ok(Channel::Beta),
            "dev" => Ok(Channel::Dev),
            "canary" => Ok(Channel::Canary),
            other => Err(format!(
                "Unknown channel '{}'. Expected Stable, Beta, Dev or Canary",
                other
            )),
        }
    }
}
