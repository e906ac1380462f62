use crate::{Channel, Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One browser launch: a profile and the URLs to open in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub email: String,
    pub profile_directory: String,
    /// Channel the executable was resolved for
    pub channel: Channel,
    pub incognito: bool,
    pub target_urls: Vec<String>,
}

/// A single process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchCommand {
    /// Program followed by its arguments, as a display string
    pub fn to_command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Starts processes. The system implementation detaches the child; tests
/// substitute a recorder.
pub trait ProcessSpawner {
    fn spawn(&self, command: &LaunchCommand) -> Result<()>;
}

/// Spawns real, untracked child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, command: &LaunchCommand) -> Result<()> {
        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            process.creation_flags(CREATE_NO_WINDOW);
        }

        process
            .spawn()
            .map(drop)
            .map_err(|e| Error::Launch(format!("{}: {}", command.program.display(), e)))
    }
}

/// Summary of a completed launch; the caller records usage from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub email: String,
    pub invocations: usize,
}

/// Build one invocation per target URL
pub fn build_commands(executable: &Path, request: &LaunchRequest) -> Vec<LaunchCommand> {
    request
        .target_urls
        .iter()
        .map(|url| {
            let mut args = vec![format!("--profile-directory={}", request.profile_directory)];
            if request.incognito {
                args.push("--incognito".to_string());
            }
            args.push(url.clone());

            LaunchCommand {
                program: executable.to_path_buf(),
                args,
            }
        })
        .collect()
}

/// Launches Chrome profiles through a [`ProcessSpawner`]
pub struct ChromeLauncher<S: ProcessSpawner = SystemSpawner> {
    executable: PathBuf,
    spawner: S,
}

impl ChromeLauncher<SystemSpawner> {
    pub fn new(executable: PathBuf) -> Self {
        Self::with_spawner(executable, SystemSpawner)
    }
}

impl<S: ProcessSpawner> ChromeLauncher<S> {
    pub fn with_spawner(executable: PathBuf, spawner: S) -> Self {
        Self {
            executable,
            spawner,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Spawn one process per URL in `request`, in order.
    ///
    /// Stops at the first spawn failure; processes already started keep
    /// running.
    pub fn launch(&self, request: &LaunchRequest) -> Result<Launched> {
        if request.target_urls.is_empty() {
            return Err(Error::NoTargetUrls);
        }

        let commands = build_commands(&self.executable, request);
        for (command, url) in commands.iter().zip(&request.target_urls) {
            tracing::info!(
                "Open: email={}, profile={}, channel={}, incognito={}, url={}",
                request.email,
                request.profile_directory,
                request.channel,
                request.incognito,
                url
            );
            if let Err(e) = self.spawner.spawn(command) {
                tracing::error!("Error opening {}: {}", request.email, e);
                return Err(e);
            }
        }

        Ok(Launched {
            email: request.email.clone(),
            invocations: commands.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSpawner {
        spawned: RefCell<Vec<LaunchCommand>>,
        fail_after: Option<usize>,
    }

    impl ProcessSpawner for RecordingSpawner {
        fn spawn(&self, command: &LaunchCommand) -> Result<()> {
            let mut spawned = self.spawned.borrow_mut();
            if self.fail_after == Some(spawned.len()) {
                return Err(Error::Launch("spawn refused".to_string()));
            }
            spawned.push(command.clone());
            Ok(())
        }
    }

    fn request(urls: &[&str], incognito: bool) -> LaunchRequest {
        LaunchRequest {
            email: "user1@x.com".to_string(),
            profile_directory: "Profile 1".to_string(),
            channel: Channel::Stable,
            incognito,
            target_urls: urls.iter().map(|u| u.to_string()).collect(),
        }
    }

    #[test]
    fn test_build_commands_args() {
        let commands = build_commands(
            Path::new("/usr/bin/google-chrome"),
            &request(&["https://example.com"], false),
        );

        assert_eq!(
            commands,
            vec![LaunchCommand {
                program: PathBuf::from("/usr/bin/google-chrome"),
                args: vec![
                    "--profile-directory=Profile 1".to_string(),
                    "https://example.com".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn test_one_invocation_per_url() {
        let launcher = ChromeLauncher::with_spawner(
            PathBuf::from("/usr/bin/google-chrome"),
            RecordingSpawner::default(),
        );
        let urls = ["https://a.example.com", "https://b.example.com", "c.example.com"];

        let launched = launcher.launch(&request(&urls, true)).unwrap();
        assert_eq!(launched.invocations, 3);

        let spawned = launcher.spawner().spawned.borrow();
        assert_eq!(spawned.len(), 3);
        for (command, url) in spawned.iter().zip(urls) {
            assert_eq!(
                command.args,
                vec![
                    "--profile-directory=Profile 1".to_string(),
                    "--incognito".to_string(),
                    url.to_string(),
                ]
            );
        }
    }

    #[test]
    fn test_empty_url_list_is_rejected() {
        let launcher = ChromeLauncher::with_spawner(
            PathBuf::from("/usr/bin/google-chrome"),
            RecordingSpawner::default(),
        );
        let result = launcher.launch(&request(&[], false));

        assert!(matches!(result, Err(Error::NoTargetUrls)));
        assert!(launcher.spawner().spawned.borrow().is_empty());
    }

    #[test]
    fn test_spawn_failure_stops_sequence() {
        let spawner = RecordingSpawner {
            fail_after: Some(1),
            ..Default::default()
        };
        let launcher = ChromeLauncher::with_spawner(PathBuf::from("/usr/bin/google-chrome"), spawner);

        let result = launcher.launch(&request(&["https://a.example.com", "https://b.example.com"], false));

        assert!(matches!(result, Err(Error::Launch(_))));
        assert_eq!(launcher.spawner().spawned.borrow().len(), 1);
    }

    #[test]
    fn test_command_line_display() {
        let command = LaunchCommand {
            program: PathBuf::from("/usr/bin/google-chrome"),
            args: vec!["--incognito".to_string(), "https://example.com".to_string()],
        };
        assert_eq!(
            command.to_command_line(),
            "/usr/bin/google-chrome --incognito https://example.com"
        );
    }

    #[test]
    fn test_system_spawner_reports_missing_program() {
        let command = LaunchCommand {
            program: PathBuf::from("/nonexistent/google-chrome"),
            args: vec![],
        };
        let result = SystemSpawner.spawn(&command);
        assert!(matches!(result, Err(Error::Launch(_))));
    }
}
