//! Chrome-side plumbing: release channels, executable lookup, profile
//! discovery and process launching.

mod channel;
mod chrome_finder;
mod error;
mod launcher;
mod local_state;

pub use channel::Channel;
pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::{
    ChromeLauncher, LaunchCommand, LaunchRequest, Launched, ProcessSpawner, SystemSpawner,
    build_commands,
};
pub use local_state::{LocalState, ProfileInfo, ProfileRecord};
