//! Self-update support: version comparison, manifest check, and in-place
//! replacement of the installed executable.

pub mod applier;
pub mod checker;
pub mod cycle;
pub mod error;
pub mod manifest;
pub mod version;

pub use applier::{ApplyOutcome, UpdateApplier, backup_path};
pub use checker::{UpdateChecker, integrity_warning};
pub use cycle::{UpdateCycle, UpdatePhase};
pub use error::{Error, Result};
pub use manifest::UpdateManifest;
pub use version::{VersionTuple, is_newer};
