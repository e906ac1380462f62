//! Dotted numeric version comparison.

use std::cmp::Ordering;
use std::fmt;

/// A parsed `major.minor.patch` version.
///
/// Parsing pads short versions with zeros up to three components. Longer
/// versions keep every component, so `2.3.0.0` is newer than `2.3.0`.
#[derive(Debug, Clone)]
pub struct VersionTuple {
    parts: Vec<u64>,
}

impl VersionTuple {
    /// Parse `"2.4"` / `"2.4.0"`. Any non-numeric component fails.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s
            .split('.')
            .map(|part| part.trim().parse::<u64>().ok())
            .collect::<Option<Vec<u64>>>()?;

        while parts.len() < 3 {
            parts.push(0);
        }

        Some(Self { parts })
    }

    pub fn parts(&self) -> &[u64] {
        &self.parts
    }
}

impl Ord for VersionTuple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

impl PartialEq for VersionTuple {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for VersionTuple {}

impl PartialOrd for VersionTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.parts.iter().map(u64::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// Whether `remote` is strictly newer than `local`.
///
/// Unparseable input on either side is never newer.
pub fn is_newer(remote: &str, local: &str) -> bool {
    match (VersionTuple::parse(remote), VersionTuple::parse(local)) {
        (Some(remote), Some(local)) => remote > local,
        _ => {
            tracing::debug!("Cannot compare versions {:?} and {:?}", remote, local);
            false
        }
    }
}
