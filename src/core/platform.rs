//! Host platform capabilities that change the package layout.

use std::fmt;
use std::str::FromStr;

use semver::Version;

/// The module host the generated package is installed into.
///
/// Hosts from 5.0 onward load side-by-side versioned module directories
/// and understand the project/license URI manifest fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    version: Version,
}

impl HostPlatform {
    /// First host version with versioned module directories.
    pub const VERSIONED_DIRS_SINCE: Version = Version::new(5, 0, 0);

    /// First host version with project/license URI manifest fields.
    pub const PACKAGE_URIS_SINCE: Version = Version::new(5, 0, 0);

    pub fn new(version: Version) -> Self {
        HostPlatform { version }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn uses_versioned_dirs(&self) -> bool {
        self.version >= Self::VERSIONED_DIRS_SINCE
    }

    pub fn supports_package_uris(&self) -> bool {
        self.version >= Self::PACKAGE_URIS_SINCE
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        HostPlatform::new(Version::new(5, 1, 0))
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Accepts `5`, `5.1` and full `5.1.0` forms.
impl FromStr for HostPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let padded = match s.matches('.').count() {
            0 => format!("{}.0.0", s),
            1 => format!("{}.0", s),
            _ => s.to_string(),
        };
        Version::parse(&padded)
            .map(HostPlatform::new)
            .map_err(|e| format!("invalid host platform version '{}': {}", s, e))
    }
}
