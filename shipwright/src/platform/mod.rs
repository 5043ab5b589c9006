//! Build targets: an (os, arch, arm revision) triple
//!
//! A target has two string forms. The compact [`BuildTarget::key`][] (e.g. `linuxarm6`)
//! is used to key the binary registry and in reports, and the [`Display`][std::fmt::Display]
//! form (e.g. `linux/arm6`) is used for logs.

use std::fmt;

pub mod targets;

pub use targets::*;

/// One thing to compile
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildTarget {
    /// Operating system (e.g. "linux")
    pub os: String,
    /// Architecture (e.g. "amd64")
    pub arch: String,
    /// ARM revision (e.g. "6"), only ever set for [`ARCH_ARM`][]
    pub arm: Option<String>,
}

impl BuildTarget {
    /// Make a new target; an empty `arm` means "no revision"
    pub fn new(os: impl Into<String>, arch: impl Into<String>, arm: impl Into<String>) -> Self {
        let arm = arm.into();
        Self {
            os: os.into(),
            arch: arch.into(),
            arm: if arm.is_empty() { None } else { Some(arm) },
        }
    }

    /// The target of the machine we're running on
    pub fn host() -> Self {
        let os = match std::env::consts::OS {
            "macos" => OS_DARWIN,
            other => other,
        };
        let arch = match std::env::consts::ARCH {
            "x86_64" => ARCH_AMD64,
            "x86" => ARCH_386,
            "aarch64" => ARCH_ARM64,
            "powerpc64" => "ppc64",
            other => other,
        };
        Self::new(os, arch, "")
    }

    /// The ARM revision, or "" if there isn't one
    pub fn arm_str(&self) -> &str {
        self.arm.as_deref().unwrap_or_default()
    }

    /// Compact form, used as a registry key (e.g. `linuxamd64`, `linuxarm6`)
    pub fn key(&self) -> String {
        format!("{}{}{}", self.os, self.arch, self.arm_str())
    }

    /// Extension executables get on this target
    pub fn ext(&self) -> &'static str {
        ext_for(&self.os)
    }

    /// Whether this target's (os, arch) is buildable at all
    pub fn is_valid(&self) -> bool {
        is_valid_combination(&self.os, &self.arch)
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{}", self.os, self.arch, self.arm_str())
    }
}

/// Extension executables get on the given os
pub fn ext_for(os: &str) -> &'static str {
    if os == OS_WINDOWS {
        ".exe"
    } else {
        ""
    }
}
