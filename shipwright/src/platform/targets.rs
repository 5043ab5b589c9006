//! The closed set of operating system / architecture pairs we know how to build
//!
//! Anything not listed here is rejected from the build matrix, no matter what
//! the config asks for.

/// The key for referring to linux as an "os"
pub const OS_LINUX: &str = "linux";
/// The key for referring to macos as an "os"
pub const OS_DARWIN: &str = "darwin";
/// The key for referring to windows as an "os"
pub const OS_WINDOWS: &str = "windows";

/// The key for referring to 64-bit x86_64 as an "arch"
pub const ARCH_AMD64: &str = "amd64";
/// The key for referring to 32-bit x86 (AKA i686) as an "arch"
pub const ARCH_386: &str = "386";
/// The key for referring to 64-bit arm (AKA aarch64) as an "arch"
pub const ARCH_ARM64: &str = "arm64";
/// The key for referring to the 32-bit arm family as an "arch"
///
/// This is the only arch that gets expanded by ARM revision.
pub const ARCH_ARM: &str = "arm";

macro_rules! define_valid_targets {
    ($($(#[$meta:meta])* $os:literal => [$($arch:literal),* $(,)?];)*) => {
        /// Every (os, arch) pair that can be built
        pub const VALID_TARGETS: &[(&str, &str)] = &[
            $($(($os, $arch),)*)*
        ];
    };
}

define_valid_targets!(
    "android" => ["arm"];
    "darwin" => ["386", "amd64", "arm", "arm64"];
    "dragonfly" => ["amd64"];
    "freebsd" => ["386", "amd64", "arm"];
    "linux" => [
        "386", "amd64", "arm", "arm64",
        "ppc64", "ppc64le",
        "mips", "mipsle", "mips64", "mips64le",
    ];
    "netbsd" => ["386", "amd64", "arm"];
    "openbsd" => ["386", "amd64", "arm"];
    "plan9" => ["386", "amd64"];
    "solaris" => ["amd64"];
    "windows" => ["386", "amd64"];
);

/// Whether (os, arch) is in [`VALID_TARGETS`][]
pub fn is_valid_combination(os: &str, arch: &str) -> bool {
    VALID_TARGETS
        .iter()
        .any(|&(valid_os, valid_arch)| valid_os == os && valid_arch == arch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_pairs_are_valid() {
        assert!(is_valid_combination(OS_LINUX, ARCH_AMD64));
        assert!(is_valid_combination(OS_LINUX, ARCH_ARM));
        assert!(is_valid_combination(OS_DARWIN, ARCH_AMD64));
        assert!(is_valid_combination(OS_WINDOWS, ARCH_386));
    }

    #[test]
    fn unknown_pairs_are_invalid() {
        assert!(!is_valid_combination(OS_WINDOWS, ARCH_ARM));
        assert!(!is_valid_combination(OS_WINDOWS, ARCH_ARM64));
        assert!(!is_valid_combination("solaris", ARCH_386));
        assert!(!is_valid_combination("templeos", ARCH_AMD64));
        // both halves have to match the same entry
        assert!(!is_valid_combination("amd64", "linux"));
    }
}
