#![deny(missing_docs)]

//! # shipwright-schema
//!
//! This crate exists to serialize and deserialize the `shipwright.toml` config
//! document and the machine-readable report a release run prints. Ideally it should
//! be reasonably forward and backward compatible with different versions of these formats.
//!
//! The root types of the schema are [`Project`][] and [`ReleaseReport`][].
//!
//! Most string fields treat "empty" as "unset": the defaults stage of a release run
//! fills them in, and `shipwright init` writes the filled-in result back out.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The complete contents of a `shipwright.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct Project {
    /// The name of the project (defaults to the name of the release repository)
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_name: String,
    /// The output directory for binaries, archives and packages (defaults to "dist")
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dist: String,
    /// How to build the project's binary
    #[serde(default)]
    pub build: Build,
    /// How to archive the built binaries
    #[serde(default)]
    pub archive: Archive,
    /// Where and how to publish the release
    #[serde(default)]
    pub release: Release,
    /// How to compute integrity checksums
    #[serde(default)]
    pub checksum: Checksum,
    /// System packages (deb, rpm, ...) to produce with fpm
    #[serde(default)]
    pub fpm: Fpm,
    /// A Homebrew formula to push to a tap repository
    #[serde(default)]
    pub brew: Brew,
}

/// A GitHub repository, in owner/name form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Repo {
    /// The user or organization owning the repository
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner: String,
    /// The name of the repository
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Repo {
    /// Whether this repository is actually configured
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Settings for building the binary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct Build {
    /// The name of the binary the build produces (defaults to the project name)
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub binary: String,
    /// The command (program followed by arguments) that builds one target
    ///
    /// Every entry is a template. The variables `os`, `arch`, `arm` and `output`
    /// describe the target being built and where the binary must be written.
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Extra environment variables for the build command, as `KEY=VALUE`
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
    /// Operating systems to build for (e.g. "linux", "darwin", "windows")
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub os: Vec<String>,
    /// Architectures to build for (e.g. "amd64", "386", "arm", "arm64")
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arch: Vec<String>,
    /// ARM revisions to build when "arm" is one of the architectures (e.g. "6", "7")
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arm: Vec<String>,
    /// Combinations of the above that should not be built
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<IgnoredTarget>,
    /// Commands to run around the build
    #[serde(default)]
    pub hooks: Hooks,
    /// How many targets may be built at the same time
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,
}

/// A target that should be excluded from the build matrix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IgnoredTarget {
    /// Operating system of the ignored target
    pub os: String,
    /// Architecture of the ignored target
    pub arch: String,
    /// ARM revision of the ignored target (empty matches targets without one)
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub arm: String,
}

/// Shell commands run before and after the build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Hooks {
    /// Run once before any target is built
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pre: String,
    /// Run once after every target has been built
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub post: String,
}

/// Settings for archiving the built binaries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct Archive {
    /// The default archive format: "tar.gz", "tar.xz", "tar.zst", "zip" or "binary"
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    /// Template for the name of each archive (and of the folder it is built from)
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name_template: String,
    /// Glob patterns of extra files to put in every archive
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Replacements for os/arch names when rendering `name-template`
    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub replacements: BTreeMap<String, String>,
    /// Per operating system archive formats, first match wins
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub format_overrides: Vec<FormatOverride>,
}

/// An archive format to use for one operating system
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormatOverride {
    /// The operating system this override applies to
    pub os: String,
    /// The archive format to use for it
    pub format: String,
}

/// Settings for the published release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Release {
    /// The repository to publish the release to (defaults to the `origin` remote)
    #[serde(default)]
    pub github: Repo,
    /// Publish the release as a draft
    #[serde(default)]
    pub draft: bool,
    /// Mark the release as a prerelease
    #[serde(default)]
    pub prerelease: bool,
}

/// Settings for the checksums file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct Checksum {
    /// Template for the name of the checksums file
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name_template: String,
    /// The digest to use: "sha256" (default) or "sha512"
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub algorithm: String,
}

/// Settings for system packages built with fpm
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Fpm {
    /// Package formats to build (e.g. "deb", "rpm")
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<String>,
    /// Packages this package depends on
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Packages this package conflicts with
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
    /// The package vendor
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vendor: String,
    /// The project homepage
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub homepage: String,
    /// The package maintainer
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub maintainer: String,
    /// The package description
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// The package license
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub license: String,
    /// Where the binary is installed (defaults to "/usr/local/bin")
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bindir: String,
}

/// Settings for the Homebrew formula
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct Brew {
    /// The tap repository to push the formula to
    #[serde(default)]
    pub github: Repo,
    /// Folder inside the tap repository to write the formula in
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub folder: String,
    /// A brief description of the project
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// The project homepage
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub homepage: String,
    /// Caveats shown to the user after installing
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub caveats: String,
    /// Formulae this formula depends on
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Formulae this formula conflicts with
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
    /// A launchd plist to ship with the formula
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub plist: String,
    /// Ruby lines for the formula's `install` block
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub install: String,
    /// Ruby lines for the formula's `test` block
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub test: String,
    /// Who the commit to the tap repository is attributed to
    #[serde(default)]
    pub commit_author: CommitAuthor,
}

/// Author of a commit made through the GitHub API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommitAuthor {
    /// Author name
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Author email
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
}

/// A report of what a release run produced
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReleaseReport {
    /// The version that was released
    pub version: String,
    /// The git tag the release was cut from (empty for snapshots)
    #[serde(default)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// Whether this was a snapshot build
    pub snapshot: bool,
    /// Whether publishing was enabled
    pub published: bool,
    /// The targets that were built (compact form, e.g. "linuxarm6")
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    /// Paths of every artifact that was produced
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
}

impl Project {
    /// Get the JSON Schema for a shipwright.toml
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Project)
    }
}

impl ReleaseReport {
    /// Get the JSON Schema for a ReleaseReport
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ReleaseReport)
    }
}
