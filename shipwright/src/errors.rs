//! Errors!
//!
//! Every way a release run can fail gets a variant here, so the CLI
//! can give the user an actionable message.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// An alias for the common Result type for this crate
pub type ShipResult<T> = std::result::Result<T, ShipError>;

/// Errors shipwright can have
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum ShipError {
    /// random i/o error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// random axoasset error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Asset(#[from] axoasset::AxoassetError),

    /// random axoprocess error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Cmd(#[from] axoprocess::AxoprocessError),

    /// random axotag error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Tag(#[from] axotag::errors::TagError),

    /// random minijinja error
    #[error(transparent)]
    Jinja(#[from] minijinja::Error),

    /// random reqwest error
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// random serde_json error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// random toml serialization error
    #[error(transparent)]
    TomlSerialize(#[from] axoasset::toml::ser::Error),

    /// random glob pattern error
    #[error(transparent)]
    GlobPattern(#[from] glob::PatternError),

    /// random glob iteration error
    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    /// couldn't spin up worker threads
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The user explicitly asked for a config file that doesn't exist
    #[error("couldn't find config file {path}")]
    #[diagnostic(help("run 'shipwright init --config={path}' to create one"))]
    ConfigNotFound {
        /// path we looked at
        path: Utf8PathBuf,
    },

    /// `shipwright init` would clobber an existing config
    #[error("{path} already exists")]
    #[diagnostic(help("delete it or pick another path with --config"))]
    ConfigExists {
        /// path that already exists
        path: Utf8PathBuf,
    },

    /// The release needs a git repository
    #[error("current directory is not a git repository")]
    NotAGitRepo,

    /// Not a snapshot, and no tags exist to release
    #[error("couldn't find any git tags to release")]
    #[diagnostic(help("create a tag (e.g. git tag v0.1.0), or pass --snapshot to build without one"))]
    NoTags,

    /// Validation found uncommitted changes
    #[error("git is currently in a dirty state:\n{status}")]
    #[diagnostic(help("commit or stash your changes, or pass --skip-validate"))]
    DirtyRepo {
        /// output of `git status --porcelain`
        status: String,
    },

    /// Validation found HEAD isn't the tag we're releasing
    #[error("git tag {tag} was not made against commit {commit}")]
    #[diagnostic(help("check out the tag you want to release, or pass --skip-validate"))]
    WrongRef {
        /// the commit HEAD points at
        commit: String,
        /// the tag we would release
        tag: String,
    },

    /// Publishing needs a token
    #[error("missing GITHUB_TOKEN")]
    #[diagnostic(help("set GITHUB_TOKEN, or pass --skip-publish / --skip-validate"))]
    MissingToken,

    /// Publishing needs to know where to publish
    #[error("no release repository is configured")]
    #[diagnostic(help("set [release.github] owner and name in your config, or add an 'origin' git remote on GitHub"))]
    MissingReleaseRepo,

    /// The resolved build matrix came out empty
    #[error("no valid build targets left after filtering the build matrix")]
    #[diagnostic(help("check the os/arch/arm lists and the ignore entries in [build]"))]
    NoBuildTargets,

    /// The build config has no command to run
    #[error("no build command is configured")]
    #[diagnostic(help("set [build] command to the program and arguments that build one target"))]
    NoBuildCommand,

    /// A build ran but its binary didn't show up
    #[error("failed to find binary {path} for {target} -- did the build above have errors?")]
    MissingBinary {
        /// pretty form of the target
        target: String,
        /// where we expected the binary
        path: Utf8PathBuf,
    },

    /// An archive format we don't know how to produce
    #[error("unsupported archive format {format}")]
    #[diagnostic(help("supported formats are tar.gz, tar.xz, tar.zst, zip and binary"))]
    UnsupportedArchiveFormat {
        /// the format
        format: String,
    },

    /// A checksum algorithm we don't know how to compute
    #[error("unsupported checksum algorithm {algorithm}")]
    #[diagnostic(help("supported algorithms are sha256 and sha512"))]
    UnsupportedChecksum {
        /// the algorithm
        algorithm: String,
    },

    /// fpm was requested but can't be run
    #[error("fpm is not installed")]
    #[diagnostic(help("see https://fpm.readthedocs.io/en/latest/installation.html"))]
    NoFpm,

    /// brew was requested but there's nothing to put in the formula
    #[error("brew tap requires a darwin amd64 build")]
    #[diagnostic(help("add darwin to [build] os and amd64 to [build] arch"))]
    NoDarwinAmd64Build,

    /// An environment entry wasn't KEY=VALUE
    #[error("invalid build env entry {entry}, expected KEY=VALUE")]
    InvalidEnv {
        /// the entry
        entry: String,
    },

    /// We couldn't make sense of a git remote url
    #[error("couldn't parse GitHub repository from {url}")]
    RepoParse {
        /// the remote url
        url: String,
    },

    /// The remote isn't on GitHub
    #[error("{url} is not a GitHub repository")]
    NotGitHub {
        /// the remote url
        url: String,
    },

    /// random url parse error
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// The GitHub API said no
    #[error("GitHub API request to {url} failed with {status}")]
    #[diagnostic(help("{body}"))]
    GithubApi {
        /// http status
        status: u16,
        /// requested url
        url: String,
        /// response body
        body: String,
    },
}
