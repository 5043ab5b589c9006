#![deny(missing_docs)]
#![allow(clippy::result_large_err)]

//! # shipwright
//!
//! Cross-compiles a project for a matrix of targets, archives and checksums the
//! results, publishes a GitHub release and pushes a Homebrew formula.
//!
//! A release is a fixed list of stages ([`pipeline::default_pipes`][]) run in order
//! against one [`context::Context`][]. The most interesting leaves are the build
//! matrix resolver ([`matrix`][]) and the archive format resolver ([`archiveformat`][]).

use axoasset::LocalAsset;
use camino::{Utf8Path, Utf8PathBuf};
use shipwright_schema::{Project, ReleaseReport};
use tracing::info;

pub mod archiveformat;
pub mod client;
pub mod config;
pub mod context;
pub mod errors;
pub mod git;
pub mod matrix;
pub mod pipeline;
pub mod pipes;
pub mod platform;
pub mod repo;
pub mod templates;
#[cfg(test)]
mod tests;

use context::{Context, RunFlags};
pub use errors::{ShipError, ShipResult};

/// Everything `shipwright release` can be told
#[derive(Debug, Clone, Default)]
pub struct ReleaseArgs {
    /// Directory to release from
    pub root: Utf8PathBuf,
    /// Explicitly requested config file
    pub config: Option<Utf8PathBuf>,
    /// File to read the release notes from
    pub release_notes: Option<Utf8PathBuf>,
    /// Don't check the git state or require a token
    pub skip_validate: bool,
    /// Don't publish anything
    pub skip_publish: bool,
    /// Build a snapshot: no tag needed, nothing published
    pub snapshot: bool,
    /// Override the number of concurrent builds/uploads
    pub parallelism: Option<usize>,
}

/// Run a whole release
pub fn do_release(args: &ReleaseArgs) -> ShipResult<ReleaseReport> {
    let mut ctx = release_context(args)?;
    pipeline::run(&mut ctx, &pipeline::default_pipes())?;
    Ok(ctx.report())
}

/// Load the config and set up the context for a release, without running anything
pub fn release_context(args: &ReleaseArgs) -> ShipResult<Context> {
    let config = config::load_or_default(&args.root, args.config.as_deref())?;
    let flags = RunFlags::new(!args.skip_validate, !args.skip_publish, args.snapshot);
    let mut ctx = Context::new(config, flags, &args.root);
    if let Some(parallelism) = args.parallelism {
        ctx.parallelism = parallelism.max(1);
    }
    if let Some(notes) = &args.release_notes {
        ctx.release_notes = LocalAsset::load_string(notes)?;
        info!("loaded custom release notes from {notes}");
    }
    Ok(ctx)
}

/// Write a fully defaulted config to `path` (relative to `root`)
pub fn do_init(root: &Utf8Path, path: Option<&Utf8Path>) -> ShipResult<Utf8PathBuf> {
    let path = config::config_path(root, path);
    if path.exists() {
        return Err(ShipError::ConfigExists { path });
    }
    let mut ctx = Context::new(Project::default(), RunFlags::default(), root);
    pipes::defaults::apply_defaults(&mut ctx);
    config::write_new(&ctx.config, &path)?;
    info!("wrote example config to {path}");
    Ok(path)
}

/// The JSON Schema of `shipwright.toml`, pretty printed
pub fn do_config_schema() -> ShipResult<String> {
    Ok(serde_json::to_string_pretty(&Project::json_schema())?)
}
