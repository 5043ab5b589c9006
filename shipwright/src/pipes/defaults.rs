//! Filling in everything the config left unset

use tracing::warn;

use crate::context::Context;
use crate::errors::ShipResult;
use crate::pipeline::Pipe;
use crate::platform::{ARCH_386, ARCH_AMD64, OS_DARWIN, OS_LINUX};
use crate::repo;

/// Default output directory
pub const DEFAULT_DIST: &str = "dist";
/// Default archive format
pub const DEFAULT_ARCHIVE_FORMAT: &str = "tar.gz";
/// Default archive name template
pub const DEFAULT_NAME_TEMPLATE: &str =
    "{{ binary }}_{{ os }}_{{ arch }}{% if arm %}v{{ arm }}{% endif %}";
/// Default checksums file name template
pub const DEFAULT_CHECKSUM_TEMPLATE: &str = "{{ project_name }}_{{ version }}_checksums.txt";
/// Default checksum algorithm
pub const DEFAULT_CHECKSUM_ALGORITHM: &str = "sha256";
/// Default install location for fpm packages
pub const DEFAULT_FPM_BINDIR: &str = "/usr/local/bin";
/// Extra files archived by default
pub const DEFAULT_ARCHIVE_FILES: &[&str] = &["README*", "LICENSE*", "CHANGELOG*"];
/// Who commits formula updates by default
pub const DEFAULT_COMMIT_AUTHOR_NAME: &str = "shipwright";
/// Email of the default formula committer
pub const DEFAULT_COMMIT_AUTHOR_EMAIL: &str = "shipwright@users.noreply.github.com";

/// Fills in config defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsPipe;

impl Pipe for DefaultsPipe {
    fn name(&self) -> &'static str {
        "defaults"
    }

    fn description(&self) -> &'static str {
        "Setting defaults"
    }

    fn run(&self, ctx: &mut Context) -> ShipResult<()> {
        apply_defaults(ctx);
        Ok(())
    }
}

/// Fill in every unset config field
///
/// The release repository comes from the `origin` remote, failing to find
/// one is only a warning.
pub fn apply_defaults(ctx: &mut Context) {
    let root = ctx.root.clone();
    let config = &mut ctx.config;

    if config.dist.is_empty() {
        config.dist = DEFAULT_DIST.to_owned();
    }

    if config.release.github.is_empty() {
        match repo::remote_repo(&root) {
            Ok(repo) => config.release.github = repo,
            Err(e) => warn!("couldn't detect the release repository: {e}"),
        }
    }
    if config.project_name.is_empty() {
        config.project_name = config.release.github.name.clone();
    }

    let build = &mut config.build;
    if build.binary.is_empty() {
        build.binary = config.project_name.clone();
    }
    if build.os.is_empty() {
        build.os = vec![OS_LINUX.to_owned(), OS_DARWIN.to_owned()];
    }
    if build.arch.is_empty() {
        build.arch = vec![ARCH_AMD64.to_owned(), ARCH_386.to_owned()];
    }
    if build.arm.is_empty() {
        build.arm = vec!["6".to_owned()];
    }

    let archive = &mut config.archive;
    if archive.format.is_empty() {
        archive.format = DEFAULT_ARCHIVE_FORMAT.to_owned();
    }
    if archive.name_template.is_empty() {
        archive.name_template = DEFAULT_NAME_TEMPLATE.to_owned();
    }
    if archive.files.is_empty() {
        archive.files = DEFAULT_ARCHIVE_FILES
            .iter()
            .map(|f| f.to_string())
            .collect();
    }

    let checksum = &mut config.checksum;
    if checksum.name_template.is_empty() {
        checksum.name_template = DEFAULT_CHECKSUM_TEMPLATE.to_owned();
    }
    if checksum.algorithm.is_empty() {
        checksum.algorithm = DEFAULT_CHECKSUM_ALGORITHM.to_owned();
    }

    let brew = &mut config.brew;
    if brew.install.is_empty() {
        brew.install = format!("bin.install \"{}\"", config.build.binary);
    }
    if brew.commit_author.name.is_empty() {
        brew.commit_author.name = DEFAULT_COMMIT_AUTHOR_NAME.to_owned();
    }
    if brew.commit_author.email.is_empty() {
        brew.commit_author.email = DEFAULT_COMMIT_AUTHOR_EMAIL.to_owned();
    }

    if config.fpm.bindir.is_empty() {
        config.fpm.bindir = DEFAULT_FPM_BINDIR.to_owned();
    }
}
