//! Capturing (and checking) the state of the git repository

use axotag::{parse_tag, Package, ReleaseType};
use camino::Utf8Path;
use tracing::{info, warn};

use crate::context::{Context, GitInfo};
use crate::errors::{ShipError, ShipResult};
use crate::git;
use crate::pipeline::Pipe;

/// Gets and validates git state
#[derive(Debug, Clone, Copy, Default)]
pub struct GitPipe;

impl Pipe for GitPipe {
    fn name(&self) -> &'static str {
        "git"
    }

    fn description(&self) -> &'static str {
        "Getting and validating git state"
    }

    fn run(&self, ctx: &mut Context) -> ShipResult<()> {
        let root = ctx.root.clone();
        git::require_repo(&root)?;

        let commit = git::head_commit(&root)?;
        let tag = git::latest_tag(&root);

        if ctx.release_notes.is_empty() {
            let log = git::log_between(
                &root,
                tag.as_deref().and_then(|tag| git::previous_tag(&root, tag)).as_deref(),
                tag.as_deref().unwrap_or("HEAD"),
            )?;
            ctx.release_notes = changelog(&log);
        } else {
            info!("release notes already provided, not generating a changelog");
        }

        if ctx.snapshot() {
            ctx.version = snapshot_version(&git::short_commit(&root)?);
            ctx.git = GitInfo {
                current_tag: tag.unwrap_or_default(),
                commit,
            };
            warn!("skipped validations because of snapshot mode");
            return Ok(());
        }

        let tag = tag.ok_or(ShipError::NoTags)?;
        ctx.version = version_from_tag(&ctx.config.project_name, &tag)?;
        ctx.git = GitInfo {
            current_tag: tag,
            commit,
        };
        info!("releasing {} ({})", ctx.git.current_tag, ctx.git.commit);

        if !ctx.validate() {
            warn!("skipped validations because --skip-validate is set");
            return Ok(());
        }
        validate(&root, &ctx.git)
    }
}

/// The working tree must be clean and HEAD must be the tag
fn validate(root: &Utf8Path, git_info: &GitInfo) -> ShipResult<()> {
    let status = git::status(root)?;
    if !status.is_empty() {
        return Err(ShipError::DirtyRepo { status });
    }
    if !git::is_tagged_with(root, &git_info.current_tag) {
        return Err(ShipError::WrongRef {
            commit: git_info.commit.clone(),
            tag: git_info.current_tag.clone(),
        });
    }
    Ok(())
}

/// The version a tag announces
///
/// Accepts `v1.2.3`, `1.2.3` and `<project>-v1.2.3`.
pub fn version_from_tag(project_name: &str, tag: &str) -> ShipResult<String> {
    let packages = [Package {
        name: project_name.to_owned(),
        version: None,
    }];
    let announcing = parse_tag(&packages, tag)?;
    let version = match announcing.release {
        ReleaseType::Version(version) | ReleaseType::Package { version, .. } => version,
        ReleaseType::None => return Err(ShipError::NoTags),
    };
    Ok(version.to_string())
}

/// The version used for snapshot builds
pub fn snapshot_version(short_commit: &str) -> String {
    format!("SNAPSHOT-{short_commit}")
}

/// Release notes made from a `git log --pretty=oneline` listing
pub fn changelog(log: &str) -> String {
    format!("## Changelog\n\n{}", log.trim())
}
