//! Thin wrapper around the git cli

use axoprocess::Cmd;
use camino::Utf8Path;

use crate::errors::{ShipError, ShipResult};

/// Run git with the given args in `root`, returning trimmed stdout
pub fn run(root: &Utf8Path, args: &[&str]) -> ShipResult<String> {
    let mut cmd = Cmd::new("git", format!("git {}", args.join(" ")));
    cmd.current_dir(root);
    for arg in args {
        cmd.arg(arg);
    }
    cmd.stderr(std::process::Stdio::null());
    cmd.log(None);
    let output = cmd.output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
}

/// Whether `root` is inside a git work tree
pub fn is_repo(root: &Utf8Path) -> bool {
    run(root, &["rev-parse", "--is-inside-work-tree"]).is_ok_and(|out| out == "true")
}

/// Error out unless `root` is inside a git work tree
pub fn require_repo(root: &Utf8Path) -> ShipResult<()> {
    if is_repo(root) {
        Ok(())
    } else {
        Err(ShipError::NotAGitRepo)
    }
}

/// The most recent tag reachable from HEAD, if any
pub fn latest_tag(root: &Utf8Path) -> Option<String> {
    run(root, &["describe", "--tags", "--abbrev=0"])
        .ok()
        .filter(|tag| !tag.is_empty())
}

/// The tag before `tag`, if any
pub fn previous_tag(root: &Utf8Path, tag: &str) -> Option<String> {
    let rev = format!("{tag}^");
    run(root, &["describe", "--tags", "--abbrev=0", &rev])
        .ok()
        .filter(|tag| !tag.is_empty())
}

/// The full sha of HEAD
pub fn head_commit(root: &Utf8Path) -> ShipResult<String> {
    run(root, &["show", "--format=%H", "HEAD", "--quiet"])
}

/// The short sha of HEAD
pub fn short_commit(root: &Utf8Path) -> ShipResult<String> {
    run(root, &["rev-parse", "--short", "HEAD"])
}

/// `git status --porcelain`, empty when the tree is clean
pub fn status(root: &Utf8Path) -> ShipResult<String> {
    run(root, &["status", "--porcelain"])
}

/// Whether HEAD is exactly at `tag`
pub fn is_tagged_with(root: &Utf8Path, tag: &str) -> bool {
    run(root, &["describe", "--exact-match", "--tags", "--match", tag]).is_ok()
}

/// One line per commit between `from` (exclusive) and `to`
pub fn log_between(root: &Utf8Path, from: Option<&str>, to: &str) -> ShipResult<String> {
    let range = match from {
        Some(from) => format!("{from}..{to}"),
        None => to.to_owned(),
    };
    run(
        root,
        &["log", "--pretty=oneline", "--abbrev-commit", &range],
    )
}
