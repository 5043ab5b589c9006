//! The git stage and whole releases against real (scratch) repositories

use axoasset::LocalAsset;
use camino::Utf8Path;

use super::mock::*;
use crate::context::{Context, RunFlags};
use crate::errors::ShipError;
use crate::git;
use crate::pipeline::Pipe;
use crate::pipes::git::GitPipe;
use crate::{do_release, ReleaseArgs};

const AUTHOR: &[&str] = &[
    "-c",
    "user.name=axolotl",
    "-c",
    "user.email=axolotl@example.com",
    "-c",
    "commit.gpgsign=false",
    "-c",
    "tag.gpgsign=false",
];

fn git_as_author(root: &Utf8Path, args: &[&str]) {
    let args = AUTHOR.iter().chain(args).copied().collect::<Vec<_>>();
    git::run(root, &args).unwrap();
}

fn commit(root: &Utf8Path, file: &str, message: &str) {
    LocalAsset::write_new(message, root.join(file)).unwrap();
    git_as_author(root, &["add", "."]);
    git_as_author(root, &["commit", "-q", "-m", message]);
}

fn tag(root: &Utf8Path, tag: &str) {
    git_as_author(root, &["tag", tag]);
}

/// A scratch repository with one commit and no tags
fn init_repo() -> (temp_dir::TempDir, camino::Utf8PathBuf) {
    let (dir, root) = temp_root();
    git::run(&root, &["init", "-q"]).unwrap();
    commit(&root, "README.md", "initial commit");
    (dir, root)
}

fn git_context(root: &Utf8Path, flags: RunFlags) -> Context {
    Context::new(mock_project(), flags, root)
}

#[test]
fn snapshot_needs_no_tag() {
    let (_dir, root) = init_repo();
    let mut ctx = git_context(&root, RunFlags::new(true, true, true));
    GitPipe.run(&mut ctx).unwrap();

    let short = git::short_commit(&root).unwrap();
    assert_eq!(ctx.version, format!("SNAPSHOT-{short}"));
    assert_eq!(ctx.git.current_tag, "");
    assert_eq!(ctx.git.commit, git::head_commit(&root).unwrap());
    assert!(ctx.release_notes.starts_with("## Changelog\n\n"));
    assert!(ctx.release_notes.contains("initial commit"));
    assert!(!ctx.publish());
}

#[test]
fn release_needs_a_tag() {
    let (_dir, root) = init_repo();
    let mut ctx = git_context(&root, RunFlags::default());
    assert!(matches!(GitPipe.run(&mut ctx), Err(ShipError::NoTags)));
}

#[test]
fn tagged_release() {
    let (_dir, root) = init_repo();
    tag(&root, "v1.0.0");
    let mut ctx = git_context(&root, RunFlags::default());
    GitPipe.run(&mut ctx).unwrap();

    assert_eq!(ctx.version, "1.0.0");
    assert_eq!(ctx.git.current_tag, "v1.0.0");
    assert_eq!(ctx.git.commit, git::head_commit(&root).unwrap());
    assert!(ctx.release_notes.contains("initial commit"));
}

#[test]
fn dirty_tree_is_rejected() {
    let (_dir, root) = init_repo();
    tag(&root, "v1.0.0");
    LocalAsset::write_new("new", root.join("new.txt")).unwrap();

    let mut ctx = git_context(&root, RunFlags::default());
    match GitPipe.run(&mut ctx) {
        Err(ShipError::DirtyRepo { status }) => assert_eq!(status, "?? new.txt"),
        other => panic!("expected a dirty repo, got {other:?}"),
    }

    let mut ctx = git_context(&root, RunFlags::new(false, true, false));
    GitPipe.run(&mut ctx).unwrap();
    assert_eq!(ctx.version, "1.0.0");
}

#[test]
fn head_must_be_the_tag() {
    let (_dir, root) = init_repo();
    tag(&root, "v1.0.0");
    commit(&root, "CHANGELOG.md", "second commit");

    let mut ctx = git_context(&root, RunFlags::default());
    match GitPipe.run(&mut ctx) {
        Err(ShipError::WrongRef { commit, tag }) => {
            assert_eq!(tag, "v1.0.0");
            assert_eq!(commit, git::head_commit(&root).unwrap());
        }
        other => panic!("expected the wrong ref, got {other:?}"),
    }

    tag(&root, "v1.1.0");
    let mut ctx = git_context(&root, RunFlags::default());
    GitPipe.run(&mut ctx).unwrap();
    assert_eq!(ctx.version, "1.1.0");
    assert!(ctx.release_notes.contains("second commit"));
    assert!(!ctx.release_notes.contains("initial commit"));
}

#[test]
fn supplied_release_notes_are_kept() {
    let (_dir, root) = init_repo();
    tag(&root, "v1.0.0");
    let mut ctx = git_context(&root, RunFlags::default());
    ctx.release_notes = "hand written notes".to_owned();
    GitPipe.run(&mut ctx).unwrap();
    assert_eq!(ctx.release_notes, "hand written notes");
}

#[test]
fn not_a_repo() {
    let (_dir, root) = temp_root();
    let mut ctx = git_context(&root, RunFlags::new(true, true, true));
    assert!(matches!(GitPipe.run(&mut ctx), Err(ShipError::NotAGitRepo)));
}

#[cfg(unix)]
#[test]
fn snapshot_release_end_to_end() {
    let (_dir, root) = init_repo();
    LocalAsset::write_new(
        r#"project-name = "axolotlsay"

[build]
command = ["sh", "-c", "printf hi > \"$SHIPWRIGHT_OUTPUT\""]
os = ["linux", "darwin"]
arch = ["amd64"]

[release.github]
owner = "axodotdev"
name = "axolotlsay"
"#,
        root.join("shipwright.toml"),
    )
    .unwrap();
    commit(&root, "CHANGELOG.md", "add config");

    let report = do_release(&ReleaseArgs {
        root: root.clone(),
        snapshot: true,
        ..ReleaseArgs::default()
    })
    .unwrap();

    let short = git::short_commit(&root).unwrap();
    assert_eq!(report.version, format!("SNAPSHOT-{short}"));
    assert!(report.snapshot);
    assert!(!report.published);
    assert_eq!(report.targets, vec!["linuxamd64", "darwinamd64"]);
    assert_eq!(
        report.artifacts,
        vec![
            "dist/axolotlsay_linux_amd64.tar.gz".to_owned(),
            "dist/axolotlsay_darwin_amd64.tar.gz".to_owned(),
            format!("dist/axolotlsay_{}_checksums.txt", report.version),
        ]
    );

    let checksums =
        LocalAsset::load_string(root.join(&report.artifacts[2])).unwrap();
    assert_eq!(checksums.lines().count(), 2);
    assert!(root
        .join("dist/axolotlsay_linux_amd64/README.md")
        .exists());
}
