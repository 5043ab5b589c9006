use axoasset::{LocalAsset, SourceFile};
use camino::Utf8Path;

use super::mock::*;
use crate::config::{load, load_or_default, parse, DEFAULT_CONFIG_PATH};
use crate::errors::ShipError;
use crate::{do_init, release_context, ReleaseArgs};

#[test]
fn parse_full_config() {
    let src = SourceFile::new(
        "shipwright.toml",
        r##"
project-name = "axolotlsay"
dist = "out"

[build]
binary = "axolotlsay"
command = ["cargo", "build", "--release"]
os = ["linux", "darwin", "windows"]
arch = ["amd64", "arm"]
arm = ["6", "7"]
parallelism = 2

[[build.ignore]]
os = "darwin"
arch = "arm"

[[build.ignore]]
os = "linux"
arch = "arm"
arm = "7"

[build.hooks]
pre = "make generate"

[archive]
format = "tar.gz"
name-template = "{{ binary }}-{{ version }}-{{ os }}-{{ arch }}"

[archive.replacements]
darwin = "macOS"

[[archive.format-overrides]]
os = "windows"
format = "zip"

[release]
draft = true

[release.github]
owner = "axodotdev"
name = "axolotlsay"

[brew.github]
owner = "axodotdev"
name = "homebrew-tap"
"##
        .to_owned(),
    );
    let project = parse(&src).unwrap();
    assert_eq!(project.project_name, "axolotlsay");
    assert_eq!(project.dist, "out");
    assert_eq!(project.build.command, vec!["cargo", "build", "--release"]);
    assert_eq!(project.build.arm, vec!["6", "7"]);
    assert_eq!(project.build.parallelism, Some(2));
    assert_eq!(project.build.ignore.len(), 2);
    assert_eq!(project.build.ignore[0].arm, "");
    assert_eq!(project.build.ignore[1].arm, "7");
    assert_eq!(project.build.hooks.pre, "make generate");
    assert_eq!(project.archive.replacements["darwin"], "macOS");
    assert_eq!(project.archive.format_overrides[0].format, "zip");
    assert!(project.release.draft);
    assert_eq!(project.release.github.to_string(), "axodotdev/axolotlsay");
    assert_eq!(project.brew.github.name, "homebrew-tap");
}

#[test]
fn malformed_config_is_an_error() {
    let src = SourceFile::new(
        "shipwright.toml",
        r##"
[build]
os = "linux"
"##
        .to_owned(),
    );
    assert!(matches!(parse(&src), Err(ShipError::Asset(_))));
}

#[test]
fn explicit_missing_config_is_fatal() {
    let (_dir, root) = temp_root();
    let err = load_or_default(&root, Some(Utf8Path::new("nope.toml"))).unwrap_err();
    match err {
        ShipError::ConfigNotFound { path } => assert_eq!(path, root.join("nope.toml")),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn implicit_missing_config_is_defaulted() {
    let (_dir, root) = temp_root();
    let project = load_or_default(&root, None).unwrap();
    assert_eq!(project, Default::default());
}

#[test]
fn implicit_config_is_loaded() {
    let (_dir, root) = temp_root();
    LocalAsset::write_new("project-name = \"axolotlsay\"\n", root.join(DEFAULT_CONFIG_PATH))
        .unwrap();
    let project = load_or_default(&root, None).unwrap();
    assert_eq!(project.project_name, "axolotlsay");
}

#[test]
fn explicit_malformed_config_fails_before_anything_runs() {
    let (_dir, root) = temp_root();
    LocalAsset::write_new("[build\n", root.join("broken.toml")).unwrap();
    let args = ReleaseArgs {
        root: root.clone(),
        config: Some("broken.toml".into()),
        ..ReleaseArgs::default()
    };
    assert!(release_context(&args).is_err());
}

#[test]
fn release_context_applies_args() {
    let (_dir, root) = temp_root();
    LocalAsset::write_new("# Notes\n\nhello\n", root.join("NOTES.md")).unwrap();
    let args = ReleaseArgs {
        root: root.clone(),
        release_notes: Some(root.join("NOTES.md")),
        skip_validate: true,
        snapshot: true,
        parallelism: Some(0),
        ..ReleaseArgs::default()
    };
    let ctx = release_context(&args).unwrap();
    assert_eq!(ctx.release_notes, "# Notes\n\nhello\n");
    assert!(!ctx.validate());
    assert!(!ctx.publish());
    assert!(ctx.snapshot());
    assert_eq!(ctx.parallelism, 1);
}

#[test]
fn init_writes_defaults() {
    let (_dir, root) = temp_root();
    let path = do_init(&root, None).unwrap();
    assert_eq!(path, root.join(DEFAULT_CONFIG_PATH));

    let project = load(&path).unwrap();
    assert_eq!(project.dist, "dist");
    assert_eq!(project.build.os, vec!["linux", "darwin"]);
    assert_eq!(project.build.arch, vec!["amd64", "386"]);
    assert_eq!(project.build.arm, vec!["6"]);
    assert_eq!(project.archive.format, "tar.gz");
    assert_eq!(project.checksum.algorithm, "sha256");
    assert_eq!(project.fpm.bindir, "/usr/local/bin");
}

#[test]
fn init_refuses_to_overwrite() {
    let (_dir, root) = temp_root();
    LocalAsset::write_new("", root.join("custom.toml")).unwrap();
    let err = do_init(&root, Some(Utf8Path::new("custom.toml"))).unwrap_err();
    assert!(matches!(err, ShipError::ConfigExists { .. }));
    // untouched
    assert_eq!(LocalAsset::load_string(root.join("custom.toml")).unwrap(), "");
}
