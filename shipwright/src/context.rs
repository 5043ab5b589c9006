//! The state shared by every stage of a release run
//!
//! One [`Context`][] is built per run and handed to each stage in turn. Stages run one
//! at a time, so most of it is plain fields. The pieces that a stage may fill in from
//! several threads at once (the binary registry and the artifact list) lock internally,
//! so they can be written through a shared reference.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use shipwright_schema::{Project, ReleaseReport};
use tracing::info;

use crate::errors::ShipResult;
use crate::platform::BuildTarget;
use crate::templates::Templates;

/// A map where the keys are sorted, so iteration order is stable
pub type SortedMap<K, V> = BTreeMap<K, V>;

/// How the run was asked to behave
///
/// These are fixed before the first stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFlags {
    validate: bool,
    publish: bool,
    snapshot: bool,
}

impl RunFlags {
    /// Snapshot mode always turns publishing off
    pub fn new(validate: bool, publish: bool, snapshot: bool) -> Self {
        if snapshot && publish {
            info!("publishing disabled in snapshot mode");
        }
        Self {
            validate,
            publish: publish && !snapshot,
            snapshot,
        }
    }
}

impl Default for RunFlags {
    fn default() -> Self {
        Self::new(true, true, false)
    }
}

/// Info about the git repository we're releasing from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitInfo {
    /// The tag being released (empty in snapshot mode when there are no tags)
    pub current_tag: String,
    /// The full sha of HEAD
    pub commit: String,
}

/// A binary produced by the build stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    /// File name of the binary (including any extension)
    pub name: String,
    /// Absolute path to the binary
    pub path: Utf8PathBuf,
}

/// Every binary built, grouped by target key and then by output folder
#[derive(Debug, Default)]
pub struct BinaryRegistry {
    binaries: Mutex<SortedMap<String, SortedMap<String, Binary>>>,
}

impl BinaryRegistry {
    /// Record a binary, replacing whatever was there for the same (target, folder)
    pub fn register(&self, target: &BuildTarget, folder: impl Into<String>, binary: Binary) {
        lock(&self.binaries)
            .entry(target.key())
            .or_default()
            .insert(folder.into(), binary);
    }

    /// All the binaries built for the target, keyed by folder
    pub fn get(&self, target: &BuildTarget) -> Option<SortedMap<String, Binary>> {
        self.get_by_key(&target.key())
    }

    /// Same as [`BinaryRegistry::get`][] but with an already computed target key
    pub fn get_by_key(&self, key: &str) -> Option<SortedMap<String, Binary>> {
        lock(&self.binaries).get(key).cloned()
    }

    /// Keys of every target something was registered for
    pub fn target_keys(&self) -> Vec<String> {
        lock(&self.binaries).keys().cloned().collect()
    }
}

/// Variables available to the templates in the config
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateVars {
    /// `project-name`
    pub project_name: String,
    /// `build.binary`
    pub binary: String,
    /// The version being released
    pub version: String,
    /// The tag being released
    pub tag: String,
    /// The commit being released
    pub commit: String,
    /// Target os (possibly replaced)
    pub os: String,
    /// Target arch (possibly replaced)
    pub arch: String,
    /// Target arm revision, or empty
    pub arm: String,
    /// Where the build must write the binary (build commands only)
    pub output: String,
}

/// The state of one release run
#[derive(Debug)]
pub struct Context {
    /// The project config, amended by the defaults stage
    pub config: Project,
    /// The directory the release is run from
    pub root: Utf8PathBuf,
    /// The version being released
    pub version: String,
    /// Git state captured by the git stage
    pub git: GitInfo,
    /// Body of the release
    pub release_notes: String,
    /// Token used to talk to GitHub
    pub token: Option<String>,
    /// How many things a stage may do at once
    pub parallelism: usize,
    /// The resolved build matrix, set by the build stage
    pub targets: Vec<BuildTarget>,
    /// Baked-in and user templates
    pub templates: Templates,
    flags: RunFlags,
    binaries: BinaryRegistry,
    artifacts: Mutex<Vec<Utf8PathBuf>>,
}

/// Parallelism used when neither the cli nor the config set one
pub const DEFAULT_PARALLELISM: usize = 4;

impl Context {
    /// Make a fresh context for a run
    pub fn new(config: Project, flags: RunFlags, root: impl Into<Utf8PathBuf>) -> Self {
        let parallelism = config
            .build
            .parallelism
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PARALLELISM);
        Self {
            config,
            root: root.into(),
            version: String::new(),
            git: GitInfo::default(),
            release_notes: String::new(),
            token: None,
            parallelism,
            targets: vec![],
            templates: Templates::new(),
            flags,
            binaries: BinaryRegistry::default(),
            artifacts: Mutex::new(vec![]),
        }
    }

    /// Whether the repo state should be checked
    pub fn validate(&self) -> bool {
        self.flags.validate
    }

    /// Whether anything should be published
    pub fn publish(&self) -> bool {
        self.flags.publish
    }

    /// Whether this is a snapshot build
    pub fn snapshot(&self) -> bool {
        self.flags.snapshot
    }

    /// Absolute path to the output directory
    pub fn dist_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.config.dist)
    }

    /// See [`BinaryRegistry::register`][]
    pub fn register_binary(&self, target: &BuildTarget, folder: impl Into<String>, binary: Binary) {
        self.binaries.register(target, folder, binary);
    }

    /// See [`BinaryRegistry::get`][]
    ///
    /// `None` means nothing was built for the target.
    pub fn binaries_for(&self, target: &BuildTarget) -> Option<SortedMap<String, Binary>> {
        self.binaries.get(target)
    }

    /// The registry itself
    pub fn binaries(&self) -> &BinaryRegistry {
        &self.binaries
    }

    /// Record something that should be checksummed and uploaded
    pub fn add_artifact(&self, path: impl AsRef<Utf8Path>) {
        lock(&self.artifacts).push(path.as_ref().to_owned());
    }

    /// Everything recorded with [`Context::add_artifact`][], in order
    pub fn artifacts(&self) -> Vec<Utf8PathBuf> {
        lock(&self.artifacts).clone()
    }

    /// Template variables that don't depend on a target
    pub fn base_template_vars(&self) -> TemplateVars {
        TemplateVars {
            project_name: self.config.project_name.clone(),
            binary: self.config.build.binary.clone(),
            version: self.version.clone(),
            tag: self.git.current_tag.clone(),
            commit: self.git.commit.clone(),
            ..TemplateVars::default()
        }
    }

    /// Template variables for the target, with os/arch as written
    pub fn template_vars(&self, target: &BuildTarget) -> TemplateVars {
        TemplateVars {
            os: target.os.clone(),
            arch: target.arch.clone(),
            arm: target.arm_str().to_owned(),
            ..self.base_template_vars()
        }
    }

    /// Name of the folder (and archive) for the target
    ///
    /// Renders `archive.name-template` with `archive.replacements` applied to os and arch.
    pub fn archive_name(&self, target: &BuildTarget) -> ShipResult<String> {
        let replacements = &self.config.archive.replacements;
        let replace = |s: &String| replacements.get(s).unwrap_or(s).clone();
        let mut vars = self.template_vars(target);
        vars.os = replace(&vars.os);
        vars.arch = replace(&vars.arch);
        self.templates
            .render_str(&self.config.archive.name_template, &vars)
    }

    /// Summarize the run for `--output-format=json`
    pub fn report(&self) -> ReleaseReport {
        ReleaseReport {
            version: self.version.clone(),
            tag: self.git.current_tag.clone(),
            snapshot: self.snapshot(),
            published: self.publish(),
            targets: self.targets.iter().map(BuildTarget::key).collect(),
            artifacts: self
                .artifacts()
                .iter()
                .map(|path| path.strip_prefix(&self.root).unwrap_or(path).to_string())
                .collect(),
        }
    }
}

/// Lock, ignoring poisoning
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
