//! Expanding the configured os/arch/arm lists into the targets to build
//!
//! Targets come out in a stable order: os is the outer loop, arch the inner one,
//! and the arm family is further expanded by revision. Targets that aren't
//! buildable or that the user asked to ignore are logged and dropped, never
//! treated as errors here. Duplicates in the config are kept as-is.

use shipwright_schema::{Build, IgnoredTarget};
use tracing::{info, warn};

use crate::platform::{BuildTarget, ARCH_ARM};

/// Resolve the build matrix for the given build config
pub fn resolve_targets(build: &Build) -> Vec<BuildTarget> {
    candidates(build)
        .into_iter()
        .filter(|target| {
            if !target.is_valid() {
                warn!("skipped invalid build target: {target}");
                return false;
            }
            if is_ignored(&build.ignore, target) {
                info!("skipped ignored build target: {target}");
                return false;
            }
            true
        })
        .collect()
}

/// The full cartesian product, before any filtering
fn candidates(build: &Build) -> Vec<BuildTarget> {
    let mut targets = vec![];
    for os in &build.os {
        for arch in &build.arch {
            if arch == ARCH_ARM {
                for arm in &build.arm {
                    targets.push(BuildTarget::new(os, arch, arm));
                }
            } else {
                targets.push(BuildTarget::new(os, arch, ""));
            }
        }
    }
    targets
}

/// Whether some ignore entry matches the target exactly
///
/// An entry without an arm revision only matches targets without one.
pub fn is_ignored(ignored: &[IgnoredTarget], target: &BuildTarget) -> bool {
    ignored.iter().any(|entry| {
        entry.os == target.os && entry.arch == target.arch && entry.arm == target.arm_str()
    })
}
