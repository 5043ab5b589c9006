//! Packing each built binary (plus extra files) into an archive

use axoasset::LocalAsset;
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::archiveformat::{format_for, ArchiveFormat};
use crate::context::{Binary, Context};
use crate::errors::ShipResult;
use crate::pipeline::Pipe;
use crate::platform::BuildTarget;

/// Creates archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchivePipe;

impl Pipe for ArchivePipe {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn description(&self) -> &'static str {
        "Creating archives"
    }

    fn run(&self, ctx: &mut Context) -> ShipResult<()> {
        let ctx = &*ctx;
        let jobs = archive_jobs(ctx);
        let pool = super::pool(ctx)?;
        let outputs = pool.install(|| {
            jobs.par_iter()
                .map(|(target, folder, binary)| archive(ctx, target, folder, binary))
                .collect::<ShipResult<Vec<_>>>()
        })?;
        // in job order, not completion order
        for output in outputs {
            ctx.add_artifact(output);
        }
        Ok(())
    }
}

/// Every (target, folder, binary) there is something to archive for
fn archive_jobs(ctx: &Context) -> Vec<(BuildTarget, String, Binary)> {
    let mut jobs = vec![];
    for target in ctx.targets.iter().unique() {
        let Some(group) = ctx.binaries_for(target) else {
            warn!("no binaries were built for {target}, skipping");
            continue;
        };
        for (folder, binary) in group {
            jobs.push((target.clone(), folder, binary));
        }
    }
    jobs
}

/// Create one archive, returning its path
fn archive(
    ctx: &Context,
    target: &BuildTarget,
    folder: &str,
    binary: &Binary,
) -> ShipResult<Utf8PathBuf> {
    let format = ArchiveFormat::parse(format_for(&ctx.config.archive, target))?;
    let dist = ctx.dist_dir();
    let dir = dist.join(folder);

    let ext = if format == ArchiveFormat::Binary {
        target.ext()
    } else {
        LocalAsset::create_dir_all(&dir)?;
        LocalAsset::copy_file_to_dir(&binary.path, &dir)?;
        for file in extra_files(&ctx.root, &ctx.config.archive.files)? {
            if file.is_dir() {
                LocalAsset::copy_dir_to_parent_dir(&file, &dir)?;
            } else {
                LocalAsset::copy_file_to_dir(&file, &dir)?;
            }
        }
        format.ext()
    };

    let dest = dist.join(format!("{folder}{ext}"));
    info!("creating {}", dest.file_name().unwrap_or(folder));
    let with_root = None::<&Utf8Path>;
    match format {
        ArchiveFormat::TarGz => LocalAsset::tar_gz_dir(&dir, &dest, with_root)?,
        ArchiveFormat::TarXz => LocalAsset::tar_xz_dir(&dir, &dest, with_root)?,
        ArchiveFormat::TarZstd => LocalAsset::tar_zstd_dir(&dir, &dest, with_root)?,
        ArchiveFormat::Zip => LocalAsset::zip_dir(&dir, &dest, with_root)?,
        ArchiveFormat::Binary => LocalAsset::copy_file_to_file(&binary.path, &dest)?,
    }
    Ok(dest)
}

/// Files matching the given glob patterns, relative to `root`
pub fn extra_files(root: &Utf8Path, patterns: &[String]) -> ShipResult<Vec<Utf8PathBuf>> {
    let mut files = vec![];
    for pattern in patterns {
        let pattern = root.join(pattern);
        for entry in glob::glob(pattern.as_str())? {
            match Utf8PathBuf::from_path_buf(entry?) {
                Ok(path) => files.push(path),
                Err(path) => warn!("skipping non-utf8 path {}", path.display()),
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_files_match_globs() {
        let tmp = temp_dir::TempDir::new().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        LocalAsset::write_new("readme", root.join("README.md")).unwrap();
        LocalAsset::write_new("license", root.join("LICENSE-MIT")).unwrap();
        LocalAsset::write_new("license", root.join("LICENSE-APACHE")).unwrap();
        LocalAsset::write_new("fn main() {}", root.join("main.rs")).unwrap();

        let patterns = vec!["README*".to_owned(), "LICENSE*".to_owned(), "CHANGELOG*".to_owned()];
        let files = extra_files(root, &patterns).unwrap();
        let names = files
            .iter()
            .map(|f| f.file_name().unwrap().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["README.md", "LICENSE-APACHE", "LICENSE-MIT"]);
    }

    #[test]
    fn bad_glob_is_an_error() {
        let tmp = temp_dir::TempDir::new().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        assert!(extra_files(root, &["[".to_owned()]).is_err());
    }
}
