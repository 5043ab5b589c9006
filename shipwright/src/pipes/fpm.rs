//! Building system packages (deb, rpm, ...) with fpm

use axoprocess::Cmd;
use camino::Utf8Path;
use itertools::Itertools;
use tracing::{debug, info};

use crate::context::{Binary, Context};
use crate::errors::{ShipError, ShipResult};
use crate::pipeline::Pipe;
use crate::platform::{BuildTarget, OS_LINUX};

/// The fpm executable
pub const FPM: &str = "fpm";

/// Creates linux packages
#[derive(Debug, Clone, Copy, Default)]
pub struct FpmPipe;

impl Pipe for FpmPipe {
    fn name(&self) -> &'static str {
        "fpm"
    }

    fn description(&self) -> &'static str {
        "Creating Linux packages with fpm"
    }

    fn run(&self, ctx: &mut Context) -> ShipResult<()> {
        if ctx.config.fpm.formats.is_empty() {
            info!("no output formats configured");
            return Ok(());
        }
        require_fpm(FPM)?;

        let ctx = &*ctx;
        for format in &ctx.config.fpm.formats {
            for target in ctx.targets.iter().unique() {
                if target.os != OS_LINUX {
                    debug!("skipped non-linux build {target} for fpm");
                    continue;
                }
                let Some(group) = ctx.binaries_for(target) else {
                    continue;
                };
                for (folder, binary) in &group {
                    create(ctx, format, target, folder, binary)?;
                }
            }
        }
        Ok(())
    }
}

/// Error with [`ShipError::NoFpm`][] unless `program --version` runs
pub fn require_fpm(program: &str) -> ShipResult<()> {
    let found = Cmd::new(program, "check for fpm")
        .arg("--version")
        .log(None)
        .output();
    match found {
        Ok(_) => Ok(()),
        Err(_) => Err(ShipError::NoFpm),
    }
}

fn create(
    ctx: &Context,
    format: &str,
    target: &BuildTarget,
    folder: &str,
    binary: &Binary,
) -> ShipResult<()> {
    let dist = ctx.dist_dir();
    let file = dist.join(format!("{folder}.{format}"));
    info!("creating {}", file.file_name().unwrap_or(folder));

    let mut cmd = Cmd::new(FPM, format!("create {format} package for {target}"));
    for arg in fpm_args(ctx, format, target, &dist, &file, binary) {
        cmd.arg(arg);
    }
    cmd.stdout_to_stderr();
    cmd.run()?;
    ctx.add_artifact(file);
    Ok(())
}

/// Arguments for one fpm invocation
pub fn fpm_args(
    ctx: &Context,
    format: &str,
    target: &BuildTarget,
    dist: &Utf8Path,
    file: &Utf8Path,
    binary: &Binary,
) -> Vec<String> {
    let fpm = &ctx.config.fpm;
    let mut args = vec![
        "--input-type".to_owned(),
        "dir".to_owned(),
        "--output-type".to_owned(),
        format.to_owned(),
        "--name".to_owned(),
        ctx.config.project_name.clone(),
        "--version".to_owned(),
        ctx.version.clone(),
        "--architecture".to_owned(),
        package_arch(target),
        "--chdir".to_owned(),
        dist.to_string(),
        "--package".to_owned(),
        file.to_string(),
        "--force".to_owned(),
    ];
    for (flag, value) in [
        ("--vendor", &fpm.vendor),
        ("--url", &fpm.homepage),
        ("--maintainer", &fpm.maintainer),
        ("--description", &fpm.description),
        ("--license", &fpm.license),
    ] {
        if !value.is_empty() {
            args.push(flag.to_owned());
            args.push(value.clone());
        }
    }
    for dep in &fpm.dependencies {
        args.push("--depends".to_owned());
        args.push(dep.clone());
    }
    for conflict in &fpm.conflicts {
        args.push("--conflicts".to_owned());
        args.push(conflict.clone());
    }
    // source=destination
    args.push(format!(
        "{}={}",
        binary.path,
        Utf8Path::new(&fpm.bindir).join(&binary.name)
    ));
    args
}

/// The arch name package managers use for the target
pub fn package_arch(target: &BuildTarget) -> String {
    match (target.arch.as_str(), target.arm_str()) {
        ("386", _) => "i386".to_owned(),
        ("amd64", _) => "x86_64".to_owned(),
        ("arm64", _) => "aarch64".to_owned(),
        ("arm", "") => "arm".to_owned(),
        ("arm", arm) => format!("armv{arm}"),
        (arch, _) => arch.to_owned(),
    }
}
