//! Building the binary for every target in the matrix

use axoasset::LocalAsset;
use axoprocess::Cmd;
use camino::Utf8Path;
use itertools::Itertools;
use rayon::prelude::*;
use tracing::info;

use crate::context::{Binary, Context, TemplateVars};
use crate::errors::{ShipError, ShipResult};
use crate::matrix::resolve_targets;
use crate::pipeline::Pipe;
use crate::platform::BuildTarget;

/// Directory under dist that build outputs are written to
pub const BUILD_DIR: &str = "build";
/// Env var telling the build command which os to build for
pub const ENV_OS: &str = "SHIPWRIGHT_OS";
/// Env var telling the build command which arch to build for
pub const ENV_ARCH: &str = "SHIPWRIGHT_ARCH";
/// Env var telling the build command which arm revision to build for
pub const ENV_ARM: &str = "SHIPWRIGHT_ARM";
/// Env var telling the build command where to write the binary
pub const ENV_OUTPUT: &str = "SHIPWRIGHT_OUTPUT";

/// Builds the binaries
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildPipe;

impl Pipe for BuildPipe {
    fn name(&self) -> &'static str {
        "build"
    }

    fn description(&self) -> &'static str {
        "Building binaries"
    }

    fn run(&self, ctx: &mut Context) -> ShipResult<()> {
        if ctx.config.build.command.is_empty() {
            return Err(ShipError::NoBuildCommand);
        }
        let targets = resolve_targets(&ctx.config.build);
        if targets.is_empty() {
            return Err(ShipError::NoBuildTargets);
        }
        ctx.targets = targets;

        run_hook(ctx, &ctx.config.build.hooks.pre)?;

        LocalAsset::create_dir_all(ctx.dist_dir())?;
        let ctx = &*ctx;
        // duplicates share an output path, build each once
        let targets = ctx.targets.iter().unique().collect::<Vec<_>>();
        let pool = super::pool(ctx)?;
        pool.install(|| {
            targets
                .par_iter()
                .try_for_each(|target| build_target(ctx, target))
        })?;

        run_hook(ctx, &ctx.config.build.hooks.post)
    }
}

/// Run a hook, doing nothing if it's blank
fn run_hook(ctx: &Context, hook: &str) -> ShipResult<()> {
    let mut parts = hook.split_whitespace();
    let Some(program) = parts.next() else {
        return Ok(());
    };
    info!("running hook: {hook}");
    let mut cmd = Cmd::new(program, format!("run hook '{hook}'"));
    cmd.current_dir(&ctx.root);
    for arg in parts {
        cmd.arg(arg);
    }
    cmd.run()?;
    Ok(())
}

/// Build one target and register its binary
fn build_target(ctx: &Context, target: &BuildTarget) -> ShipResult<()> {
    let folder = ctx.archive_name(target)?;
    let binary_name = format!("{}{}", ctx.config.build.binary, target.ext());
    let output = ctx
        .dist_dir()
        .join(BUILD_DIR)
        .join(&folder)
        .join(&binary_name);
    if let Some(parent) = output.parent() {
        LocalAsset::create_dir_all(parent)?;
    }

    let vars = TemplateVars {
        output: output.to_string(),
        ..ctx.template_vars(target)
    };
    let args = build_command(ctx, &vars)?;
    let env = build_env(ctx, target, &output)?;
    let (program, args) = args.split_first().ok_or(ShipError::NoBuildCommand)?;

    info!("building {target}");
    let mut cmd = Cmd::new(program, format!("build {target}"));
    cmd.current_dir(&ctx.root);
    for arg in args {
        cmd.arg(arg);
    }
    cmd.envs(env);
    cmd.stdout_to_stderr();
    cmd.run()?;

    if !output.exists() {
        return Err(ShipError::MissingBinary {
            target: target.to_string(),
            path: output,
        });
    }
    ctx.register_binary(
        target,
        folder,
        Binary {
            name: binary_name,
            path: output,
        },
    );
    Ok(())
}

/// The build command with every argument rendered
pub fn build_command(ctx: &Context, vars: &TemplateVars) -> ShipResult<Vec<String>> {
    ctx.config
        .build
        .command
        .iter()
        .map(|arg| ctx.templates.render_str(arg, vars))
        .collect()
}

/// Env vars describing the target, followed by the configured ones
pub fn build_env(
    ctx: &Context,
    target: &BuildTarget,
    output: &Utf8Path,
) -> ShipResult<Vec<(String, String)>> {
    let mut env = vec![
        (ENV_OS.to_owned(), target.os.clone()),
        (ENV_ARCH.to_owned(), target.arch.clone()),
        (ENV_ARM.to_owned(), target.arm_str().to_owned()),
        (ENV_OUTPUT.to_owned(), output.to_string()),
    ];
    for entry in &ctx.config.build.env {
        let Some((key, val)) = entry.split_once('=') else {
            return Err(ShipError::InvalidEnv {
                entry: entry.clone(),
            });
        };
        if key.is_empty() {
            return Err(ShipError::InvalidEnv {
                entry: entry.clone(),
            });
        }
        env.push((key.to_owned(), val.to_owned()));
    }
    Ok(env)
}
