//! Loading and checking the environment variables a release needs

use tracing::warn;

use crate::context::Context;
use crate::errors::{ShipError, ShipResult};
use crate::pipeline::Pipe;

/// Env var holding the GitHub token
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Loads and validates environment variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvPipe;

impl Pipe for EnvPipe {
    fn name(&self) -> &'static str {
        "env"
    }

    fn description(&self) -> &'static str {
        "Loading environment variables"
    }

    fn run(&self, ctx: &mut Context) -> ShipResult<()> {
        let token = std::env::var(GITHUB_TOKEN).ok();
        check_token(ctx, token)
    }
}

/// Store the token, requiring it only when validating a release that will be published
pub fn check_token(ctx: &mut Context, token: Option<String>) -> ShipResult<()> {
    ctx.token = token.filter(|t| !t.trim().is_empty());
    if !ctx.publish() {
        warn!("skipped because publishing is disabled");
        return Ok(());
    }
    if !ctx.validate() {
        warn!("skipped validations because --skip-validate is set");
        return Ok(());
    }
    if ctx.token.is_none() {
        return Err(ShipError::MissingToken);
    }
    Ok(())
}
