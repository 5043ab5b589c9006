//! Publishing the GitHub release

use rayon::prelude::*;
use tracing::{info, warn};

use crate::client::{Client, GithubClient, ReleaseRequest};
use crate::context::Context;
use crate::errors::{ShipError, ShipResult};
use crate::pipeline::Pipe;

/// Releases to GitHub
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleasePipe;

impl Pipe for ReleasePipe {
    fn name(&self) -> &'static str {
        "release"
    }

    fn description(&self) -> &'static str {
        "Releasing to GitHub"
    }

    fn run(&self, ctx: &mut Context) -> ShipResult<()> {
        if !ctx.publish() {
            warn!("skipped because publishing is disabled");
            return Ok(());
        }
        let client = GithubClient::new(ctx.token.clone().unwrap_or_default())?;
        publish(ctx, &client)
    }
}

/// Create the release and upload every artifact to it
pub fn publish(ctx: &Context, client: &dyn Client) -> ShipResult<()> {
    let repo = &ctx.config.release.github;
    if repo.is_empty() {
        return Err(ShipError::MissingReleaseRepo);
    }
    info!("creating or updating release {} on {repo}", ctx.git.current_tag);
    let release_id = client.create_release(repo, &release_request(ctx))?;

    let artifacts = ctx.artifacts();
    let pool = super::pool(ctx)?;
    pool.install(|| {
        artifacts.par_iter().try_for_each(|artifact| {
            let name = artifact.file_name().unwrap_or(artifact.as_str());
            client.upload(repo, release_id, name, artifact)
        })
    })
}

/// What the release should look like
pub fn release_request(ctx: &Context) -> ReleaseRequest {
    ReleaseRequest {
        tag_name: ctx.git.current_tag.clone(),
        name: ctx.git.current_tag.clone(),
        body: describe_body(&ctx.release_notes),
        draft: ctx.config.release.draft,
        prerelease: ctx.config.release.prerelease,
    }
}

/// Release notes plus a footer
pub fn describe_body(release_notes: &str) -> String {
    format!(
        "{}\n\n---\nAutomated with [shipwright](https://github.com/shipwright-rs/shipwright)\n",
        release_notes.trim_end()
    )
}
