//! Running stages in order against one shared [`Context`][]
//!
//! The stage list is fixed. The first stage to fail ends the run and its error
//! is the run's error. Nothing done by earlier stages is undone.

use tracing::{info, info_span};

use crate::context::Context;
use crate::errors::ShipResult;
use crate::pipes;

/// One stage of a release run
pub trait Pipe {
    /// Short identifier, used for the logging span
    fn name(&self) -> &'static str;

    /// What the stage does, logged before it runs
    fn description(&self) -> &'static str;

    /// Do the work
    ///
    /// A stage that decides not to do anything (not configured, publishing off, ...)
    /// logs why and returns `Ok`.
    fn run(&self, ctx: &mut Context) -> ShipResult<()>;
}

/// Run the stages in order, stopping at the first error
pub fn run(ctx: &mut Context, pipes: &[Box<dyn Pipe>]) -> ShipResult<()> {
    for pipe in pipes {
        info!("{}", pipe.description());
        let span = info_span!("pipe", name = pipe.name());
        let _guard = span.enter();
        pipe.run(ctx)?;
    }
    info!("release succeeded!");
    Ok(())
}

/// The stages of a release, in the order they run
pub fn default_pipes() -> Vec<Box<dyn Pipe>> {
    vec![
        Box::new(pipes::defaults::DefaultsPipe),
        Box::new(pipes::git::GitPipe),
        Box::new(pipes::env::EnvPipe),
        Box::new(pipes::build::BuildPipe),
        Box::new(pipes::archive::ArchivePipe),
        Box::new(pipes::fpm::FpmPipe),
        Box::new(pipes::checksums::ChecksumsPipe),
        Box::new(pipes::release::ReleasePipe),
        Box::new(pipes::brew::BrewPipe),
    ]
}
