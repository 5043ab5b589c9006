//! The stages of a release run
//!
//! See [`crate::pipeline::default_pipes`][] for the order they run in.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::context::Context;
use crate::errors::ShipResult;

pub mod archive;
pub mod brew;
pub mod build;
pub mod checksums;
pub mod defaults;
pub mod env;
pub mod fpm;
pub mod git;
pub mod release;

/// A worker pool sized by the run's parallelism
pub(crate) fn pool(ctx: &Context) -> ShipResult<ThreadPool> {
    Ok(ThreadPoolBuilder::new()
        .num_threads(ctx.parallelism.max(1))
        .build()?)
}
