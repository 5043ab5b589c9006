use std::sync::{Arc, Mutex};

use super::mock::*;
use crate::context::{Context, RunFlags};
use crate::errors::ShipError;
use crate::pipeline::{default_pipes, run, Pipe};

fn recording_pipes(
    names: &[&'static str],
    failing: Option<&'static str>,
) -> (Vec<Box<dyn Pipe>>, Arc<Mutex<Vec<&'static str>>>) {
    let log = Arc::new(Mutex::new(vec![]));
    let pipes = names
        .iter()
        .map(|&name| {
            Box::new(RecordingPipe {
                name,
                log: log.clone(),
                fail: Some(name) == failing,
            }) as Box<dyn Pipe>
        })
        .collect();
    (pipes, log)
}

fn empty_context() -> Context {
    Context::new(Default::default(), RunFlags::default(), "/tmp")
}

#[test]
fn runs_every_stage_in_order() {
    let (pipes, log) = recording_pipes(&["one", "two", "three"], None);
    let mut ctx = empty_context();
    run(&mut ctx, &pipes).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["one", "two", "three"]);
    // every stage saw the writes of the ones before it
    assert_eq!(ctx.release_notes, "onetwothree");
}

#[test]
fn stops_at_first_failure() {
    let (pipes, log) = recording_pipes(&["one", "two", "three", "four"], Some("two"));
    let mut ctx = empty_context();
    let err = run(&mut ctx, &pipes).unwrap_err();
    assert!(matches!(err, ShipError::NoBuildTargets));
    assert_eq!(*log.lock().unwrap(), vec!["one", "two"]);
    // effects of the stages that ran are left in place
    assert_eq!(ctx.release_notes, "onetwo");
}

#[test]
fn first_stage_failing_runs_nothing_else() {
    let (pipes, log) = recording_pipes(&["one", "two"], Some("one"));
    let mut ctx = empty_context();
    assert!(run(&mut ctx, &pipes).is_err());
    assert_eq!(*log.lock().unwrap(), vec!["one"]);
}

#[test]
fn empty_pipeline_succeeds() {
    let mut ctx = empty_context();
    run(&mut ctx, &[]).unwrap();
}

#[test]
fn default_stage_order() {
    let names = default_pipes()
        .iter()
        .map(|pipe| pipe.name())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "defaults",
            "git",
            "env",
            "build",
            "archive",
            "fpm",
            "checksums",
            "release",
            "brew",
        ]
    );
    assert!(default_pipes()
        .iter()
        .all(|pipe| !pipe.description().is_empty()));
}
