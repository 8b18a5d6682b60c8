//! Cancellable actor loop
//!
//! `run_actor` is the only place an actor is driven. It checks the
//! cancellation token at the top of every iteration and races every pause
//! against it, so shutdown is observed promptly and never while a step is
//! mutating an account.

use super::{Actor, ActorExit, ExitReason, Step};
use log::info;
use tokio_util::sync::CancellationToken;

/// Drive an actor until its policy stops it or `cancel` fires
///
/// Intended to be spawned as one tokio task per actor. Steps run
/// synchronously on the worker thread; they only take short account
/// guards, and no guard outlives a step.
pub async fn run_actor<A: Actor>(mut actor: A, cancel: CancellationToken) -> ActorExit {
    info!("{} started", actor.name());

    let reason = loop {
        if cancel.is_cancelled() {
            break ExitReason::Cancelled;
        }

        match actor.step() {
            Step::Continue(pause) => {
                tokio::select! {
                    _ = cancel.cancelled() => break ExitReason::Cancelled,
                    _ = tokio::time::sleep(pause) => {}
                }
            }
            Step::Stop => break ExitReason::Finished,
        }
    };

    info!(
        "{} stopped ({:?}) after {} cycles",
        actor.name(),
        reason,
        actor.cycles()
    );

    ActorExit {
        name: actor.name().to_string(),
        reason,
        cycles: actor.cycles(),
    }
}
