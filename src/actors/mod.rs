//! Actors module
//!
//! Actors are the long-running units of concurrent behavior that read and
//! mutate accounts. Each actor is a plain value holding its own state and
//! policy; it does not own a thread. The [`runner`] drives one actor on one
//! task and owns the cancellation check.
//!
//! - `customer` - Buys until its account can no longer pay
//! - `employee` - Receives salary and invests a share of it, forever
//! - `runner` - Cancellable loop around [`Actor::step`]

pub mod customer;
pub mod employee;
pub mod runner;

pub use customer::{Customer, CustomerPolicy};
pub use employee::{Employee, EmployeePolicy, InvestmentBasis};
pub use runner::run_actor;

use std::time::Duration;

/// What the actor wants after one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Pause for the given duration, then run another iteration
    Continue(Duration),

    /// The actor's own termination policy fired
    Stop,
}

/// One unit of concurrent behavior
///
/// Implementations perform a single iteration per [`Actor::step`] call and
/// must not sleep or hold an account guard when returning. The runner checks
/// the stop signal between steps, so an iteration is never interrupted
/// mid-mutation.
pub trait Actor: Send + 'static {
    /// Display name for event lines and reports
    fn name(&self) -> &str;

    /// Run one iteration
    fn step(&mut self) -> Step;

    /// Number of iterations that completed their main effect
    fn cycles(&self) -> u64;
}

/// Why an actor's task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The actor's own policy stopped it (e.g. funds exhausted)
    Finished,

    /// The stop signal was observed
    Cancelled,

    /// The task died unexpectedly; always a defect
    Panicked,
}

/// Final record of an actor, returned when its task ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorExit {
    /// The actor's name
    pub name: String,

    /// Why it stopped
    pub reason: ExitReason,

    /// Completed cycles at exit (see [`Actor::cycles`])
    pub cycles: u64,
}
