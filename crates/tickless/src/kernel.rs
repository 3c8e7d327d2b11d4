//! Interface consumed from the scheduler/kernel.
//!
//! The tick core never touches kernel tick state directly; every mutation
//! goes through this trait so the scheduler keeps a single mutation point
//! for its own invariants.

use crate::Ticks;

/// Answer to the sleep-eligibility re-check performed after interrupts are
/// masked but before committing to sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepDecision {
    /// No pending condition; proceed into low power.
    Continue,
    /// Something (typically an interrupt that pended a context switch)
    /// arrived since the suppression decision; abandon the sleep.
    Abort,
}

/// Kernel-side tick operations.
pub trait KernelTickOps: Send + Sync {
    /// Re-checks whether entering low power is still safe. Queried with
    /// interrupts masked, atomically with the sleep transition.
    fn confirm_sleep_eligible(&self) -> SleepDecision;

    /// Advances the kernel tick by exactly one. Called from the tick
    /// interrupt handler.
    fn advance_tick_by_one(&self);

    /// Steps the kernel tick forward by the number of whole periods that
    /// elapsed across a suppression window.
    fn advance_ticks(&self, n: Ticks);

    /// Requests a context switch at the next safe point. Deferred, never
    /// taken inside the interrupt itself.
    fn pend_context_switch(&self);
}
