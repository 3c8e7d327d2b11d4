//! Sleep depth selection and application hooks.

use crate::Ticks;

/// How deep a low-power state the processor may enter.
///
/// Ordered from shallowest to deepest; `Active` means no hardware sleep at
/// all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SleepDepth {
    Active,
    Wait,
    Retention,
    Backup,
}

/// External power manager: picks the deepest permissible sleep state and
/// executes the processor's wait-for-interrupt at that depth.
pub trait SleepManager: Send + Sync {
    /// Deepest sleep state currently allowed by all peripheral locks.
    fn deepest_allowed(&self) -> SleepDepth;

    /// Blocks until any interrupt fires. Called only with a depth deeper
    /// than [`SleepDepth::Active`]. The wake resumes execution at the
    /// instruction following the sleep; there is no cancellation once
    /// entered.
    fn enter(&self, depth: SleepDepth);
}

/// Application-defined processing around the sleep instruction.
pub trait SleepHooks: Send + Sync {
    /// Runs just before the sleep instruction. May reduce `planned_idle` —
    /// setting it to zero signals that the hook has already performed the
    /// wait itself and the hardware sleep must be skipped.
    fn pre_sleep(&self, planned_idle: &mut Ticks) {
        let _ = planned_idle;
    }

    /// Runs after waking, unconditionally — even when the hardware sleep
    /// was skipped.
    fn post_sleep(&self, planned_idle: Ticks) {
        let _ = planned_idle;
    }
}

/// Default hooks that do nothing.
pub struct NoopHooks;

impl SleepHooks for NoopHooks {}

/// Sleep manager that never permits hardware sleep.
///
/// Hosted default: tick suppression still reprograms the alarm, but the
/// processor stays awake through the idle window.
pub struct StayAwake;

impl SleepManager for StayAwake {
    fn deepest_allowed(&self) -> SleepDepth {
        SleepDepth::Active
    }

    fn enter(&self, _depth: SleepDepth) {}
}
