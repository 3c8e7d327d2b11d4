//! Alarm timer abstraction

use crate::error::HatResult;

/// Clock source feeding the free-running counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    /// Low-power 32 kHz oscillator, usable across deep sleep states.
    LowPower32k,
    /// Divided system clock; cheaper to start but stops in deep sleep.
    SystemClock,
}

/// One-time alarm timer configuration.
#[derive(Debug, Clone, Copy)]
pub struct AlarmConfig {
    pub clock: ClockSource,
    /// Power-of-two prescale applied to the clock source.
    pub prescale: u8,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            clock: ClockSource::LowPower32k,
            prescale: 0,
        }
    }
}

/// Free-running up-counter with a single compare register and an enable bit.
///
/// The counter clears itself to zero and raises the alarm interrupt when it
/// reaches the programmed compare value, with no software intervention
/// (auto-clear-on-alarm). Implementations expose registers through `&self`;
/// the peripheral is interior-mutable the way memory-mapped hardware is.
///
/// # Transition contract
///
/// `enable` and `disable` are idempotent and *synchronous*: they spin on the
/// hardware busy flag before and after toggling the enable bit and do not
/// return until the requested state is committed. Callers must not invoke
/// `set_alarm` or `read_counter` while a transition is still in flight;
/// the synchronous guarantee makes that impossible as long as all register
/// access goes through this trait from a single context.
pub trait AlarmTimer: Send + Sync {
    /// One-time setup. Brings the clock source ready within a bounded wait;
    /// fails with [`HatError::ClockNotReady`](crate::HatError) if it never
    /// becomes ready, which is fatal to tick-source initialization.
    fn configure(&self, config: &AlarmConfig) -> HatResult<()>;

    /// Programs the compare register. Takes effect on the next counter tick.
    fn set_alarm(&self, value: u32);

    /// Current free-running counter value.
    fn read_counter(&self) -> u32;

    /// Starts the counter. Synchronous and idempotent, see the trait docs.
    fn enable(&self);

    /// Stops the counter. Synchronous and idempotent, see the trait docs.
    fn disable(&self);

    /// Clears the alarm interrupt-pending condition.
    fn clear_pending(&self);

    /// Largest value the compare register can hold.
    fn counter_max(&self) -> u32 {
        u32::MAX
    }
}
