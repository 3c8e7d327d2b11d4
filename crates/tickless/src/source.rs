//! Tick-source strategies.
//!
//! Interchangeable strategies behind one trait, chosen by
//! [`TickConfig::mode`](crate::TickMode) at construction time rather than by
//! link-time symbol shadowing.

use hat::AlarmTimer;

use crate::config::{TickConfig, Timebase};
use crate::controller::TicklessController;
use crate::critical::{InterruptMask, MaskGuard};
use crate::error::TickSourceError;
use crate::kernel::KernelTickOps;
use crate::sync::Arc;
use crate::Ticks;

/// Alarm interrupt entry point, ready to hand to vector registration.
pub type AlarmIsr = Arc<dyn Fn() + Send + Sync>;

/// A producer of the kernel's notion of elapsed time.
pub trait TickSource: Send + Sync {
    /// Defers tick interrupts for up to the requested number of periods.
    /// Strategies that cannot suppress treat this as a no-op.
    fn suppress_ticks_and_sleep(&self, requested_idle_ticks: Ticks);

    /// Largest idle duration the strategy can honor.
    fn max_suppressible_ticks(&self) -> Ticks;

    /// The interrupt service routine for the alarm this source owns.
    fn alarm_isr(&self) -> AlarmIsr;
}

impl<H: AlarmTimer + 'static> TickSource for TicklessController<H> {
    fn suppress_ticks_and_sleep(&self, requested_idle_ticks: Ticks) {
        TicklessController::suppress_ticks_and_sleep(self, requested_idle_ticks);
    }

    fn max_suppressible_ticks(&self) -> Ticks {
        TicklessController::max_suppressible_ticks(self)
    }

    fn alarm_isr(&self) -> AlarmIsr {
        let handler = self.interrupt_handler();
        Arc::new(move || handler.on_alarm())
    }
}

/// Plain fixed-rate tick source.
///
/// The alarm stays armed at one tick period; auto-clear-on-alarm keeps the
/// cadence with no reprogramming. Idle requests are ignored — the processor
/// wakes every tick regardless.
pub struct PeriodicTickSource<H> {
    inner: Arc<PeriodicInner<H>>,
}

struct PeriodicInner<H> {
    timer: Arc<H>,
    kernel: Arc<dyn KernelTickOps>,
    mask: Arc<dyn InterruptMask>,
    preemptive: bool,
}

impl<H: AlarmTimer> PeriodicInner<H> {
    fn on_alarm(&self) {
        if self.preemptive {
            self.kernel.pend_context_switch();
        }
        {
            let _guard = MaskGuard::acquire(self.mask.as_ref());
            self.kernel.advance_tick_by_one();
        }
        self.timer.clear_pending();
    }
}

impl<H: AlarmTimer + 'static> PeriodicTickSource<H> {
    pub fn new(
        config: &TickConfig,
        timer: Arc<H>,
        kernel: Arc<dyn KernelTickOps>,
        mask: Arc<dyn InterruptMask>,
    ) -> Result<Self, TickSourceError> {
        let timebase = Timebase::derive(config, timer.counter_max())?;
        timer.configure(&config.alarm_config())?;
        timer.clear_pending();
        timer.set_alarm(timebase.tick_period);
        timer.enable();
        Ok(Self {
            inner: Arc::new(PeriodicInner {
                timer,
                kernel,
                mask,
                preemptive: config.preemptive,
            }),
        })
    }
}

impl<H: AlarmTimer + 'static> TickSource for PeriodicTickSource<H> {
    fn suppress_ticks_and_sleep(&self, requested_idle_ticks: Ticks) {
        let _ = requested_idle_ticks;
        log::trace!("periodic tick source ignores suppression request");
    }

    fn max_suppressible_ticks(&self) -> Ticks {
        // Cannot defer past the next tick boundary.
        1
    }

    fn alarm_isr(&self) -> AlarmIsr {
        let inner = Arc::clone(&self.inner);
        Arc::new(move || inner.on_alarm())
    }
}
