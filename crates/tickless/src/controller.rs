//! Idle suppression controller: the tickless-idle algorithm.

use core::sync::atomic::{AtomicBool, Ordering};

use hat::AlarmTimer;

use crate::config::{TickConfig, TickMode, Timebase};
use crate::critical::{InterruptMask, MaskGuard, NullMask};
use crate::error::TickSourceError;
use crate::isr::TickInterruptHandler;
use crate::kernel::{KernelTickOps, SleepDecision};
use crate::sleep::{NoopHooks, SleepDepth, SleepHooks, SleepManager, StayAwake};
use crate::source::{PeriodicTickSource, TickSource};
use crate::sync::Arc;
use crate::Ticks;

/// Builder for the tick source.
///
/// `build` performs the one-time tick-source initialization: it derives the
/// time base, configures the alarm timer, arms it for exactly one tick
/// period and starts it. All failure here is fatal — the kernel cannot
/// establish a time base at all.
pub struct TicklessBuilder<H> {
    config: TickConfig,
    timer: Arc<H>,
    kernel: Arc<dyn KernelTickOps>,
    sleep: Arc<dyn SleepManager>,
    hooks: Arc<dyn SleepHooks>,
    mask: Arc<dyn InterruptMask>,
}

impl<H: AlarmTimer + 'static> TicklessBuilder<H> {
    pub fn new(config: TickConfig, timer: Arc<H>, kernel: Arc<dyn KernelTickOps>) -> Self {
        Self {
            config,
            timer,
            kernel,
            sleep: Arc::new(StayAwake),
            hooks: Arc::new(NoopHooks),
            mask: Arc::new(NullMask),
        }
    }

    pub fn with_sleep_manager(mut self, sleep: Arc<dyn SleepManager>) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn SleepHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_interrupt_mask(mut self, mask: Arc<dyn InterruptMask>) -> Self {
        self.mask = mask;
        self
    }

    pub fn build(self) -> Result<TicklessController<H>, TickSourceError> {
        let timebase = Timebase::derive(&self.config, self.timer.counter_max())?;

        self.timer.configure(&self.config.alarm_config())?;
        self.timer.clear_pending();

        // Start with the tick active and a regular period.
        self.timer.set_alarm(timebase.tick_period);
        self.timer.enable();

        log::debug!(
            "tick source up: period={} counts, max suppressible={} ticks, compensation={}",
            timebase.tick_period,
            timebase.max_suppressible,
            timebase.compensation
        );

        Ok(TicklessController {
            timer: self.timer,
            kernel: self.kernel,
            sleep: self.sleep,
            hooks: self.hooks,
            mask: self.mask,
            tick_flag: Arc::new(AtomicBool::new(false)),
            timebase,
            preemptive: self.config.preemptive,
        })
    }

    /// Builds whichever tick-source strategy the configuration selects,
    /// behind the common [`TickSource`] interface.
    pub fn build_source(self) -> Result<Box<dyn TickSource>, TickSourceError> {
        match self.config.mode {
            TickMode::Tickless => self.build().map(|c| Box::new(c) as Box<dyn TickSource>),
            TickMode::Periodic => {
                PeriodicTickSource::new(&self.config, self.timer, self.kernel, self.mask)
                    .map(|s| Box::new(s) as Box<dyn TickSource>)
            }
        }
    }
}

/// Owns the alarm timer and implements tick suppression across idle
/// windows.
///
/// All runtime-mutable state is the tick flag (written by the interrupt
/// handler, read here under the interrupt mask) and the timer's own
/// registers; the derived time base is immutable after construction.
pub struct TicklessController<H> {
    timer: Arc<H>,
    kernel: Arc<dyn KernelTickOps>,
    sleep: Arc<dyn SleepManager>,
    hooks: Arc<dyn SleepHooks>,
    mask: Arc<dyn InterruptMask>,
    tick_flag: Arc<AtomicBool>,
    timebase: Timebase,
    preemptive: bool,
}

impl<H: AlarmTimer + 'static> TicklessController<H> {
    pub fn builder(
        config: TickConfig,
        timer: Arc<H>,
        kernel: Arc<dyn KernelTickOps>,
    ) -> TicklessBuilder<H> {
        TicklessBuilder::new(config, timer, kernel)
    }

    pub fn timebase(&self) -> Timebase {
        self.timebase
    }

    pub fn max_suppressible_ticks(&self) -> Ticks {
        self.timebase.max_suppressible
    }

    /// Handle to register as the alarm interrupt service routine.
    pub fn interrupt_handler(&self) -> TickInterruptHandler<H> {
        TickInterruptHandler::new(
            Arc::clone(&self.timer),
            Arc::clone(&self.kernel),
            Arc::clone(&self.mask),
            Arc::clone(&self.tick_flag),
            self.timebase.tick_period,
            self.preemptive,
        )
    }

    /// Suppresses the tick interrupt for up to `requested_idle_ticks`
    /// periods, sleeping through the window when permitted, then steps the
    /// kernel tick count by the number of whole periods that actually
    /// elapsed.
    ///
    /// Must be called with the scheduler suspended: no task switching may
    /// occur for the duration of this call. Never fails; an abandoned sleep
    /// is a normal outcome that leaves the tick count untouched.
    pub fn suppress_ticks_and_sleep(&self, requested_idle_ticks: Ticks) {
        let timebase = self.timebase;
        let requested = requested_idle_ticks.min(timebase.max_suppressible);

        // -1 because this call begins partway through the current tick
        // period; the fraction is reconciled after waking. The clamp above
        // keeps the product inside the counter range.
        let mut alarm =
            (u64::from(timebase.tick_period) * u64::from(requested.saturating_sub(1))) as u32;
        if alarm > timebase.compensation {
            // Pre-subtract the counts the stop/restart below will eat.
            alarm -= timebase.compensation;
        }

        // Reprogramming the compare register requires a halted counter.
        self.timer.disable();

        // Coarser than the kernel's critical section: the interrupts that
        // could legitimately cancel the sleep must also be held off so the
        // eligibility re-check is atomic with the sleep transition.
        let masked = MaskGuard::acquire(self.mask.as_ref());

        self.tick_flag.store(false, Ordering::SeqCst);

        if self.kernel.confirm_sleep_eligible() == SleepDecision::Abort {
            // The compare register still holds one tick period from the
            // last re-arm; restarting the counter restores normal ticking.
            // Time has not meaningfully passed, nothing to reconcile.
            self.timer.enable();
            log::trace!("tick suppression abandoned before sleep");
            return;
        }

        // The counter ran on until the disable above; only the comparator
        // reprogramming was pending. Fold the elapsed counts in.
        let alarm = alarm.saturating_sub(self.timer.read_counter());
        self.timer.set_alarm(alarm);
        self.timer.enable();

        let mut planned_idle = requested;
        self.hooks.pre_sleep(&mut planned_idle);

        // Zero from the hook means it already performed the wait itself.
        if planned_idle > 0 {
            let depth = self.sleep.deepest_allowed();
            if depth != SleepDepth::Active {
                self.sleep.enter(depth);
            }
        }

        self.hooks.post_sleep(planned_idle);

        // Freeze the counter for inspection.
        self.timer.disable();

        // Unmask. A tick interrupt pended during the window executes here
        // and records its own single-tick advance.
        drop(masked);

        let complete_ticks = if self.tick_flag.load(Ordering::SeqCst) {
            // The suppression alarm fired on schedule. Land the next
            // interrupt exactly on the coming tick boundary, and report one
            // tick less than requested: the advance pended by the handler
            // supplies the final one.
            let remaining = timebase.tick_period.saturating_sub(self.timer.read_counter());
            self.timer.set_alarm(remaining);
            requested.saturating_sub(1)
        } else {
            // Some other interrupt ended the sleep early. Count the whole
            // periods that passed and leave the sub-tick fraction armed.
            let counted = self.timer.read_counter();
            let complete = counted / timebase.tick_period;
            self.timer.set_alarm(counted - complete * timebase.tick_period);
            complete
        };
        debug_assert!(complete_ticks <= requested);

        self.timer.enable();

        log::trace!(
            "suppression window closed: requested={requested} complete={complete_ticks}"
        );
        self.kernel.advance_ticks(complete_ticks);
    }
}
