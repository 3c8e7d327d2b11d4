//! Normal-rate tick interrupt handler.

use core::sync::atomic::{AtomicBool, Ordering};

use hat::AlarmTimer;

use crate::critical::{InterruptMask, MaskGuard};
use crate::kernel::KernelTickOps;
use crate::sync::Arc;

/// Handler for the alarm interrupt while the timer runs at one tick period
/// per alarm, i.e. outside any suppression window — or when a suppression
/// window's alarm fires exactly on schedule.
///
/// A cheap cloneable handle over the controller's shared state; hand it to
/// whatever registers the alarm interrupt and call [`on_alarm`]
/// (`TickInterruptHandler::on_alarm`) from the ISR.
pub struct TickInterruptHandler<H> {
    timer: Arc<H>,
    kernel: Arc<dyn KernelTickOps>,
    mask: Arc<dyn InterruptMask>,
    tick_flag: Arc<AtomicBool>,
    tick_period: u32,
    preemptive: bool,
}

impl<H> Clone for TickInterruptHandler<H> {
    fn clone(&self) -> Self {
        Self {
            timer: Arc::clone(&self.timer),
            kernel: Arc::clone(&self.kernel),
            mask: Arc::clone(&self.mask),
            tick_flag: Arc::clone(&self.tick_flag),
            tick_period: self.tick_period,
            preemptive: self.preemptive,
        }
    }
}

impl<H: AlarmTimer> TickInterruptHandler<H> {
    pub(crate) fn new(
        timer: Arc<H>,
        kernel: Arc<dyn KernelTickOps>,
        mask: Arc<dyn InterruptMask>,
        tick_flag: Arc<AtomicBool>,
        tick_period: u32,
        preemptive: bool,
    ) -> Self {
        Self {
            timer,
            kernel,
            mask,
            tick_flag,
            tick_period,
            preemptive,
        }
    }

    /// The tick ISR body.
    ///
    /// The tick must be recorded (steps 2 and 3) before the alarm is
    /// re-armed: the re-arm switches the alarm semantics from "whatever the
    /// suppression window programmed" back to "exactly one tick period".
    pub fn on_alarm(&self) {
        if self.preemptive {
            self.kernel.pend_context_switch();
        }

        {
            // Mask only while mutating the kernel's tick bookkeeping.
            let _guard = MaskGuard::acquire(self.mask.as_ref());
            self.kernel.advance_tick_by_one();
        }

        // The CPU woke because of a genuine tick expiry.
        self.tick_flag.store(true, Ordering::SeqCst);

        self.timer.set_alarm(self.tick_period);

        self.timer.clear_pending();
    }
}
