//! Deterministic alarm timer simulation for hosted tests.
//!
//! [`SimAlarmTimer`] models the register-level behavior the tick core relies
//! on: the free-running counter, auto-clear-on-alarm, the interrupt-pending
//! latch, and the busy flag that makes enable/disable transitions
//! synchronous. Wall time is driven explicitly through [`advance`]
//! (`SimAlarmTimer::advance`) and keeps flowing while the counter is
//! stopped, so stop/restart drift is observable in tests.
//!
//! The simulation is instrumented: it records every alarm write and a
//! chronological operation log from which tests can check that no register
//! access ever lands inside an enable/disable transition window.

use std::sync::Mutex;

use crate::alarm::{AlarmConfig, AlarmTimer};
use crate::error::{HatError, HatResult};

/// One entry in the simulation's chronological operation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOp {
    TransitionBegin,
    TransitionEnd,
    SetAlarm(u32),
    ReadCounter(u32),
    ClearPending,
    Fire,
}

struct SimState {
    counter: u32,
    alarm: u32,
    enabled: bool,
    pending: bool,
    configured: bool,
    osc_ready: bool,
    counter_max: u32,
    /// Wall counts consumed by each enable/disable while the counter is not
    /// advancing; what `StoppedTimerCompensation` exists to absorb.
    transition_penalty: u64,
    wall: u64,
    fired: u64,
    alarm_writes: Vec<u32>,
    ops: Vec<SimOp>,
}

/// Software model of a free-running counter + comparator peripheral.
pub struct SimAlarmTimer {
    state: Mutex<SimState>,
}

impl SimAlarmTimer {
    pub fn new() -> Self {
        Self::with_counter_max(u32::MAX)
    }

    pub fn with_counter_max(counter_max: u32) -> Self {
        assert!(counter_max > 0, "counter range must be non-empty");
        Self {
            state: Mutex::new(SimState {
                counter: 0,
                alarm: 0,
                enabled: false,
                pending: false,
                configured: false,
                osc_ready: true,
                counter_max,
                transition_penalty: 0,
                wall: 0,
                fired: 0,
                alarm_writes: Vec::new(),
                ops: Vec::new(),
            }),
        }
    }

    /// Simulates an oscillator that never becomes ready; `configure` fails.
    pub fn with_dead_oscillator(self) -> Self {
        self.state.lock().expect("sim state poisoned").osc_ready = false;
        self
    }

    /// Charges `counts` of wall time to every enable/disable transition.
    pub fn with_transition_penalty(self, counts: u64) -> Self {
        self.state.lock().expect("sim state poisoned").transition_penalty = counts;
        self
    }

    /// Advances wall time by `counts`. The counter only moves while enabled;
    /// reaching the alarm value clears the counter and latches the pending
    /// interrupt, like the hardware's auto-clear-on-alarm.
    pub fn advance(&self, counts: u64) {
        let mut state = self.state.lock().expect("sim state poisoned");
        state.wall += counts;
        if !state.enabled {
            return;
        }
        for _ in 0..counts {
            state.counter = if state.counter == state.counter_max {
                0
            } else {
                state.counter + 1
            };
            // Fires on reaching the compare value; >= so an alarm written
            // behind the current count produces a prompt fire instead of a
            // full counter wrap.
            if state.counter >= state.alarm && state.alarm != 0 {
                state.counter = 0;
                state.pending = true;
                state.fired += 1;
                state.ops.push(SimOp::Fire);
            }
        }
    }

    /// Total wall counts elapsed, including time spent stopped.
    pub fn wall(&self) -> u64 {
        self.state.lock().expect("sim state poisoned").wall
    }

    pub fn fired(&self) -> u64 {
        self.state.lock().expect("sim state poisoned").fired
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().expect("sim state poisoned").enabled
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().expect("sim state poisoned").pending
    }

    pub fn alarm(&self) -> u32 {
        self.state.lock().expect("sim state poisoned").alarm
    }

    /// Every value ever written to the compare register, oldest first.
    pub fn alarm_writes(&self) -> Vec<u32> {
        self.state.lock().expect("sim state poisoned").alarm_writes.clone()
    }

    /// Chronological operation log.
    pub fn ops(&self) -> Vec<SimOp> {
        self.state.lock().expect("sim state poisoned").ops.clone()
    }

    /// Number of register accesses that landed inside a transition window.
    ///
    /// A correct client always sees zero: `enable`/`disable` do not return
    /// until the transition is committed.
    pub fn transition_violations(&self) -> usize {
        let ops = self.ops();
        let mut in_transition = false;
        let mut violations = 0;
        for op in ops {
            match op {
                SimOp::TransitionBegin => in_transition = true,
                SimOp::TransitionEnd => in_transition = false,
                SimOp::SetAlarm(_) | SimOp::ReadCounter(_) | SimOp::ClearPending => {
                    if in_transition {
                        violations += 1;
                    }
                }
                SimOp::Fire => {}
            }
        }
        violations
    }

    fn transition(&self, enabled: bool) {
        let mut state = self.state.lock().expect("sim state poisoned");
        assert!(state.configured, "alarm timer used before configure");
        state.ops.push(SimOp::TransitionBegin);
        // The busy-wait brackets the toggle; wall time passes while the
        // counter is not advancing.
        state.wall += state.transition_penalty;
        state.enabled = enabled;
        state.ops.push(SimOp::TransitionEnd);
    }
}

impl Default for SimAlarmTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmTimer for SimAlarmTimer {
    fn configure(&self, config: &AlarmConfig) -> HatResult<()> {
        let mut state = self.state.lock().expect("sim state poisoned");
        if !state.osc_ready {
            return Err(HatError::ClockNotReady);
        }
        if config.prescale > 31 {
            return Err(HatError::InvalidConfig);
        }
        if state.configured {
            return Err(HatError::AlreadyConfigured);
        }
        state.configured = true;
        state.counter = 0;
        state.alarm = 0;
        state.pending = false;
        Ok(())
    }

    fn set_alarm(&self, value: u32) {
        let mut state = self.state.lock().expect("sim state poisoned");
        assert!(state.configured, "alarm timer used before configure");
        state.alarm = value;
        state.alarm_writes.push(value);
        state.ops.push(SimOp::SetAlarm(value));
    }

    fn read_counter(&self) -> u32 {
        let mut state = self.state.lock().expect("sim state poisoned");
        let counter = state.counter;
        state.ops.push(SimOp::ReadCounter(counter));
        counter
    }

    fn enable(&self) {
        self.transition(true);
    }

    fn disable(&self) {
        self.transition(false);
    }

    fn clear_pending(&self) {
        let mut state = self.state.lock().expect("sim state poisoned");
        state.pending = false;
        state.ops.push(SimOp::ClearPending);
    }

    fn counter_max(&self) -> u32 {
        self.state.lock().expect("sim state poisoned").counter_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> SimAlarmTimer {
        let sim = SimAlarmTimer::new();
        sim.configure(&AlarmConfig::default()).expect("configure");
        sim
    }

    #[test]
    fn auto_clears_and_latches_pending_on_alarm() {
        let sim = configured();
        sim.set_alarm(100);
        sim.enable();

        sim.advance(99);
        assert!(!sim.is_pending());
        assert_eq!(sim.read_counter(), 99);

        sim.advance(1);
        assert!(sim.is_pending());
        assert_eq!(sim.read_counter(), 0, "counter auto-clears on alarm");
        assert_eq!(sim.fired(), 1);

        sim.clear_pending();
        sim.advance(100);
        assert_eq!(sim.fired(), 2, "re-fires every period with no re-arm");
    }

    #[test]
    fn counter_frozen_while_disabled_but_wall_time_flows() {
        let sim = configured();
        sim.set_alarm(1000);
        sim.enable();
        sim.advance(10);
        sim.disable();
        sim.advance(50);
        assert_eq!(sim.read_counter(), 10);
        assert_eq!(sim.wall(), 60);
    }

    #[test]
    fn transition_penalty_charges_wall_time() {
        let sim = SimAlarmTimer::new().with_transition_penalty(3);
        sim.configure(&AlarmConfig::default()).expect("configure");
        sim.enable();
        sim.disable();
        assert_eq!(sim.wall(), 6);
    }

    #[test]
    fn dead_oscillator_fails_configure() {
        let sim = SimAlarmTimer::new().with_dead_oscillator();
        assert_eq!(
            sim.configure(&AlarmConfig::default()),
            Err(HatError::ClockNotReady)
        );
    }

    #[test]
    fn reconfigure_is_rejected() {
        let sim = configured();
        assert_eq!(
            sim.configure(&AlarmConfig::default()),
            Err(HatError::AlreadyConfigured)
        );
    }

    #[test]
    fn register_ops_stay_outside_transition_windows() {
        let sim = configured();
        sim.set_alarm(10);
        sim.enable();
        sim.advance(4);
        let _ = sim.read_counter();
        sim.disable();
        sim.enable();
        assert_eq!(sim.transition_violations(), 0);
        assert!(sim.ops().contains(&SimOp::SetAlarm(10)));
    }
}
