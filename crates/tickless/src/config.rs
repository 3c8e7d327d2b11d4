//! Tick source configuration and the derived time base.

use hat::{AlarmConfig, ClockSource};

use crate::error::TickSourceError;
use crate::Ticks;

/// Which tick-source strategy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// Suppress ticks across idle windows and sleep through them.
    Tickless,
    /// Plain fixed-rate tick; idle requests are ignored.
    Periodic,
}

/// Static configuration for the tick source.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Frequency of the alarm counter after prescaling.
    pub timer_clock_hz: u32,
    /// Kernel tick rate.
    pub tick_rate_hz: u32,
    pub clock: ClockSource,
    pub prescale: u8,
    /// Counter increments lost to each stop/restart of the alarm timer.
    ///
    /// Empirically calibrated per platform; deliberately a plain constant
    /// rather than a value derived from clock ratios. Zero disables the
    /// compensation.
    pub stopped_timer_compensation: u32,
    /// Whether the tick interrupt pends a deferred context switch.
    pub preemptive: bool,
    pub mode: TickMode,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            timer_clock_hz: 32_768,
            tick_rate_hz: 128,
            clock: ClockSource::LowPower32k,
            prescale: 0,
            stopped_timer_compensation: 0,
            preemptive: true,
            mode: TickMode::Tickless,
        }
    }
}

impl TickConfig {
    pub fn builder() -> TickConfigBuilder {
        TickConfigBuilder::default()
    }

    pub(crate) fn alarm_config(&self) -> AlarmConfig {
        AlarmConfig {
            clock: self.clock,
            prescale: self.prescale,
        }
    }
}

/// Builder for ergonomic tick configuration construction.
#[derive(Debug, Clone, Default)]
pub struct TickConfigBuilder {
    config: TickConfig,
}

impl TickConfigBuilder {
    pub fn timer_clock_hz(mut self, hz: u32) -> Self {
        self.config.timer_clock_hz = hz;
        self
    }

    pub fn tick_rate_hz(mut self, hz: u32) -> Self {
        self.config.tick_rate_hz = hz;
        self
    }

    pub fn clock(mut self, clock: ClockSource) -> Self {
        self.config.clock = clock;
        self
    }

    pub fn prescale(mut self, prescale: u8) -> Self {
        self.config.prescale = prescale;
        self
    }

    pub fn stopped_timer_compensation(mut self, counts: u32) -> Self {
        self.config.stopped_timer_compensation = counts;
        self
    }

    pub fn preemptive(mut self, preemptive: bool) -> Self {
        self.config.preemptive = preemptive;
        self
    }

    pub fn mode(mut self, mode: TickMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn build(self) -> TickConfig {
        self.config
    }
}

/// Constants derived once at initialization, immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timebase {
    /// Counter increments per kernel tick period.
    pub tick_period: u32,
    /// Largest number of whole tick periods the compare register can hold;
    /// longer idle requests are clamped to this.
    pub max_suppressible: Ticks,
    /// Counter increments pre-subtracted from the alarm to absorb
    /// stop/restart drift.
    pub compensation: u32,
}

impl Timebase {
    pub fn derive(config: &TickConfig, counter_max: u32) -> Result<Self, TickSourceError> {
        if config.tick_rate_hz == 0 {
            return Err(TickSourceError::ZeroTickRate);
        }
        let tick_period = config.timer_clock_hz / config.tick_rate_hz;
        if tick_period == 0 {
            return Err(TickSourceError::ZeroTickPeriod {
                clock_hz: config.timer_clock_hz,
                tick_rate_hz: config.tick_rate_hz,
            });
        }
        Ok(Self {
            tick_period,
            max_suppressible: counter_max / tick_period,
            compensation: config.stopped_timer_compensation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = TickConfig::builder()
            .timer_clock_hz(16_384)
            .tick_rate_hz(64)
            .stopped_timer_compensation(5)
            .preemptive(false)
            .mode(TickMode::Periodic)
            .build();
        assert_eq!(config.timer_clock_hz, 16_384);
        assert_eq!(config.tick_rate_hz, 64);
        assert_eq!(config.stopped_timer_compensation, 5);
        assert!(!config.preemptive);
        assert_eq!(config.mode, TickMode::Periodic);
    }

    #[test]
    fn timebase_derivation() {
        let config = TickConfig::builder()
            .timer_clock_hz(32_768)
            .tick_rate_hz(128)
            .build();
        let timebase = Timebase::derive(&config, u32::MAX).expect("valid timebase");
        assert_eq!(timebase.tick_period, 256);
        assert_eq!(timebase.max_suppressible, u32::MAX / 256);
        assert_eq!(timebase.compensation, 0);
    }

    #[test]
    fn zero_tick_rate_is_fatal() {
        let config = TickConfig::builder().tick_rate_hz(0).build();
        assert!(matches!(
            Timebase::derive(&config, u32::MAX),
            Err(TickSourceError::ZeroTickRate)
        ));
    }

    #[test]
    fn zero_tick_period_is_fatal() {
        let config = TickConfig::builder()
            .timer_clock_hz(100)
            .tick_rate_hz(1_000)
            .build();
        assert!(matches!(
            Timebase::derive(&config, u32::MAX),
            Err(TickSourceError::ZeroTickPeriod { .. })
        ));
    }

    #[test]
    fn small_counter_limits_suppression() {
        let config = TickConfig::builder()
            .timer_clock_hz(1_000)
            .tick_rate_hz(10)
            .build();
        let timebase = Timebase::derive(&config, 1_000).expect("valid timebase");
        assert_eq!(timebase.tick_period, 100);
        assert_eq!(timebase.max_suppressible, 10);
    }
}
