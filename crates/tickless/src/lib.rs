//! # tickless
//!
//! Tick management for a preemptive real-time kernel with tickless idle:
//! instead of waking once per tick, the hardware alarm is reprogrammed to
//! fire after an arbitrary number of tick periods so the processor can sleep
//! across the whole idle window, and the kernel's tick count is reconciled
//! with however much real time actually elapsed — including sleeps aborted
//! early by unrelated interrupts.
//!
//! ## Module Overview
//! - [`config`]     – Tick source configuration and derived time base.
//! - [`critical`]   – Scoped interrupt-mask critical sections.
//! - [`kernel`]     – Interface consumed from the scheduler/kernel.
//! - [`sleep`]      – Sleep depth selection and pre/post-sleep hooks.
//! - [`isr`]        – Normal-rate tick interrupt handler.
//! - [`controller`] – The idle suppression algorithm.
//! - [`source`]     – Strategy selection between tickless and periodic
//!                    tick sources.
//!
//! The hardware alarm itself lives behind the [`hat::AlarmTimer`] capability.

pub mod config;
pub mod controller;
pub mod critical;
pub mod error;
pub mod isr;
pub mod kernel;
pub mod sleep;
pub mod source;
pub mod sync;

pub use config::{TickConfig, TickConfigBuilder, TickMode, Timebase};
pub use controller::{TicklessBuilder, TicklessController};
pub use critical::{InterruptMask, MaskGuard, NullMask};
pub use error::TickSourceError;
pub use isr::TickInterruptHandler;
pub use kernel::{KernelTickOps, SleepDecision};
pub use sleep::{NoopHooks, SleepDepth, SleepHooks, SleepManager, StayAwake};
pub use source::{PeriodicTickSource, TickSource};

/// Logical kernel time, in whole tick periods.
pub type Ticks = u32;
