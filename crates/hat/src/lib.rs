//! Hardware Alarm Timer (HAT) capability layer.
//!
//! This crate provides a vendor-agnostic contract for the one hardware
//! resource the tick-management core owns: a free-running up-counter with a
//! single compare ("alarm") register and an enable bit. It can be backed by
//! a real peripheral (for example an asynchronous timer clocked from a 32 kHz
//! oscillator) or, on hosted builds, by the deterministic simulation in
//! [`sim`].

#![cfg_attr(not(feature = "std"), no_std)]

pub mod alarm;
pub mod error;

#[cfg(feature = "std")]
pub mod sim;

pub use alarm::{AlarmConfig, AlarmTimer, ClockSource};
pub use error::{HatError, HatResult};
