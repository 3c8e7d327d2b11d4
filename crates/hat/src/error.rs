//! Common error types for alarm timer operations

use core::fmt;

/// Alarm timer hardware errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HatError {
    /// The backing oscillator never became ready within the bounded wait
    ClockNotReady,
    /// Invalid configuration parameter
    InvalidConfig,
    /// Peripheral already configured
    AlreadyConfigured,
}

impl fmt::Display for HatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockNotReady => write!(f, "alarm clock source not ready"),
            Self::InvalidConfig => write!(f, "invalid alarm timer configuration"),
            Self::AlreadyConfigured => write!(f, "alarm timer already configured"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HatError {}

/// Result type for alarm timer operations
pub type HatResult<T> = Result<T, HatError>;
