//! Fatal tick-source initialization errors.
//!
//! Only initialization can fail: without a working time base the kernel has
//! no notion of elapsed time at all. Everything after initialization is
//! either a normal outcome (an aborted sleep) or a programming defect caught
//! by debug assertions; neither surfaces as a `Result`.

use hat::HatError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickSourceError {
    #[error("alarm timer hardware fault: {0}")]
    Hardware(#[from] HatError),

    #[error("tick rate must be non-zero")]
    ZeroTickRate,

    #[error("tick period computes to zero ({clock_hz} Hz clock at {tick_rate_hz} Hz tick rate)")]
    ZeroTickPeriod { clock_hz: u32, tick_rate_hz: u32 },
}
