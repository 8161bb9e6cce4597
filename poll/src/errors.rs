use std::fmt;

use near_sdk::env::panic_str;
use near_sdk::FunctionError;

/// Contract errors. Every variant carries a stable numeric code which is
/// reported in the abort message as `Aborted: <code>`.
#[cfg_attr(not(target_arch = "wasm32"), derive(PartialEq, Debug))]
#[derive(Clone, Copy)]
pub enum PollError {
    /// Structural change requested after the poll left the `NotStarted` state.
    PollAlreadyStarted,
    InsufficientOptions,
    /// Option id outside of `1..=options_len`.
    InvalidOption,
    PollNotActive,
    AlreadyVoted,
}

impl PollError {
    pub fn code(&self) -> u8 {
        match self {
            PollError::PollAlreadyStarted => 1,
            PollError::InsufficientOptions => 2,
            PollError::InvalidOption => 3,
            PollError::PollNotActive => 4,
            PollError::AlreadyVoted => 5,
        }
    }

    /// Message the call aborts with, e.g. `Aborted: 5 (caller already voted)`.
    pub fn abort_message(&self) -> String {
        format!("Aborted: {} ({})", self.code(), self)
    }
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PollError::PollAlreadyStarted => "poll already started",
            PollError::InsufficientOptions => "poll requires at least two options",
            PollError::InvalidOption => "option not found",
            PollError::PollNotActive => "poll is not active",
            PollError::AlreadyVoted => "caller already voted",
        };
        f.write_str(msg)
    }
}

impl FunctionError for PollError {
    fn panic(&self) -> ! {
        panic_str(&self.abort_message())
    }
}
