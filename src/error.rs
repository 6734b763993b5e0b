//! Errors surfaced to the host, plus the fatal-invariant path.
//!
//! The scheduler distinguishes two tiers (see the design notes): recoverable
//! [`SchedulerError`]s the host can act on (evict objects, retry), and
//! invariant violations that indicate a corrupted arena or a caller that
//! broke the contract documented on the offending method. The latter never
//! produce a `Result` -- they log at fatal severity and panic, matching how
//! the rest of this tree treats unrecoverable kernel state.

use core::fmt;

/// Recoverable errors the host can observe and act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// `check` could not reserve room for the requested number of callouts.
    TooManyCallouts,
    /// `deadline + delay` overflowed the clock's native width.
    TooLongDelay,
    /// A restored snapshot would exceed the freshly initialized capacity.
    TooManyCalloutsRestored,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SchedulerError::TooManyCallouts => "too many callouts",
            SchedulerError::TooLongDelay => "too long a delay",
            SchedulerError::TooManyCalloutsRestored => "too many callouts restored",
        };
        f.write_str(msg)
    }
}

/// Abort on a broken invariant: arena corruption, or a `del` for a handle
/// the caller swore was live. These are bugs in the scheduler or its caller,
/// never user-triggerable, so there is nothing a `Result` would let the host
/// recover from.
macro_rules! fatal {
    ($($arg:tt)*) => {{
        crate::log::log_fatal(&format_args!($($arg)*));
        panic!($($arg)*)
    }};
}

pub(crate) use fatal;
