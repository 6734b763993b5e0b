//! Pluggable log sink for the scheduler core.
//!
//! The scheduler is a library embedded in a host process; it has no opinion
//! on where log lines end up (serial port, ring buffer, host console). The
//! host registers a [`Logger`] once via [`init`]; until then every call is a
//! silent no-op so the scheduler never panics for want of a sink.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};
use spin::Once;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Err = 3,
    Fatal = 4,
}

/// Backwards-compatible alias: some call sites speak of a "log level" rather
/// than a severity; they're the same type.
pub type LogLevel = Severity;

pub trait Logger: Sync {
    fn log(&self, severity: Severity, args: &fmt::Arguments<'_>);
}

static LOGGER: Once<&'static dyn Logger> = Once::new();
static PANIC_MODE: AtomicU8 = AtomicU8::new(0);

/// Register the host's log sink. Idempotent: only the first call wins.
pub fn init(logger: &'static dyn Logger) {
    LOGGER.call_once(|| logger);
}

pub fn try_get_logger() -> Option<&'static dyn Logger> {
    LOGGER.get().copied()
}

/// Flip the scheduler into panic mode: subsequent fatal logs are emitted
/// even if the host's sink would normally rate-limit or buffer them.
pub fn enter_panic_mode() {
    PANIC_MODE.store(1, Ordering::SeqCst);
}

pub fn in_panic_mode() -> bool {
    PANIC_MODE.load(Ordering::SeqCst) != 0
}

pub fn log(severity: Severity, args: &fmt::Arguments<'_>) {
    if let Some(logger) = try_get_logger() {
        logger.log(severity, args);
    }
}

pub fn log_dbg(args: &fmt::Arguments<'_>) {
    log(Severity::Debug, args);
}
pub fn log_info(args: &fmt::Arguments<'_>) {
    log(Severity::Info, args);
}
pub fn log_warn(args: &fmt::Arguments<'_>) {
    log(Severity::Warn, args);
}
pub fn log_err(args: &fmt::Arguments<'_>) {
    log(Severity::Err, args);
}
pub fn log_fatal(args: &fmt::Arguments<'_>) {
    enter_panic_mode();
    log(Severity::Fatal, args);
}
