//! Process-wide failure logging toggle.
//!
//! Failed compress calls are always reported to the caller as errors. When
//! the toggle is on they are additionally logged through the `log` facade at
//! `error` level on the [`TARGET`] target. The toggle starts disabled.
//!
//! The flag is a relaxed [`AtomicBool`]: it carries no data dependencies, so
//! concurrent callers only ever race on which setting they observe.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

/// Log target used for failure reports.
pub const TARGET: &str = "image_compress";

static ENABLED: AtomicBool = AtomicBool::new(false);

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Log a failed operation if the toggle is on.
///
/// Never fails: with no logger installed the record is simply dropped.
pub fn report_failure(operation: &str, error: &dyn Display) {
    if is_enabled() {
        log::error!(target: TARGET, "Error compressing image ({operation}): {error}");
    }
}

/// Serializes tests that flip the global toggle.
#[cfg(test)]
pub(crate) static TOGGLE_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
