//! Engine warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the selector compiler and the DOM layer to report input that is
//! tolerated rather than rejected.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about tolerated input (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Selector", "unknown pseudo-class ':hover' never matches");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[Wombat {component}] ⚠ {message}").yellow());
    }
}

/// Snapshot of every warning printed so far, sorted.
///
/// Each entry has the form `[component] message`.
#[must_use]
pub fn recorded_warnings() -> Vec<String> {
    let guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    let mut warnings: Vec<String> = guard
        .as_ref()
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();
    warnings.sort();
    warnings
}

/// Clear all recorded warnings (call between independent query sessions)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
