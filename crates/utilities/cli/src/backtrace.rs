//! Helper to set the backtrace env var.

use std::sync::Once;

static INIT: Once = Once::new();

/// Sets the RUST_BACKTRACE environment variable to 1 if it is not already set.
///
/// Must be called at startup, before other threads are spawned.
pub fn enable() {
    INIT.call_once(|| {
        if std::env::var_os("RUST_BACKTRACE").is_none() {
            // SAFETY: runs once, before the runtime spawns any thread that reads the environment.
            unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
        }
    });
}
