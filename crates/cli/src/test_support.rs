//! Environment isolation for tests that read `AGENTBAY_*` variables.

use std::sync::{Mutex, OnceLock};

use agentbay::config::{API_KEY_ENV, ENDPOINT_ENV, REGION_ID_ENV, TIMEOUT_MS_ENV};

/// Every variable `Config::load` consults.
pub(crate) const AGENTBAY_ENV_VARS: [&str; 4] =
    [API_KEY_ENV, REGION_ID_ENV, ENDPOINT_ENV, TIMEOUT_MS_ENV];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Clears the `AGENTBAY_*` variables again when the test body ends, even on panic.
struct ClearOnDrop;

impl Drop for ClearOnDrop {
    fn drop(&mut self) {
        clear_agentbay_env();
    }
}

/// Runs `run` with only `vars` set among the `AGENTBAY_*` variables.
///
/// Holds a process-wide lock for the whole body; a previous panicking test
/// does not poison it.
pub(crate) fn with_agentbay_env<R>(vars: &[(&str, &str)], run: impl FnOnce() -> R) -> R {
    let _guard = env_lock().lock().unwrap_or_else(|e| e.into_inner());
    clear_agentbay_env();
    let _clear = ClearOnDrop;
    for (key, value) in vars {
        debug_assert!(AGENTBAY_ENV_VARS.contains(key), "{key} is not an AGENTBAY_* variable");
        // SAFETY: mutation is serialized by `env_lock`.
        unsafe {
            std::env::set_var(key, value);
        }
    }
    run()
}

fn clear_agentbay_env() {
    for key in AGENTBAY_ENV_VARS {
        // SAFETY: only called while `env_lock` is held.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agentbay_env_is_scoped_to_the_body() {
        with_agentbay_env(&[(API_KEY_ENV, "scoped-key")], || {
            assert_eq!(std::env::var(API_KEY_ENV).as_deref(), Ok("scoped-key"));
            assert!(std::env::var(REGION_ID_ENV).is_err());
        });
        with_agentbay_env(&[], || {
            for key in AGENTBAY_ENV_VARS {
                assert!(std::env::var(key).is_err(), "{key} leaked between tests");
            }
        });
    }
}
