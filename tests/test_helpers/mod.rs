//! Scoped environment overrides for configuration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Guard that applies environment changes and restores them on drop.
///
/// Every `TASKBRIDGE__*` variable inherited from the outer environment is
/// cleared first so only the requested overrides are visible.
pub struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Clears `prefix`-named variables, then sets `overrides`.
    pub fn isolated(prefix: &str, overrides: &[(&str, &str)]) -> Self {
        let lock = env_lock();
        let mut previous = Vec::new();

        let inherited: Vec<OsString> = env::vars_os()
            .map(|(key, _)| key)
            .filter(|key| key.to_string_lossy().starts_with(prefix))
            .collect();
        for key in inherited {
            previous.push((key.clone(), env::var_os(&key)));
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                env::remove_var(&key);
            }
        }

        for (key, value) in overrides {
            previous.push((OsString::from(key), env::var_os(key)));
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                env::set_var(key, value);
            }
        }

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..).rev() {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(&key, &previous),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
