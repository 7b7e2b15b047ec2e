#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use elephant_server::config::{ConfigError, ServerConfig, ENV_CONFIG, ENV_HOST, ENV_PORT};
use elephant_server::dispatch::CallableRegistry;

/// Variables `ServerConfig::from_env` reads.
const SERVER_VARS: [&str; 3] = [ENV_CONFIG, ENV_HOST, ENV_PORT];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive view of the server's environment variables.
///
/// Creating one takes the process-wide lock and clears every server
/// variable, so a test only sees what it sets itself. Dropping it puts the
/// original values back.
pub struct ServerEnv {
    original: BTreeMap<&'static str, Option<String>>,
    _lock: MutexGuard<'static, ()>,
}

impl ServerEnv {
    pub fn clean() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let original = SERVER_VARS
            .iter()
            .map(|name| (*name, std::env::var(name).ok()))
            .collect();
        for name in SERVER_VARS {
            std::env::remove_var(name);
        }
        Self { original, _lock: lock }
    }

    pub fn config_file(self, path: &Path) -> Self {
        std::env::set_var(ENV_CONFIG, path);
        self
    }

    pub fn host(self, host: &str) -> Self {
        std::env::set_var(ENV_HOST, host);
        self
    }

    /// Raw value, so tests can pass ports that do not parse.
    pub fn port(self, port: &str) -> Self {
        std::env::set_var(ENV_PORT, port);
        self
    }

    pub fn load(&self) -> Result<ServerConfig, ConfigError> {
        ServerConfig::from_env()
    }
}

impl Drop for ServerEnv {
    fn drop(&mut self) {
        for (name, value) in &self.original {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Registry with every built-in analysis function.
pub fn builtin_registry() -> Arc<CallableRegistry> {
    Arc::new(CallableRegistry::with_builtins())
}

/// Default configuration with the given units for unspecified families.
pub fn config_with_time_unit(time: &str) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.default_units.time = Some(time.to_string());
    config
}
