//! Server configuration structures and loaders.
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use game_core::CombatConfig;
use runtime::RuntimeConfig;

/// Configuration required to bootstrap the combat server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Directory holding `mobs.ron`, `regions.ron` and `combat.toml`.
    pub content_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_to_file: bool,
    pub overrides: CombatOverrides,
    pub event_buffer_size: Option<usize>,
    pub connection_buffer_size: Option<usize>,
}

/// Combat tuning set through the environment; wins over `combat.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CombatOverrides {
    pub turn_timeout_secs: Option<u64>,
    pub mob_delay_min_secs: Option<u64>,
    pub mob_delay_max_secs: Option<u64>,
}

impl CombatOverrides {
    pub fn apply(&self, mut combat: CombatConfig) -> CombatConfig {
        if let Some(secs) = self.turn_timeout_secs {
            combat.turn_timeout_secs = secs.max(1);
        }
        if let Some(secs) = self.mob_delay_min_secs {
            combat.mob_delay_min_secs = secs;
        }
        if let Some(secs) = self.mob_delay_max_secs {
            combat.mob_delay_max_secs = secs;
        }
        combat
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8090)),
            content_dir: None,
            log_dir: None,
            log_to_file: false,
            overrides: CombatOverrides::default(),
            event_buffer_size: None,
            connection_buffer_size: None,
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_BIND` - Listen address (default: 127.0.0.1:8090)
    /// - `CONTENT_DIR` - Content data directory (default: built-in catalog)
    /// - `TURN_TIMEOUT_SECS` - Seconds before an automatic attack (default: 10)
    /// - `MOB_DELAY_MIN_SECS` / `MOB_DELAY_MAX_SECS` - Mob attack delay (default: 1..=4)
    /// - `EVENT_BUFFER_SIZE` - Event bus capacity per topic (default: 100)
    /// - `CONNECTION_BUFFER_SIZE` - Push messages queued per socket (default: 64)
    /// - `LOG_DIR` - Write `combat-server.log` into this directory
    /// - `LOG_TO_FILE` - Log to the platform cache dir when `LOG_DIR` is unset
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = read_var(&lookup, "COMBAT_BIND") {
            config.bind = bind;
        }
        config.content_dir = lookup("CONTENT_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        config.log_dir = lookup("LOG_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        if let Some(enable) = read_var(&lookup, "LOG_TO_FILE") {
            config.log_to_file = enable;
        } else if lookup("LOG_TO_FILE").is_some() {
            // Accept a bare `LOG_TO_FILE=` as "true"
            config.log_to_file = true;
        }

        config.overrides = CombatOverrides {
            turn_timeout_secs: read_var(&lookup, "TURN_TIMEOUT_SECS"),
            mob_delay_min_secs: read_var(&lookup, "MOB_DELAY_MIN_SECS"),
            mob_delay_max_secs: read_var(&lookup, "MOB_DELAY_MAX_SECS"),
        };
        config.event_buffer_size =
            read_var::<_, usize>(&lookup, "EVENT_BUFFER_SIZE").map(|size| size.max(1));
        config.connection_buffer_size =
            read_var::<_, usize>(&lookup, "CONNECTION_BUFFER_SIZE").map(|size| size.max(1));

        config
    }

    /// Runtime configuration on top of the combat tuning loaded from content.
    pub fn runtime_config(&self, combat: CombatConfig) -> RuntimeConfig {
        let defaults = RuntimeConfig::default();
        RuntimeConfig {
            combat: self.overrides.apply(combat),
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(defaults.event_buffer_size),
            connection_buffer_size: self
                .connection_buffer_size
                .unwrap_or(defaults.connection_buffer_size),
        }
    }

    /// Where the log file goes, if file logging is enabled at all.
    pub fn log_directory(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.log_dir {
            return Some(dir.clone());
        }
        if !self.log_to_file {
            return None;
        }
        directories::ProjectDirs::from("", "", "combat-server")
            .map(|dirs| dirs.cache_dir().join("logs"))
    }
}

fn read_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
