//! Configuration Module
//!
//! Process configuration loaded from environment variables, the immutable
//! cache options built once at startup, and the runtime cache configuration
//! holding the sliding-expiration toggle.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::cache::{RetryConfig, MAX_RETRIES};

// == Defaults ==
/// Default TTL applied by `set_default` when none is configured explicitly
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Maximum allowed key length in bytes
pub const DEFAULT_MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const DEFAULT_MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Max Memory Policy ==
/// What the store does when it reaches its entry limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxMemoryPolicy {
    /// Evict the least recently used key
    #[default]
    AllKeysLru,
    /// Refuse new keys
    NoEviction,
}

impl FromStr for MaxMemoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allkeys-lru" => Ok(MaxMemoryPolicy::AllKeysLru),
            "noeviction" => Ok(MaxMemoryPolicy::NoEviction),
            other => Err(format!("unsupported maxmemory policy: {}", other)),
        }
    }
}

impl fmt::Display for MaxMemoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxMemoryPolicy::AllKeysLru => f.write_str("allkeys-lru"),
            MaxMemoryPolicy::NoEviction => f.write_str("noeviction"),
        }
    }
}

// == Store Settings ==
/// Connection settings handed through to the entry store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// Database index selected on connect
    pub database: u32,
    pub max_entries: usize,
    pub max_memory_policy: MaxMemoryPolicy,
}

// Password stays out of logs.
impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("max_entries", &self.max_entries)
            .field("max_memory_policy", &self.max_memory_policy)
            .finish()
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            database: 0,
            max_entries: 1000,
            max_memory_policy: MaxMemoryPolicy::AllKeysLru,
        }
    }
}

// == Cache Options ==
/// Immutable cache settings, built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    pub default_ttl: Option<Duration>,
    pub max_key_length: usize,
    pub max_value_size: usize,
    pub sliding_expiration: bool,
    pub retry: RetryConfig,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            default_ttl: Some(Duration::from_secs(DEFAULT_TTL_SECS)),
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
            sliding_expiration: true,
            retry: RetryConfig::default(),
        }
    }
}

impl CacheOptions {
    pub fn builder() -> CacheOptionsBuilder {
        CacheOptionsBuilder::default()
    }
}

/// Builder for [`CacheOptions`].
#[derive(Debug, Clone, Default)]
pub struct CacheOptionsBuilder {
    options: CacheOptions,
}

impl CacheOptionsBuilder {
    /// Sets the TTL used by `set_default`. `None` means entries never expire.
    pub fn default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.options.default_ttl = ttl;
        self
    }

    pub fn max_key_length(mut self, len: usize) -> Self {
        self.options.max_key_length = len;
        self
    }

    pub fn max_value_size(mut self, size: usize) -> Self {
        self.options.max_value_size = size;
        self
    }

    /// Initial state of the sliding-expiration toggle.
    pub fn sliding_expiration(mut self, enabled: bool) -> Self {
        self.options.sliding_expiration = enabled;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.options.retry = retry;
        self
    }

    pub fn build(self) -> CacheOptions {
        self.options
    }
}

// == Cache Configuration ==
/// Runtime cache configuration shared by every coordinator operation.
///
/// Everything is fixed at construction except the sliding-expiration toggle,
/// which can be flipped while requests are in flight. Readers always observe
/// a whole value; concurrent readers may briefly disagree during a flip.
#[derive(Debug)]
pub struct CacheConfiguration {
    options: CacheOptions,
    sliding_expiration: AtomicBool,
}

impl CacheConfiguration {
    pub fn new(options: CacheOptions) -> Self {
        let sliding_expiration = AtomicBool::new(options.sliding_expiration);
        Self {
            options,
            sliding_expiration,
        }
    }

    pub fn enable_sliding_expiration(&self) {
        self.sliding_expiration.store(true, Ordering::Release);
    }

    pub fn disable_sliding_expiration(&self) {
        self.sliding_expiration.store(false, Ordering::Release);
    }

    /// Sets the toggle and returns the previous value.
    pub fn set_sliding_expiration(&self, enabled: bool) -> bool {
        self.sliding_expiration.swap(enabled, Ordering::AcqRel)
    }

    pub fn is_sliding_expiration_enabled(&self) -> bool {
        self.sliding_expiration.load(Ordering::Acquire)
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.options.default_ttl
    }

    pub fn max_key_length(&self) -> usize {
        self.options.max_key_length
    }

    pub fn max_value_size(&self) -> usize {
        self.options.max_value_size
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.options.retry
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }
}

impl Default for CacheConfiguration {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

// == Process Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    pub cache: CacheOptions,
    pub store: StoreSettings,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `MAX_ENTRIES` - Store capacity (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds, 0 disables (default: 300)
    /// - `MAX_KEY_LENGTH` - Key length limit in bytes (default: 256)
    /// - `MAX_VALUE_SIZE` - Value size limit in bytes (default: 1 MB)
    /// - `SLIDING_EXPIRATION` - Initial toggle value (default: true)
    /// - `RETRY_ATTEMPTS` - Automatic retries for idempotent operations (default: 3, max: 10)
    /// - `STORE_HOST`, `STORE_PORT`, `STORE_PASSWORD`, `STORE_DATABASE`,
    ///   `STORE_MAXMEMORY_POLICY` - Store connection settings
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());
        let defaults = Config::default();

        let default_ttl = match parsed("DEFAULT_TTL") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.cache.default_ttl,
        };
        let sliding_expiration = lookup("SLIDING_EXPIRATION")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.cache.sliding_expiration);
        let retry = match parsed("RETRY_ATTEMPTS") {
            Some(attempts) => {
                RetryConfig::default().with_max_retries(attempts.min(MAX_RETRIES as u64) as u32)
            }
            None => RetryConfig::default(),
        };

        let cache = CacheOptions::builder()
            .default_ttl(default_ttl)
            .max_key_length(
                parsed("MAX_KEY_LENGTH")
                    .map(|v| v as usize)
                    .unwrap_or(DEFAULT_MAX_KEY_LENGTH),
            )
            .max_value_size(
                parsed("MAX_VALUE_SIZE")
                    .map(|v| v as usize)
                    .unwrap_or(DEFAULT_MAX_VALUE_SIZE),
            )
            .sliding_expiration(sliding_expiration)
            .retry(retry)
            .build();

        let store = StoreSettings {
            host: lookup("STORE_HOST").unwrap_or(defaults.store.host),
            port: lookup("STORE_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store.port),
            password: lookup("STORE_PASSWORD").filter(|p| !p.is_empty()),
            database: lookup("STORE_DATABASE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store.database),
            max_entries: parsed("MAX_ENTRIES")
                .map(|v| v as usize)
                .unwrap_or(defaults.store.max_entries),
            max_memory_policy: lookup("STORE_MAXMEMORY_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store.max_memory_policy),
        };

        Self {
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: parsed("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            cache,
            store,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 1,
            cache: CacheOptions::default(),
            store: StoreSettings::default(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.store.max_entries, 1000);
        assert_eq!(config.cache.default_ttl, Some(Duration::from_secs(300)));
        assert_eq!(config.cache.max_key_length, 256);
        assert!(config.cache.sliding_expiration);
    }

    #[test]
    fn test_config_from_empty_lookup_uses_defaults() {
        let config = Config::from_lookup(|_| None);
        let defaults = Config::default();
        assert_eq!(config.server_port, defaults.server_port);
        assert_eq!(config.cache, defaults.cache);
        assert_eq!(config.store, defaults.store);
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "8080"),
            ("DEFAULT_TTL", "0"),
            ("SLIDING_EXPIRATION", "off"),
            ("MAX_KEY_LENGTH", "64"),
            ("RETRY_ATTEMPTS", "5"),
            ("STORE_HOST", "cache.internal"),
            ("STORE_PASSWORD", "hunter2"),
            ("STORE_DATABASE", "3"),
            ("STORE_MAXMEMORY_POLICY", "noeviction"),
        ]));

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache.default_ttl, None);
        assert!(!config.cache.sliding_expiration);
        assert_eq!(config.cache.max_key_length, 64);
        assert_eq!(config.cache.retry.max_retries, 5);
        assert_eq!(config.store.host, "cache.internal");
        assert_eq!(config.store.password.as_deref(), Some("hunter2"));
        assert_eq!(config.store.database, 3);
        assert_eq!(config.store.max_memory_policy, MaxMemoryPolicy::NoEviction);
    }

    #[test]
    fn test_retry_attempts_are_capped() {
        let config = Config::from_lookup(lookup_from(&[("RETRY_ATTEMPTS", "4294967295")]));
        assert_eq!(config.cache.retry.max_retries, MAX_RETRIES);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "not-a-port"),
            ("SLIDING_EXPIRATION", "maybe"),
            ("STORE_MAXMEMORY_POLICY", "volatile-ttl"),
        ]));
        assert_eq!(config.server_port, 3000);
        assert!(config.cache.sliding_expiration);
        assert_eq!(config.store.max_memory_policy, MaxMemoryPolicy::AllKeysLru);
    }

    #[test]
    fn test_store_settings_debug_redacts_password() {
        let settings = StoreSettings {
            password: Some("hunter2".to_string()),
            ..StoreSettings::default()
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_sliding_toggle() {
        let config = CacheConfiguration::default();
        assert!(config.is_sliding_expiration_enabled());

        config.disable_sliding_expiration();
        assert!(!config.is_sliding_expiration_enabled());

        config.enable_sliding_expiration();
        assert!(config.is_sliding_expiration_enabled());

        assert!(config.set_sliding_expiration(false));
        assert!(!config.set_sliding_expiration(true));
    }

    #[test]
    fn test_builder() {
        let options = CacheOptions::builder()
            .default_ttl(Some(Duration::from_secs(10)))
            .max_key_length(8)
            .max_value_size(16)
            .sliding_expiration(false)
            .build();
        let config = CacheConfiguration::new(options);

        assert_eq!(config.default_ttl(), Some(Duration::from_secs(10)));
        assert_eq!(config.max_key_length(), 8);
        assert_eq!(config.max_value_size(), 16);
        assert!(!config.is_sliding_expiration_enabled());
    }
}
