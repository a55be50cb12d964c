//! Layered run configuration.
//!
//! Settings are merged with figment, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. Environment variables prefixed `DUPEFIND_` (e.g. `DUPEFIND_MIN_SIZE=4096`)
//! 3. Command-line flags that were actually given ([`CliOverrides`])

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::duplicates::FinderConfig;
use crate::scanner::WalkerConfig;

/// Prefix for environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "DUPEFIND_";

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files smaller than this many bytes are not considered.
    pub min_size: u64,
    /// Skip entries whose name starts with `.`.
    pub skip_hidden: bool,
    /// Traverse symbolic links as their targets; on unless turned off.
    pub follow_symlinks: bool,
    /// Threads hashing files; 1 hashes on the calling thread.
    pub hash_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: 0,
            skip_hidden: false,
            follow_symlinks: true,
            hash_threads: 1,
        }
    }
}

/// Command-line values layered on top of defaults and environment.
///
/// Unset fields are left out when serialized, so they never mask a lower layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_threads: Option<usize>,
}

impl Config {
    /// The merged provider stack, before extraction.
    #[must_use]
    pub fn figment(overrides: &CliOverrides) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    /// Load the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns the figment error when an environment value has the wrong type
    /// (e.g. `DUPEFIND_HASH_THREADS=many`).
    pub fn load(overrides: &CliOverrides) -> Result<Self, figment::Error> {
        let config: Config = Self::figment(overrides).extract()?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        if self.hash_threads == 0 {
            log::debug!("hash_threads = 0 raised to 1");
            self.hash_threads = 1;
        }
        self
    }

    /// Traversal settings.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.follow_symlinks, self.skip_hidden, self.min_size)
    }

    /// Grouping settings, without a progress callback.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default().with_hash_threads(self.hash_threads)
    }
}
