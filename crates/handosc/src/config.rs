//! # Tracker Configuration
//!
//! Loaded once at startup from TOML. Every field is optional in the file;
//! missing fields take their defaults.
//!
//! ```toml
//! port = 12345
//! bind_address = "0.0.0.0"
//! tick_rate = 60
//! threaded = true
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use handosc_networking::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_DATAGRAMS_PER_TICK, DEFAULT_PORT, DEFAULT_TICK_RATE,
};

/// Errors raised while loading or validating a [`TrackerConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `bind_address` is not an IP address.
    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Runtime settings for the receiver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// UDP port to listen on.
    pub port: u16,
    /// Interface to bind.
    pub bind_address: String,
    /// Ticks per second.
    pub tick_rate: u32,
    /// Cap on datagrams read per tick by the polled receiver.
    pub max_datagrams_per_tick: usize,
    /// Channel capacity of the threaded receiver.
    pub channel_capacity: usize,
    /// Receive on a dedicated I/O thread instead of polling.
    pub threaded: bool,
    /// Edge length of the per-hand wireframe cube.
    pub hand_mesh_scale: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: "0.0.0.0".to_string(),
            tick_rate: DEFAULT_TICK_RATE,
            max_datagrams_per_tick: DEFAULT_MAX_DATAGRAMS_PER_TICK,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            threaded: false,
            hand_mesh_scale: 100.0,
        }
    }
}

impl TrackerConfig {
    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the receiver cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be at least 1".into()));
        }
        if self.max_datagrams_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "max_datagrams_per_tick must be at least 1".into(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be at least 1".into()));
        }
        if !(self.hand_mesh_scale.is_finite() && self.hand_mesh_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hand_mesh_scale must be positive, got {}",
                self.hand_mesh_scale
            )));
        }
        self.socket_addr().map(|_| ())
    }

    /// Address to bind, from `bind_address` and `port`.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
