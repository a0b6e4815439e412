//! Configuration for the ledger

use crate::types::{balance_serde, parse_balance, Address, Balance};
use serde::{Deserialize, Serialize};

/// First account of the local development chain; deploys by default
pub const DEFAULT_OWNER: Address = Address::from_bytes([
    0x54, 0x09, 0xed, 0x02, 0x1d, 0x92, 0x99, 0xbf, 0x68, 0x14, 0x27, 0x9a, 0x6a, 0x14, 0x11,
    0xa7, 0xe8, 0x66, 0xa6, 0x31,
]);

/// Supply minted at genesis unless configured otherwise
pub const DEFAULT_INITIAL_SUPPLY: u64 = 10_000;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Genesis parameters
    pub genesis: GenesisConfig,

    /// Actor configuration
    pub actor: ActorConfig,

    /// Event log configuration
    pub event_log: EventLogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "metacoin".to_string(),
            genesis: GenesisConfig::default(),
            actor: ActorConfig::default(),
            event_log: EventLogConfig::default(),
        }
    }
}

/// Genesis parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Account credited with the whole supply
    pub owner: Address,

    /// Supply minted at genesis
    #[serde(with = "balance_serde")]
    pub initial_supply: Balance,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER,
            initial_supply: Balance::from(DEFAULT_INITIAL_SUPPLY),
        }
    }
}

/// Actor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Mailbox capacity (messages)
    pub mailbox_capacity: usize,

    /// Transfer event broadcast capacity (events)
    pub event_channel_capacity: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1000,       // Bounded for backpressure
            event_channel_capacity: 1000,
        }
    }
}

/// Event log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogConfig {
    /// Keep every transfer event in the ledger
    pub enabled: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(owner) = std::env::var("METACOIN_OWNER") {
            config.genesis.owner = owner.parse()?;
        }

        if let Ok(supply) = std::env::var("METACOIN_INITIAL_SUPPLY") {
            config.genesis.initial_supply = parse_balance(&supply)?;
        }

        if let Ok(capacity) = std::env::var("METACOIN_MAILBOX_CAPACITY") {
            config.actor.mailbox_capacity = capacity.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid METACOIN_MAILBOX_CAPACITY: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values the channels cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.actor.mailbox_capacity == 0 {
            return Err(crate::Error::Config(
                "actor.mailbox_capacity must be positive".to_string(),
            ));
        }
        if self.actor.event_channel_capacity == 0 {
            return Err(crate::Error::Config(
                "actor.event_channel_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
