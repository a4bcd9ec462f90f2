use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BaristaError, Result};

/// Top-level configuration for the Barista service.
///
/// Loaded from `barista.toml` by default. Each section corresponds to one
/// component or external collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaristaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl BaristaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BaristaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Port for the HTTP API.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 4040,
            log_level: "info".to_string(),
        }
    }
}

/// Menu source and cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// URL of the structured price list. When unset, the built-in fallback
    /// menu is served.
    pub source_url: Option<String>,
    /// Staleness bound for the cached snapshot, in seconds.
    pub ttl_secs: u64,
    /// Serve an empty menu instead of the built-in fallback when the source
    /// is unreachable. Callers must tolerate an empty menu in this mode.
    pub empty_fallback: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            ttl_secs: 300,
            empty_fallback: false,
        }
    }
}

/// Language-understanding oracle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of the chat-completion endpoint.
    pub base_url: String,
    /// Model identifier passed through to the oracle.
    pub model: String,
    /// Environment variable holding the bearer token, if the oracle
    /// requires one.
    pub api_key_env: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: Some("BARISTA_ORACLE_KEY".to_string()),
        }
    }
}

/// Speech-synthesis settings. Synthesis is best-effort; failures never
/// abort a conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub enabled: bool,
    /// Base URL of the synthesis endpoint.
    pub base_url: String,
    /// Voice identifier passed through to the synthesizer.
    pub voice: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:5002".to_string(),
            voice: "en-US-counter".to_string(),
        }
    }
}

/// Conversation-session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions idle longer than this are removed by the sweeper.
    pub idle_timeout_minutes: u32,
    /// Interval between sweeper runs.
    pub sweep_interval_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: 30,
            sweep_interval_minutes: 5,
        }
    }
}

/// Order-ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path of the ledger file.
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: "data/orders.ledger".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
