// config.rs
// Purpose: bot configuration. Defaults, then clearance.toml, then CLEARANCE_* env.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::errors::{ClearanceError, ClearanceResult};

pub const DEFAULT_CONFIG_FILE: &str = "clearance.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default, deserialize_with = "credential")]
    pub token: String,
    #[serde(default, deserialize_with = "credential")]
    pub client_id: String,
    #[serde(default, deserialize_with = "credential")]
    pub guild_id: String,
    /// Total typed-reveal time in milliseconds.
    pub reveal_ms: u64,
    pub log_level: String,
}

#[derive(Serialize)]
struct BotConfigDefaults {
    reveal_ms: u64,
    log_level: String,
}

impl Default for BotConfigDefaults {
    fn default() -> Self {
        Self {
            reveal_ms: 300,
            log_level: "info".into(),
        }
    }
}

/// Env values are typed by figment, so an all-digit snowflake such as
/// `CLEARANCE_GUILD_ID=123456789012345678` arrives as an integer.
fn credential<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct CredentialVisitor;

    impl<'de> Visitor<'de> for CredentialVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or an integer id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(CredentialVisitor)
}

impl BotConfig {
    pub fn reveal(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    /// Credentials and identifiers must all be present and non-blank.
    pub fn validate(&self) -> ClearanceResult<()> {
        for (field, value) in [
            ("token", &self.token),
            ("client_id", &self.client_id),
            ("guild_id", &self.guild_id),
        ] {
            if value.trim().is_empty() {
                return Err(ClearanceError::config(format!("{field} must be set")));
            }
        }
        Ok(())
    }

    /// Token with all but the last four characters masked.
    pub fn redacted_token(&self) -> String {
        let visible: String = self
            .token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{visible}")
    }
}

fn figment_for(path: &Path) -> Figment {
    Figment::from(Serialized::defaults(BotConfigDefaults::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CLEARANCE_"))
}

/// Load without checking credentials. Used by offline tooling.
pub fn load_unchecked(path: Option<&Path>) -> ClearanceResult<BotConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    Ok(figment_for(path).extract()?)
}

/// Load and validate. A missing credential is fatal at startup.
pub fn load_config(path: Option<&Path>) -> ClearanceResult<BotConfig> {
    let config = load_unchecked(path)?;
    config.validate()?;
    Ok(config)
}
