use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_LOG_FILE: &str = "vctally.log";

/// Bot configuration, read once at startup from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord_token: String,
    /// The single guild this bot serves. Voice events from other guilds
    /// are ignored and slash commands are registered here only.
    pub guild_id: u64,
    /// Role checked by `/amikool`.
    pub cool_role_id: u64,
    pub database_path: String,
    /// Voice channels in which time is never tracked.
    #[serde(default)]
    pub excluded_channels: Vec<u64>,
    /// Channel receiving online/shutting-down notices.
    pub admin_channel_id: u64,
    #[serde(default)]
    pub log_file: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        Ok(config)
    }

    pub fn log_file(&self) -> &str {
        self.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE)
    }

    pub fn is_channel_excluded(&self, channel_id: u64) -> bool {
        self.excluded_channels.contains(&channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
discord_token = "token-here"
guild_id = 123456789012345678
cool_role_id = 234567890123456789
database_path = "data/vctally.db"
excluded_channels = [345678901234567890]
admin_channel_id = 456789012345678901
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.guild_id, 123456789012345678);
        assert_eq!(config.excluded_channels.len(), 1);
        assert!(config.is_channel_excluded(345678901234567890));
        assert!(!config.is_channel_excluded(1));
        assert_eq!(config.log_file(), "vctally.log");
    }

    #[test]
    fn test_excluded_channels_default_to_empty() {
        let without = SAMPLE.replace("excluded_channels = [345678901234567890]\n", "");
        let config: Config = toml::from_str(&without).unwrap();
        assert!(config.excluded_channels.is_empty());
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let without = SAMPLE.replace("discord_token = \"token-here\"\n", "");
        assert!(toml::from_str::<Config>(&without).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
