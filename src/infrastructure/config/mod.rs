//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::application::messaging::dispatcher::DEFAULT_DEDUP_WINDOW;
use crate::application::services::identity::MAX_IDENTITY_BATCH;
use crate::infrastructure::llm::LLMConfig;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub game: GameConfig,
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub llm: LLMConfig,
    pub http: HttpConfig,
    pub dispatcher: DispatcherConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    /// The bot's own inbox id on the messaging network
    pub inbox_id: Option<String>,
    pub sigil: String,
    pub keyword: String,
    /// Extra base keywords accepted after the sigil
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GameConfig {
    pub base_url: Option<String>,
    /// Shared secret sent as the `authorization` header
    pub agent_secret: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DirectoryConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_batch: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    pub enabled: bool,
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DispatcherConfig {
    pub dedup_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "squabble-bot".to_string(),
                inbox_id: None,
                sigil: "/".to_string(),
                keyword: "squabble".to_string(),
                aliases: Vec::new(),
            },
            game: GameConfig {
                base_url: None,
                agent_secret: None,
                timeout_seconds: 15,
            },
            directory: DirectoryConfig {
                base_url: "https://api.neynar.com".to_string(),
                api_key: None,
                max_batch: MAX_IDENTITY_BATCH,
                timeout_seconds: 10,
            },
            llm: LLMConfig::default(),
            http: HttpConfig {
                enabled: true,
                bind: "0.0.0.0".to_string(),
                port: 3000,
            },
            dispatcher: DispatcherConfig {
                dedup_window: DEFAULT_DEDUP_WINDOW,
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Defaults overridden by environment variables
    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables on top of the current values
    pub fn apply_env(&mut self) {
        if let Ok(inbox_id) = std::env::var("AGENT_INBOX_ID") {
            self.bot.inbox_id = Some(inbox_id);
        }
        if let Ok(keyword) = std::env::var("BOT_KEYWORD") {
            self.bot.keyword = keyword;
        }
        if let Ok(url) = std::env::var("SQUABBLE_URL") {
            self.game.base_url = Some(url);
        }
        if let Ok(secret) = std::env::var("AGENT_SECRET") {
            self.game.agent_secret = Some(secret);
        }
        if let Ok(key) = std::env::var("NEYNAR_API_KEY") {
            self.directory.api_key = Some(key);
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse() {
                self.http.port = p;
            }
        }
        self.llm.apply_env();
    }

    /// Reject configurations the bot cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.inbox_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
            return Err(ConfigError::MissingField("bot.inbox-id".to_string()));
        }
        if self.bot.keyword.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.keyword must not be empty".to_string()));
        }
        if self.bot.sigil.is_empty() {
            return Err(ConfigError::InvalidValue("bot.sigil must not be empty".to_string()));
        }
        if self.game.base_url.as_deref().map_or(true, |s| s.trim().is_empty()) {
            return Err(ConfigError::MissingField("game.base-url".to_string()));
        }
        if self.game.agent_secret.as_deref().map_or(true, |s| s.trim().is_empty()) {
            return Err(ConfigError::MissingField("game.agent-secret".to_string()));
        }
        if self.directory.api_key.as_deref().map_or(true, |s| s.trim().is_empty()) {
            return Err(ConfigError::MissingField("directory.api-key".to_string()));
        }
        if self.directory.max_batch == 0 || self.directory.max_batch > MAX_IDENTITY_BATCH {
            return Err(ConfigError::InvalidValue(format!(
                "directory.max-batch must be between 1 and {}",
                MAX_IDENTITY_BATCH
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.bot.inbox_id = Some("bot-inbox".to_string());
        config.game.base_url = Some("https://squabble.lol".to_string());
        config.game.agent_secret = Some("shh".to_string());
        config.directory.api_key = Some("neynar-key".to_string());
        config
    }

    #[test]
    fn default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&valid()).unwrap();
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.bot.keyword, "squabble");
        assert_eq!(parsed.directory.max_batch, MAX_IDENTITY_BATCH);
        assert_eq!(parsed.bot.inbox_id.as_deref(), Some("bot-inbox"));
    }

    #[test]
    fn validate_requires_inbox_and_game_url() {
        assert!(matches!(Config::default().validate(), Err(ConfigError::MissingField(_))));
        assert!(valid().validate().is_ok());

        let mut config = valid();
        config.game.base_url = Some("  ".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(f)) if f == "game.base-url"));
    }

    #[test]
    fn batch_cap_cannot_exceed_directory_limit() {
        let mut config = valid();
        config.directory.max_batch = 351;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn aliases_default_to_empty() {
        let bot: BotConfig = serde_yaml::from_str("name: bot\nsigil: /\nkeyword: squabble\n").unwrap();
        assert!(bot.aliases.is_empty());
        assert!(bot.inbox_id.is_none());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        assert!(matches!(Config::from_yaml("bot: [oops"), Err(ConfigError::Parse(_))));
    }
}
