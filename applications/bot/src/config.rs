/// Bot configuration
use crate::error::{BotError, Result};
use chorus_commands::BotSettings;
use chorus_core::ServiceType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "chorus.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default = "default_bot")]
    pub bot: BotSection,

    #[serde(default)]
    pub chat: ChatSection,

    #[serde(default = "default_resolver")]
    pub resolver: ResolverSection,

    #[serde(default = "default_odesli")]
    pub odesli: OdesliSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotSection {
    /// The bot's own nickname in the channel
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatSection {
    /// Channel members present at startup
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverSection {
    /// Services tried for aggregator mirrors, most preferred first
    #[serde(default = "default_mirror_priority")]
    pub mirror_priority: Vec<String>,

    /// Tracks per collection when no `-l` is given (0 = unlimited)
    #[serde(default)]
    pub default_limit: usize,

    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OdesliSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BotConfig {
    /// Load configuration from file and environment
    ///
    /// Reads `path` (which must exist) or `chorus.toml` (if present), then
    /// applies `CHORUS_`-prefixed environment overrides such as
    /// `CHORUS_BOT__NAME` or `CHORUS_ODESLI__TIMEOUT_SECS`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CHORUS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.bot.name.trim().is_empty() {
            return Err(BotError::Config(
                "Bot name is required (set CHORUS_BOT__NAME)".to_string(),
            ));
        }
        if self.bot.command_prefix.is_empty() {
            return Err(BotError::Config("Command prefix cannot be empty".to_string()));
        }
        if self.mirror_priority()?.is_empty() {
            return Err(BotError::Config(
                "resolver.mirror_priority needs at least one service".to_string(),
            ));
        }
        if url::Url::parse(&self.odesli.api_url).is_err() {
            return Err(BotError::Config(format!(
                "Invalid Odesli API url: {}",
                self.odesli.api_url
            )));
        }
        if self.odesli.timeout_secs == 0 {
            return Err(BotError::Config("odesli.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Parsed mirror priority; only services hosting playable content
    pub fn mirror_priority(&self) -> Result<Vec<ServiceType>> {
        self.resolver
            .mirror_priority
            .iter()
            .map(|name| match name.parse::<ServiceType>() {
                Ok(service) if ServiceType::PLAYABLE.contains(&service) => Ok(service),
                Ok(service) => Err(BotError::Config(format!(
                    "{service} cannot be a mirror service"
                ))),
                Err(e) => Err(BotError::Config(e)),
            })
            .collect()
    }

    /// Settings handed to the command executor
    pub fn executor_settings(&self) -> BotSettings {
        BotSettings {
            bot_name: self.bot.name.clone(),
            default_limit: self.resolver.default_limit,
            search_limit: self.resolver.search_limit,
        }
    }
}

// Default values
fn default_bot() -> BotSection {
    BotSection {
        name: default_name(),
        command_prefix: default_command_prefix(),
    }
}

fn default_name() -> String {
    "chorus".to_string()
}

fn default_command_prefix() -> String {
    "%".to_string()
}

fn default_resolver() -> ResolverSection {
    ResolverSection {
        mirror_priority: default_mirror_priority(),
        default_limit: 0,
        search_limit: default_search_limit(),
    }
}

fn default_mirror_priority() -> Vec<String> {
    ["spotify", "soundcloud", "youtube", "bandcamp", "apple_music"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_search_limit() -> usize {
    5
}

fn default_odesli() -> OdesliSection {
    OdesliSection {
        api_url: default_api_url(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_api_url() -> String {
    "https://api.song.link/v1-alpha.1/links".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot: default_bot(),
            chat: ChatSection::default(),
            resolver: default_resolver(),
            odesli: default_odesli(),
        }
    }
}
