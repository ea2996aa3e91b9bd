//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Browser-like User-Agent; many sites refuse the default reqwest one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";

/// Top-level bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot name for identification in logs.
    pub name: String,
    /// Dialogue sessions idle for this long are pruned.
    pub session_idle_timeout: Duration,
    pub fetch: FetchConfig,
    pub lexicon: LexiconConfig,
    /// Optional directory for a daily-rolling log file.
    pub log_dir: Option<PathBuf>,
    /// Telegram is enabled only when a bot token is configured.
    pub telegram: Option<TelegramConfig>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "keyword-bot".to_string(),
            session_idle_timeout: Duration::from_secs(3600), // 1 hour
            fetch: FetchConfig::default(),
            lexicon: LexiconConfig::default(),
            log_dir: None,
            telegram: None,
        }
    }
}

impl BotConfig {
    /// Build the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let name = std::env::var("KEYWORD_BOT_NAME").unwrap_or(defaults.name);

        let session_idle_timeout = Duration::from_secs(env_parse(
            "KEYWORD_BOT_SESSION_IDLE_SECS",
            defaults.session_idle_timeout.as_secs(),
        )?);

        let fetch = FetchConfig {
            timeout: Duration::from_secs(env_parse(
                "KEYWORD_BOT_FETCH_TIMEOUT_SECS",
                defaults.fetch.timeout.as_secs(),
            )?),
            user_agent: std::env::var("KEYWORD_BOT_USER_AGENT")
                .unwrap_or(defaults.fetch.user_agent),
        };
        if fetch.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "KEYWORD_BOT_FETCH_TIMEOUT_SECS".into(),
                message: "timeout must be at least one second".into(),
            });
        }

        let lexicon = LexiconConfig {
            wordnet_dir: env_path("WORDNET_DIR"),
            thesaurus_path: env_path("KEYWORD_BOT_THESAURUS"),
        };

        let telegram = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(|token| TelegramConfig {
                bot_token: SecretString::from(token),
                allowed_users: parse_list(
                    &std::env::var("TELEGRAM_ALLOWED_USERS").unwrap_or_else(|_| "*".to_string()),
                ),
            });

        Ok(Self {
            name,
            session_idle_timeout,
            fetch,
            lexicon,
            log_dir: env_path("KEYWORD_BOT_LOG_DIR"),
            telegram,
        })
    }
}

/// Page fetcher settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Bound on a single page fetch; a timeout counts as a failed fetch.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Where synonyms come from. WordNet wins when both are set.
#[derive(Debug, Clone, Default)]
pub struct LexiconConfig {
    pub wordnet_dir: Option<PathBuf>,
    pub thesaurus_path: Option<PathBuf>,
}

/// Telegram Bot API settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: SecretString,
    /// Usernames or numeric ids; `*` allows everyone.
    pub allowed_users: Vec<String>,
}

fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("{raw:?}: {e}"),
                })
        }
        _ => Ok(default),
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Split a comma-separated list, dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
