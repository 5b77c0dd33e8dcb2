use crate::config::{
    DEFAULT_SERVER_URL, NICKNAME_MAX_CHARS, REQUEST_TIMEOUT, SERVER_URL_ENV, SETTINGS_DIR, SETTINGS_INI_PATH,
};
use crate::gameplay::reconcile::ReconciliationMode;
use configparser::ini::Ini;
use log::{info, warn};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

// --- Identity ---

/// Supplies a default display name from whatever hosts the game.
pub trait IdentityProvider {
    fn current_name(&self) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NicknameError {
    Empty,
    TooLong,
    NotFinished,
    AlreadySet,
}

impl fmt::Display for NicknameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NicknameError::Empty => f.write_str("nickname is empty"),
            NicknameError::TooLong => write!(f, "nickname is longer than {NICKNAME_MAX_CHARS} characters"),
            NicknameError::NotFinished => f.write_str("the game is not finished yet"),
            NicknameError::AlreadySet => f.write_str("a nickname was already chosen for this game"),
        }
    }
}

impl Error for NicknameError {}

pub fn validate_nickname(raw: &str) -> Result<String, NicknameError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NicknameError::Empty);
    }
    if trimmed.chars().count() > NICKNAME_MAX_CHARS {
        return Err(NicknameError::TooLong);
    }
    Ok(trimmed.to_string())
}

// --- Settings ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub show_percentile: bool,
    pub reconciliation: ReconciliationMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            show_percentile: true,
            reconciliation: ReconciliationMode::PromptHighestDefault,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub server_url: String,
    pub timeout: Duration,
    pub engine: EngineConfig,
    pub username: String,
    pub first_name: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            engine: EngineConfig::default(),
            username: "".to_string(),
            first_name: "".to_string(),
        }
    }
}

/// Username first, then first name; blank values count as absent.
impl IdentityProvider for Profile {
    fn current_name(&self) -> Option<String> {
        [&self.username, &self.first_name]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

fn default_ini() -> Ini {
    let defaults = Profile::default();
    let mut conf = Ini::new();
    conf.set("Server", "BaseUrl", Some(defaults.server_url));
    conf.set("Server", "TimeoutSeconds", Some(defaults.timeout.as_secs().to_string()));
    conf.set("Game", "ShowPercentile", Some("1".to_string()));
    conf.set("Game", "ReconciliationMode", Some(defaults.engine.reconciliation.as_str().to_string()));
    conf.set("Player", "Username", Some("".to_string()));
    conf.set("Player", "FirstName", Some("".to_string()));
    conf
}

fn create_default_file() -> Result<(), std::io::Error> {
    info!("Settings file not found, creating defaults in '{}'.", SETTINGS_INI_PATH);
    fs::create_dir_all(SETTINGS_DIR)?;
    default_ini().write(SETTINGS_INI_PATH)
}

/// Builds a profile from parsed settings. Missing or malformed keys keep their defaults.
pub fn from_ini(conf: &Ini) -> Profile {
    let mut profile = Profile::default();

    if let Some(url) = conf.get("Server", "BaseUrl").filter(|v| !v.trim().is_empty()) {
        profile.server_url = url.trim().to_string();
    }
    if let Some(raw) = conf.get("Server", "TimeoutSeconds") {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => profile.timeout = Duration::from_secs(secs),
            _ => warn!("Invalid TimeoutSeconds '{}', using {:?}.", raw, profile.timeout),
        }
    }
    if let Some(raw) = conf.get("Game", "ShowPercentile") {
        match raw.trim().parse::<u8>() {
            Ok(v) => profile.engine.show_percentile = v != 0,
            Err(_) => warn!("Invalid ShowPercentile '{}', keeping default.", raw),
        }
    }
    if let Some(raw) = conf.get("Game", "ReconciliationMode") {
        match raw.parse::<ReconciliationMode>() {
            Ok(mode) => profile.engine.reconciliation = mode,
            Err(e) => warn!("{}, using '{}'.", e, profile.engine.reconciliation.as_str()),
        }
    }
    profile.username = conf.get("Player", "Username").unwrap_or_default();
    profile.first_name = conf.get("Player", "FirstName").unwrap_or_default();

    profile
}

/// Loads `save/settings.ini`, creating it on first run. Never fails; falls back to defaults.
pub fn load() -> Profile {
    if !Path::new(SETTINGS_INI_PATH).exists() {
        if let Err(e) = create_default_file() {
            warn!("Failed to create default settings file: {}", e);
        }
    }

    let mut conf = Ini::new();
    let mut profile = match conf.load(SETTINGS_INI_PATH) {
        Ok(_) => from_ini(&conf),
        Err(e) => {
            warn!("Failed to load '{}' ({}), using defaults.", SETTINGS_INI_PATH, e);
            Profile::default()
        }
    };

    if let Ok(url) = std::env::var(SERVER_URL_ENV) {
        if !url.trim().is_empty() {
            info!("Server URL overridden by {}.", SERVER_URL_ENV);
            profile.server_url = url.trim().to_string();
        }
    }

    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Profile {
        let mut conf = Ini::new();
        conf.read(text.to_string()).unwrap();
        from_ini(&conf)
    }

    #[test]
    fn nickname_is_trimmed_and_bounded() {
        assert_eq!(validate_nickname("  ann  "), Ok("ann".to_string()));
        assert_eq!(validate_nickname(" \t "), Err(NicknameError::Empty));
        assert_eq!(validate_nickname(&"x".repeat(64)), Ok("x".repeat(64)));
        assert_eq!(validate_nickname(&"x".repeat(65)), Err(NicknameError::TooLong));
        // counted in characters, not bytes
        assert!(validate_nickname(&"ё".repeat(64)).is_ok());
    }

    #[test]
    fn full_settings_file() {
        let profile = parse(
            "[Server]\nBaseUrl = https://colors.example.org/\nTimeoutSeconds = 3\n\
             [Game]\nShowPercentile = 0\nReconciliationMode = auto-keep-active\n\
             [Player]\nUsername = \nFirstName = Ann\n",
        );
        assert_eq!(profile.server_url, "https://colors.example.org/");
        assert_eq!(profile.timeout, Duration::from_secs(3));
        assert!(!profile.engine.show_percentile);
        assert_eq!(profile.engine.reconciliation, ReconciliationMode::AutoKeepActive);
        assert_eq!(profile.current_name(), Some("Ann".to_string()));
    }

    #[test]
    fn malformed_values_keep_defaults() {
        let profile = parse("[Server]\nTimeoutSeconds = soon\n[Game]\nShowPercentile = yes\nReconciliationMode = coin-flip\n");
        let defaults = Profile::default();
        assert_eq!(profile.timeout, defaults.timeout);
        assert_eq!(profile.engine, defaults.engine);
        assert_eq!(profile.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn generated_defaults_round_trip() {
        let text = default_ini().writes();
        assert_eq!(parse(&text), Profile::default());
    }

    #[test]
    fn identity_prefers_username() {
        let mut profile = Profile::default();
        assert_eq!(profile.current_name(), None);
        profile.first_name = "Ann".into();
        profile.username = "  ann_k ".into();
        assert_eq!(profile.current_name(), Some("ann_k".to_string()));
    }
}
