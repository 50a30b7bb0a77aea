use std::{
    collections::HashMap,
    env, fmt, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{domain::Category, errors::Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";

/// Typed configuration, read once at startup and shared as `Arc<Config>`.
///
/// Keys keep their capitalised names in the file (`Token`, `TrackedReactions`,
/// `CommandPrefix`).
#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "Token", default)]
    pub token: String,

    #[serde(rename = "TrackedReactions", default)]
    pub tracked_reactions: TrackedReactions,

    #[serde(rename = "CommandPrefix", default)]
    pub command_prefix: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TrackedReactions {
    /// Reaction symbol -> category.
    #[serde(rename = "Types", default)]
    pub types: HashMap<String, Category>,

    /// Rating symbols, in display order.
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<String>,
}

impl Config {
    /// Load from `$RTB_CONFIG` (or `./config.toml`), then apply `DISCORD_TOKEN`.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let path = env_str("RTB_CONFIG")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let raw = fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;

        let mut cfg: Config = toml::from_str(&raw)?;
        cfg.apply_token_override(env_str("DISCORD_TOKEN"));
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a TOML document. No environment lookups.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_token_override(&mut self, token: Option<String>) {
        if let Some(token) = token.and_then(non_empty) {
            self.token = token;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::Config(
                "Token is required (config file or DISCORD_TOKEN)".to_string(),
            ));
        }
        if self.command_prefix.trim().is_empty() {
            return Err(Error::Config("CommandPrefix must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn category_of(&self, symbol: &str) -> Option<Category> {
        self.tracked_reactions.types.get(symbol).copied()
    }

    pub fn ratings(&self) -> &[String] {
        &self.tracked_reactions.ratings
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("tracked_reactions", &self.tracked_reactions)
            .field("command_prefix", &self.command_prefix)
            .finish()
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}
