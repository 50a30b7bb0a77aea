/// Core error type for the tally bot.
///
/// Adapter crates map their client errors into this type so the core can tell
/// a retryable failure (`Transient`) from a permanent one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("transient error: {0}")]
    Transient(String),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transient(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
