use thiserror::Error;

/// Persistence failure. The underlying driver error is logged where it is
/// mapped, so callers only learn that the operation failed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("database operation failed")]
    ServerError,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("no unused referral code found after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("telegram api rejected {method}: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
