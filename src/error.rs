use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown strategy '{0}', expected one of: baldwin-optimum, culbertson, mimicdealer")]
    UnknownStrategy(String),

    #[error("Invalid dealer up card {0}! It must be in [1, 10]")]
    InvalidUpCard(u8),

    #[error("Invalid deck: {0}")]
    InvalidDeck(String),
}
