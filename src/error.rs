use thiserror::Error;

/// Failures of the one-time registration handshake with the auctioneer.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("registration rejected: {0}")]
    Rejected(String),

    #[error("malformed registration response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Everything that can stop the bidder before it starts serving.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid arguments: {0}")]
    Validation(String),

    #[error("Can't register with auctioneer: {0}")]
    Registration(#[from] RegistrationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StartupError>;
