use thiserror::Error;

/// Everything that can go wrong talking to the exchange or the notifier.
/// The polling loop reports these and carries on, there is no retryable
/// versus fatal split.
#[derive(Error, Debug)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error: http {status}: {body}")]
    Api { status: u16, body: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing credential: {0} not set in environment")]
    MissingCredential(&'static str),

    #[error("market {0} not found in exchange response")]
    MarketNotFound(String),

    #[error("bad numeric field {field}: {value:?}")]
    BadNumber { field: &'static str, value: String },

    #[error("connectivity check against {0} failed")]
    Connectivity(String),
}

pub type Result<T> = std::result::Result<T, Error>;
