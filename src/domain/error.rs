//! Domain error types.

/// Top-level error type for papertrade.
#[derive(Debug, thiserror::Error)]
pub enum PapertradeError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("must provide {field}")]
    MissingField { field: String },

    #[error("{reason}")]
    InvalidQuantity { reason: String },

    #[error("invalid symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("not enough cash: need ${required:.2}, have ${available:.2}")]
    InsufficientCash { required: f64, available: f64 },

    #[error("not enough shares of {symbol}: asked to sell {requested}, holding {held}")]
    InsufficientShares {
        symbol: String,
        requested: f64,
        held: f64,
    },

    #[error("username already taken: {username}")]
    UsernameTaken { username: String },

    #[error("passwords must match")]
    PasswordMismatch,

    #[error("invalid username and/or password")]
    InvalidCredentials,

    #[error("password hashing error: {reason}")]
    PasswordHash { reason: String },

    #[error("quote provider error: {reason}")]
    QuoteProvider { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PapertradeError> for std::process::ExitCode {
    fn from(err: &PapertradeError) -> Self {
        let code: u8 = match err {
            PapertradeError::Io(_) => 1,
            PapertradeError::ConfigParse { .. }
            | PapertradeError::ConfigMissing { .. }
            | PapertradeError::ConfigInvalid { .. } => 2,
            PapertradeError::Database { .. } | PapertradeError::DatabaseQuery { .. } => 3,
            PapertradeError::QuoteProvider { .. } => 4,
            _ => 1,
        };
        std::process::ExitCode::from(code)
    }
}
