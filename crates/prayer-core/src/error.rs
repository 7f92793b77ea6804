use thiserror::Error;

/// Malformed or ambiguous tabular input.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required 'Name' column")]
    MissingNameColumn,

    #[error("sheet is empty or has no data rows")]
    EmptySheet,

    #[error("invalid roster document: {0}")]
    InvalidDocument(String),

    #[error("cannot read workbook: {0}")]
    Workbook(String),
}

/// Bad user input. The mutation it guarded is never applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be blank")]
    EmptyName,

    #[error("participant index {index} out of range (roster has {len})")]
    ParticipantOutOfRange { index: usize, len: usize },

    #[error("unknown cycle: {0}")]
    UnknownCycle(String),

    #[error("no cycle number left to assign; name the cycle explicitly")]
    CycleNumbersExhausted,
}

/// A storage backend could not be read or written.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("credentials not found: set {0}")]
    MissingCredentials(String),

    #[error("cannot resolve sheet identifier '{0}'")]
    UnresolvableSheet(String),

    #[error("no spreadsheet named '{0}' is shared with these credentials")]
    SheetNotFound(String),

    #[error("remote sheet returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("cannot write {path}: {message}")]
    Local { path: String, message: String },
}

#[derive(Debug, Error)]
pub enum PrayerError {
    #[error("not initialized: run 'prayer init'")]
    NotInitialized,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl From<reqwest::Error> for PersistError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => PersistError::Remote {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => PersistError::Transport(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PrayerError>;
