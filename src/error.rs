use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegTrackerError {
    #[error("No tracker database at {0}. Run 'regtracker init' first.")]
    NotInitialized(String),

    #[error("Already initialized: {0} exists. Remove it to reinitialize.")]
    AlreadyInitialized(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Invalid status '{value}'. Valid values: {}", valid.join(", "))]
    InvalidStatus {
        value: String,
        valid: Vec<&'static str>,
    },

    #[error("Title is required")]
    InvalidTitle,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl RegTrackerError {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        RegTrackerError::NotFound { kind, id }
    }
}

impl From<rusqlite::Error> for RegTrackerError {
    fn from(e: rusqlite::Error) -> Self {
        RegTrackerError::Persistence(format!("SQLite error: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, RegTrackerError>;
