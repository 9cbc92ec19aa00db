use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Database query failed: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Warehouse request failed: {0}")]
    WarehouseRequestError(#[from] reqwest::Error),

    #[error("Warehouse rejected document: {message}")]
    WarehouseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, EtlError>;

impl EtlError {
    /// Flatten the error and its source chain into one string, the closest
    /// analogue to a traceback the run report can carry.
    pub fn chain_to_string(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str("\ncaused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}
