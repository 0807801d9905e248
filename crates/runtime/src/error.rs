use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Missing configuration key '{0}'")]
    MissingConfig(String),

    #[error("The {0} client is not initialized")]
    NotInitialized(&'static str),

    #[error("Failed to read {path}: {source}")]
    ConfigFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    ConfigFormat {
        path: String,
        source: serde_json::Error,
    },
}
