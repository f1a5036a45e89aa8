use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArcadeError {
    #[error("Unsupported game type: {0}")]
    UnsupportedGame(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Instance already registered: {0}")]
    DuplicateInstance(String),

    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
