use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("dissector already registered: {0}")]
    DuplicateDissector(&'static str),
}

pub type Result<T> = std::result::Result<T, RasError>;
