use thiserror::Error;

/// Errors raised at the edges of the pipeline: loading snapshots and config,
/// and parsing user-supplied parameters. The derivations themselves are total.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] json5::Error),

    #[error("invalid config value {value} for {key}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("invalid coordinate '{0}', expected LAT,LNG")]
    InvalidCoordinate(String),

    #[error("unknown {kind} '{value}'")]
    UnknownField { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
