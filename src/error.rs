use thiserror::Error;

/// Boxed error returned by preset collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum FfcomposeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid output: {0}")]
    InvalidOutput(String),

    #[error("Only one input stream is supported")]
    DuplicateStreamInput,

    #[error("Only one output stream is supported")]
    DuplicateStreamOutput,

    #[error("No input specified")]
    NoCurrentInput,

    #[error("Invalid size specification: {0}")]
    InvalidSize(String),

    #[error("preset {name} could not be loaded: {source}")]
    PresetLoad {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FfcomposeError {
    /// Wrap a resolution or load failure for the named preset.
    pub fn preset_load(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::PresetLoad {
            name: name.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FfcomposeError>;
