use thiserror::Error;

/// Result type for quill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors outside the parse itself
///
/// Syntax errors are never raised as `Err`: the parser reports them as
/// [`Diagnostic`](crate::parser::Diagnostic)s and keeps going. This type
/// covers configuration, I/O and the conversion of a diagnostic into a hard
/// failure by callers that want one.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Configuration error: invalid value '{value}' for {key}")]
    Config { key: String, value: String },
}

impl Error {
    pub fn config_error(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            value: value.into(),
        }
    }
}
