use thiserror::Error;

/// Rejected compaction settings. Raised before any diff is processed.
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("{name} must be greater than zero")]
    ZeroLimit { name: &'static str },

    #[error("invalid ignore glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to compile ignore globs: {0}")]
    GlobSet(#[source] globset::Error),
}

pub type OptionsResult<T> = Result<T, OptionsError>;
