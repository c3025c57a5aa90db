// src/error.rs
use thiserror::Error;

/// Errors produced by the PAC primitives and the script evaluator.
///
/// Almost every primitive swallows its failures and hands the script a plain
/// `false` or `""`. The variants here exist for the few paths that do
/// propagate: [`resolve`](crate::pac::PacFunctions::resolve), `timeRange`
/// with an unsupported arity, and script evaluation itself.
#[derive(Debug, Error)]
pub enum PacError {
    #[error("cannot resolve {host:?} to an IPv4 address: {reason}")]
    Resolution { host: String, reason: String },

    #[error("{function}: bad number of arguments ({count})")]
    BadArgumentCount { function: &'static str, count: usize },

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL {0:?} has no host")]
    MissingHost(String),

    #[error("PAC script error: {0}")]
    Script(String),
}

impl PacError {
    pub(crate) fn resolution(host: &str, reason: impl ToString) -> Self {
        PacError::Resolution {
            host: host.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PacError>;
