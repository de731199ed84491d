use thiserror::Error;

/// Errors returned at the API boundary. The core never panics or aborts;
/// every rejected call returns one of these before touching any buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid params: {0}")]
    ParamsInvalid(&'static str),

    #[error("invalid block index: {0}")]
    BlockIndexInvalid(&'static str),

    #[error("gf256 table initialization unavailable")]
    InitUnavailable,
}
