use thiserror::Error;

use crate::status::Status;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("config error: {0}")]
    Config(String),

    /// The address was never resolved. Raised before any native call is attempted.
    #[error("symbol '{symbol}' in '{module}' is unresolved")]
    Unresolved { module: String, symbol: String },

    #[error("call through a null function address")]
    NullAddress,

    #[error("invalid call arity {count}: {supplied} argument(s) supplied, at most 3 supported")]
    Arity { count: usize, supplied: usize },

    #[error("batch of {0} inputs exceeds the native count range")]
    TooManyInputs(usize),

    #[error("text argument contains an interior NUL")]
    InteriorNul,

    #[error("symbol registry already initialized")]
    AlreadyInitialized,

    #[error("native call failed: {0}")]
    Native(Status),
}

impl BridgeError {
    pub(crate) fn unresolved(module: &str, symbol: &str) -> Self {
        Self::Unresolved {
            module: module.to_string(),
            symbol: symbol.to_string(),
        }
    }
}
