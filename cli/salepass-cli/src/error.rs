use thiserror::Error;

/// Errors raised while hashing sale pass leaves or deriving fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SalePassError {
    /// A pass id or signer address could not be encoded
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A private key could not be turned into a signing key.
    ///
    /// Only the position of the key is kept, never the key itself.
    #[error("Invalid private key at index {index}: {reason}")]
    InvalidKey { index: usize, reason: String },
}

impl SalePassError {
    pub fn invalid_input<S: Into<String>>(field: &'static str, value: &str, reason: S) -> Self {
        Self::InvalidInput {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_key<S: Into<String>>(index: usize, reason: S) -> Self {
        Self::InvalidKey {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SalePassError>;
