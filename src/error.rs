// ⚠️ Lookup errors
// Every failure a single search can end in. None of them outlive the search.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Submit pressed with nothing typed
    #[error("Please enter a CNPJ.")]
    EmptyInput,

    /// Normalized identifier is not 14 digits
    #[error("Invalid CNPJ. Ensure the CNPJ has 14 digits.")]
    InvalidLength { len: usize },

    /// Any non-200 answer from the registry. The status is kept for logs only.
    #[error("CNPJ not found in the database.")]
    NotFound { status: u16 },

    /// Connection, TLS or timeout failure
    #[error("Error connecting to the API: {0}")]
    Transport(String),

    /// 200 response whose body is not a company record
    #[error("Unexpected response from the API: {0}")]
    Decode(String),
}

impl LookupError {
    /// Input was rejected before any request was made
    pub fn is_input_error(&self) -> bool {
        matches!(self, LookupError::EmptyInput | LookupError::InvalidLength { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            LookupError::EmptyInput => "EMPTY_INPUT",
            LookupError::InvalidLength { .. } => "INVALID_LENGTH",
            LookupError::NotFound { .. } => "NOT_FOUND",
            LookupError::Transport(_) => "TRANSPORT_ERROR",
            LookupError::Decode(_) => "DECODE_ERROR",
        }
    }
}

pub type LookupResult<T> = Result<T, LookupError>;
