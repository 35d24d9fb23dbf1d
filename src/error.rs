use thiserror::Error;

use crate::payment::PaymentKind;

/// Why a payload could not be built or read back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Nothing was entered. Callers show a neutral placeholder, not an error.
    #[error("no {kind} number entered")]
    EmptyInput { kind: PaymentKind },

    #[error("invalid {kind} number: {hint}")]
    InvalidFormat { kind: PaymentKind, hint: &'static str },

    #[error("value for tag {tag} is {len} characters, at most 99 allowed")]
    FieldTooLong { tag: &'static str, len: usize },

    #[error("value for tag {tag} contains unsupported character {ch:?}")]
    UnsupportedCharacter { tag: &'static str, ch: char },

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("checksum mismatch: payload says {expected}, computed {computed}")]
    ChecksumMismatch { expected: String, computed: String },
}

impl PayloadError {
    /// True when the number field was simply left blank.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, PayloadError>;
