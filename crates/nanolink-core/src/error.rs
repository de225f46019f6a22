use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for operations crossing the core boundary.
pub type Result<T> = std::result::Result<T, ShortenError>;

/// Errors raised by a [`MappingStore`](crate::store::MappingStore).
///
/// `DuplicateUrl` and `DuplicateCode` are recoverable: the service rereads
/// the winning mapping on a URL race, and the random coder redraws on a code
/// collision. Neither is expected to surface past the component that can
/// act on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("url already mapped: {0}")]
    DuplicateUrl(String),
    #[error("short code already taken: {0}")]
    DuplicateCode(String),
    #[error("no mapping with id {0}")]
    UnknownId(u64),
    #[error("mapping {0} has no stored short code")]
    MissingCode(u64),
    #[error("store lock is poisoned")]
    Poisoned,
}

/// Errors crossing the core boundary.
#[derive(Debug, Clone, Error)]
pub enum ShortenError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid coder configuration: {0}")]
    Config(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("code generation exhausted after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
