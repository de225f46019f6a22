use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A persisted long-URL to short-code association.
///
/// `short_code` is `Some` when the deployment uses the random coder (the
/// code is independent of the id and must be stored) and `None` when it uses
/// the reversible coder (the code is a pure function of `id` and is derived
/// on demand).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Monotonically assigned by the store on insert; never reused.
    pub id: u64,
    /// The long URL this mapping shortens. Unique across active mappings.
    pub original_url: String,
    /// The stored short code, if the active coder stores one.
    pub short_code: Option<ShortCode>,
    /// When the mapping was created. Immutable after insert.
    pub created_at: Timestamp,
    /// Successful resolutions of this mapping.
    pub clicks: u64,
}
