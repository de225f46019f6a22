use crate::error::StoreResult;
use crate::mapping::Mapping;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// The persistence contract for URL mappings.
///
/// The store is the only shared mutable resource in the core; every
/// uniqueness guarantee lives here. `insert` must check both keys and commit
/// atomically with respect to concurrent inserts: of two racing creations
/// for the same URL, exactly one wins and the loser observes
/// [`StoreError::DuplicateUrl`](crate::error::StoreError::DuplicateUrl).
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Looks up the mapping for a long URL.
    async fn find_by_url(&self, url: &str) -> StoreResult<Option<Mapping>>;

    /// Looks up the mapping a stored short code belongs to.
    ///
    /// Only meaningful in random-coder deployments; reversible deployments
    /// store no code and resolve through [`find_by_id`](Self::find_by_id).
    async fn find_by_code(&self, code: &ShortCode) -> StoreResult<Option<Mapping>>;

    /// Looks up a mapping by its identifier.
    async fn find_by_id(&self, id: u64) -> StoreResult<Option<Mapping>>;

    /// Inserts a new mapping, assigning its id and creation timestamp.
    ///
    /// Fails with `DuplicateUrl` if the URL is already mapped and with
    /// `DuplicateCode` if the supplied code is already taken; neither
    /// failure leaves a partial write behind.
    async fn insert(&self, url: &str, code: Option<&ShortCode>) -> StoreResult<Mapping>;

    /// Bumps the click counter for a mapping and returns the new count.
    ///
    /// Increments are linearizable per id; concurrent resolutions must not
    /// lose updates.
    async fn increment_clicks(&self, id: u64) -> StoreResult<u64>;

    /// Removes the mapping for a long URL.
    /// Returns `true` if a mapping existed and was removed.
    ///
    /// The id sequence is not rewound; deleted ids are never reissued.
    async fn delete_by_url(&self, url: &str) -> StoreResult<bool>;
}
