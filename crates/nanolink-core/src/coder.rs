use crate::error::Result;
use crate::mapping::Mapping;
use crate::shortcode::ShortCode;
use crate::store::MappingStore;
use async_trait::async_trait;

/// The code-assignment strategy of a deployment.
///
/// Two implementations exist: a reversible salted encoding of the mapping id
/// (collision-free by construction, code never stored) and a random
/// generator that retries against the store on collision. One is selected at
/// service construction; the two are never mixed within a deployment.
#[async_trait]
pub trait Coder: Send + Sync + 'static {
    /// Returns the short code for an existing mapping.
    fn code_of(&self, mapping: &Mapping) -> Result<ShortCode>;

    /// Assigns a code to a URL and persists the new mapping.
    ///
    /// The caller must already have checked that the URL is unmapped; a
    /// `DuplicateUrl` store error here means the caller lost a creation
    /// race and is propagated, never retried.
    async fn assign(&self, store: &dyn MappingStore, url: &str) -> Result<Mapping>;

    /// Recovers the mapping a short code refers to.
    /// Returns `None` if the code decodes to nothing the store knows.
    async fn resolve(&self, store: &dyn MappingStore, code: &ShortCode)
        -> Result<Option<Mapping>>;
}
