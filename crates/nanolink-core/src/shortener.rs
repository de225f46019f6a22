use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Outcome of a creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    /// The short code now mapped to the submitted URL.
    pub code: ShortCode,
    /// Whether this request created the mapping. Repeated submissions of
    /// the same URL reuse the existing mapping and report `false`
    /// (collaborators map this to 201 vs 200).
    pub created: bool,
}

/// The boundary trait request-handling collaborators call into.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL, reusing the existing mapping if one exists.
    async fn shorten(&self, url: &str) -> Result<Shortened>;

    /// Resolves a short code to its original URL, counting the click.
    /// The collaborator performs the actual redirect.
    async fn resolve(&self, code: &str) -> Result<String>;

    /// Returns the code for an already-mapped URL without creating anything
    /// and without counting a click.
    async fn lookup(&self, url: &str) -> Result<ShortCode>;

    /// Removes the mapping for a URL.
    async fn delete(&self, url: &str) -> Result<()>;
}
