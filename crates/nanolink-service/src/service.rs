use async_trait::async_trait;
use nanolink_core::error::{Result, StoreError};
use nanolink_core::validate::validate_url;
use nanolink_core::{Coder, MappingStore, ShortCode, ShortenError, Shortened, Shortener};
use std::sync::Arc;

/// A concrete implementation of the [`Shortener`] trait.
///
/// Creation is idempotent per URL: an existing mapping is reused and
/// reported as not newly created, and a lost creation race is absorbed by
/// rereading the winner's mapping. Resolution counts the click before
/// handing the original URL back for the redirect.
#[derive(Debug, Clone)]
pub struct ShorteningService<S, C> {
    store: Arc<S>,
    coder: Arc<C>,
}

impl<S: MappingStore, C: Coder> ShorteningService<S, C> {
    /// Creates a new service over the given store and coder.
    pub fn new(store: S, coder: C) -> Self {
        Self {
            store: Arc::new(store),
            coder: Arc::new(coder),
        }
    }

    fn store(&self) -> &dyn MappingStore {
        self.store.as_ref()
    }
}

#[async_trait]
impl<S: MappingStore, C: Coder> Shortener for ShorteningService<S, C> {
    async fn shorten(&self, url: &str) -> Result<Shortened> {
        validate_url(url)?;

        if let Some(existing) = self.store.find_by_url(url).await? {
            return Ok(Shortened {
                code: self.coder.code_of(&existing)?,
                created: false,
            });
        }

        match self.coder.assign(self.store(), url).await {
            Ok(mapping) => {
                let code = self.coder.code_of(&mapping)?;
                tracing::debug!(id = mapping.id, code = %code, "created mapping");
                Ok(Shortened {
                    code,
                    created: true,
                })
            }
            Err(err @ ShortenError::Store(StoreError::DuplicateUrl(_))) => {
                // Lost a creation race; the winner's mapping is the answer.
                match self.store.find_by_url(url).await? {
                    Some(existing) => Ok(Shortened {
                        code: self.coder.code_of(&existing)?,
                        created: false,
                    }),
                    // Winner vanished between insert and reread.
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn resolve(&self, code: &str) -> Result<String> {
        // A malformed code cannot name a mapping; not-found, never a
        // server error.
        let Ok(code) = ShortCode::new(code) else {
            return Err(ShortenError::NotFound(code.to_string()));
        };

        let Some(mapping) = self.coder.resolve(self.store(), &code).await? else {
            return Err(ShortenError::NotFound(code.to_string()));
        };

        match self.store.increment_clicks(mapping.id).await {
            Ok(_) => Ok(mapping.original_url),
            // The mapping vanished between lookup and count; still a
            // not-found on this path, never a server error.
            Err(StoreError::UnknownId(_)) => Err(ShortenError::NotFound(code.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    async fn lookup(&self, url: &str) -> Result<ShortCode> {
        validate_url(url)?;

        match self.store.find_by_url(url).await? {
            Some(mapping) => self.coder.code_of(&mapping),
            None => Err(ShortenError::NotFound(url.to_string())),
        }
    }

    async fn delete(&self, url: &str) -> Result<()> {
        validate_url(url)?;

        if self.store.delete_by_url(url).await? {
            Ok(())
        } else {
            Err(ShortenError::NotFound(url.to_string()))
        }
    }
}
