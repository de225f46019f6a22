use async_trait::async_trait;
use nanolink_core::error::{Result, StoreError};
use nanolink_core::{Coder, Mapping, MappingStore, ShortCode, ShortenError};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// The fixed code alphabet: the 62 ASCII alphanumerics.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default minimum code length.
pub const DEFAULT_MIN_LENGTH: usize = 8;
/// Collisions per length step: every third collision grows the code by one.
pub const DEFAULT_RETRY_THRESHOLD: u32 = 3;
/// Total attempt bound before a request gives up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 36;

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

fn default_retry_threshold() -> u32 {
    DEFAULT_RETRY_THRESHOLD
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

/// Settings for [`RandomCoder`].
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
pub struct RandomSettings {
    /// Initial code length.
    #[builder(default = DEFAULT_MIN_LENGTH)]
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Number of collisions after which the code length grows by one.
    #[builder(default = DEFAULT_RETRY_THRESHOLD)]
    #[serde(default = "default_retry_threshold")]
    pub retry_threshold: u32,
    /// Hard bound on total insert attempts per request. The underlying
    /// retry loop would otherwise be unbounded under pathological
    /// collision patterns.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for RandomSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Generates short codes with no relation to the mapping id.
///
/// Each draw samples `length` distinct characters from [`ALPHABET`] (without
/// replacement within the draw, so a code never repeats a character). A
/// `DuplicateCode` answer from the store is an expected, recoverable event:
/// the coder redraws, growing the length by one every
/// `retry_threshold` collisions, and only gives up once `max_attempts`
/// inserts have been tried.
#[derive(Debug, Clone)]
pub struct RandomCoder {
    settings: RandomSettings,
}

impl RandomCoder {
    /// Builds the coder from its settings.
    pub fn new(settings: RandomSettings) -> Result<Self> {
        // Codes must pass the resolution gate, so the configured length
        // has to stay within the code length bounds.
        if settings.min_length < ShortCode::MIN_LENGTH
            || settings.min_length > ShortCode::MAX_LENGTH
        {
            return Err(ShortenError::Config(format!(
                "min_length must be in {}..={}, got {}",
                ShortCode::MIN_LENGTH,
                ShortCode::MAX_LENGTH,
                settings.min_length
            )));
        }
        if settings.retry_threshold == 0 {
            return Err(ShortenError::Config(
                "retry_threshold must be positive".to_string(),
            ));
        }
        if settings.max_attempts == 0 {
            return Err(ShortenError::Config(
                "max_attempts must be positive".to_string(),
            ));
        }

        Ok(Self { settings })
    }

    /// Draws a random code of the given length, sampling characters from the
    /// alphabet without replacement.
    pub fn draw(&self, length: usize) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = ALPHABET
            .choose_multiple(&mut rng, length)
            .map(|&b| b as char)
            .collect();
        ShortCode::new_unchecked(code)
    }

    /// The settings this coder was built with.
    pub fn settings(&self) -> &RandomSettings {
        &self.settings
    }
}

#[async_trait]
impl Coder for RandomCoder {
    fn code_of(&self, mapping: &Mapping) -> Result<ShortCode> {
        mapping
            .short_code
            .clone()
            .ok_or(ShortenError::Store(StoreError::MissingCode(mapping.id)))
    }

    async fn assign(&self, store: &dyn MappingStore, url: &str) -> Result<Mapping> {
        let mut length = self.settings.min_length;
        let mut attempts: u32 = 1;

        loop {
            let code = self.draw(length);
            match store.insert(url, Some(&code)).await {
                Ok(mapping) => return Ok(mapping),
                Err(StoreError::DuplicateCode(_)) => {
                    tracing::debug!(attempts, length, "short code collision, redrawing");
                    if attempts >= self.settings.max_attempts {
                        tracing::warn!(
                            attempts,
                            length,
                            "giving up on code generation for this request"
                        );
                        return Err(ShortenError::GenerationExhausted { attempts });
                    }
                    // Grow the code once per `retry_threshold` collisions,
                    // staying within the code length bounds.
                    if attempts % self.settings.retry_threshold == 0 {
                        length = (length + 1).min(ShortCode::MAX_LENGTH);
                    }
                    attempts += 1;
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    async fn resolve(
        &self,
        store: &dyn MappingStore,
        code: &ShortCode,
    ) -> Result<Option<Mapping>> {
        Ok(store.find_by_code(code).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use nanolink_core::error::StoreResult;
    use nanolink_storage::InMemoryStore;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[test]
    fn draw_uses_alphabet_and_length() {
        let coder = RandomCoder::new(RandomSettings::default()).unwrap();
        let code = coder.draw(8);

        assert_eq!(code.as_str().len(), 8);
        assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn draw_never_repeats_a_character() {
        let coder = RandomCoder::new(RandomSettings::default()).unwrap();

        for _ in 0..100 {
            let code = coder.draw(10);
            let mut seen = std::collections::HashSet::new();
            assert!(code.as_str().bytes().all(|b| seen.insert(b)));
        }
    }

    #[test]
    fn rejects_unusable_settings() {
        for min_length in [0, 1, 2, ShortCode::MAX_LENGTH + 1] {
            assert!(
                RandomCoder::new(RandomSettings::builder().min_length(min_length).build())
                    .is_err(),
                "min_length {} must be rejected",
                min_length
            );
        }
        assert!(RandomCoder::new(RandomSettings::builder().retry_threshold(0).build()).is_err());
        assert!(RandomCoder::new(RandomSettings::builder().max_attempts(0).build()).is_err());
    }

    #[tokio::test]
    async fn assign_then_resolve() {
        let store = InMemoryStore::new();
        let coder = RandomCoder::new(RandomSettings::default()).unwrap();

        let mapping = coder
            .assign(&store, "https://example.com/page")
            .await
            .unwrap();
        let code = coder.code_of(&mapping).unwrap();
        assert_eq!(code.as_str().len(), DEFAULT_MIN_LENGTH);

        let resolved = coder.resolve(&store, &code).await.unwrap().unwrap();
        assert_eq!(resolved.original_url, "https://example.com/page");
    }

    #[tokio::test]
    async fn resolve_unknown_code_is_none() {
        let store = InMemoryStore::new();
        let coder = RandomCoder::new(RandomSettings::default()).unwrap();

        let missing = coder
            .resolve(&store, &ShortCode::new_unchecked("zzzz"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    /// Store double that reports a code collision for the first `conflicts`
    /// inserts and records the length of every attempted code.
    struct CollidingStore {
        conflicts: u32,
        inserts: AtomicU32,
        lengths: Mutex<Vec<usize>>,
    }

    impl CollidingStore {
        fn new(conflicts: u32) -> Self {
            Self {
                conflicts,
                inserts: AtomicU32::new(0),
                lengths: Mutex::new(Vec::new()),
            }
        }

        fn lengths(&self) -> Vec<usize> {
            self.lengths.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MappingStore for CollidingStore {
        async fn find_by_url(&self, _url: &str) -> StoreResult<Option<Mapping>> {
            Ok(None)
        }

        async fn find_by_code(&self, _code: &ShortCode) -> StoreResult<Option<Mapping>> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: u64) -> StoreResult<Option<Mapping>> {
            Ok(None)
        }

        async fn insert(&self, url: &str, code: Option<&ShortCode>) -> StoreResult<Mapping> {
            let code = code.expect("random coder always supplies a code");
            self.lengths.lock().unwrap().push(code.as_str().len());

            let n = self.inserts.fetch_add(1, Ordering::SeqCst);
            if n < self.conflicts {
                return Err(StoreError::DuplicateCode(code.to_string()));
            }

            Ok(Mapping {
                id: 1,
                original_url: url.to_string(),
                short_code: Some(code.clone()),
                created_at: Timestamp::now(),
                clicks: 0,
            })
        }

        async fn increment_clicks(&self, id: u64) -> StoreResult<u64> {
            Err(StoreError::UnknownId(id))
        }

        async fn delete_by_url(&self, _url: &str) -> StoreResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn collisions_grow_the_code_length() {
        // Nine forced collisions with threshold 3 must grow the length by
        // three before the tenth attempt succeeds.
        let store = CollidingStore::new(9);
        let coder = RandomCoder::new(RandomSettings::default()).unwrap();

        let mapping = coder.assign(&store, "https://example.com").await.unwrap();
        assert_eq!(
            mapping.short_code.unwrap().as_str().len(),
            DEFAULT_MIN_LENGTH + 3
        );

        let lengths = store.lengths();
        assert_eq!(lengths.len(), 10);
        // Growth lands after collisions 3, 6 and 9.
        assert_eq!(lengths[0..3], [8, 8, 8]);
        assert_eq!(lengths[3..6], [9, 9, 9]);
        assert_eq!(lengths[6..9], [10, 10, 10]);
        assert_eq!(lengths[9], 11);
    }

    #[tokio::test]
    async fn exhaustion_is_bounded() {
        let store = CollidingStore::new(u32::MAX);
        let coder = RandomCoder::new(
            RandomSettings::builder()
                .min_length(4)
                .max_attempts(5)
                .build(),
        )
        .unwrap();

        let err = coder
            .assign(&store, "https://example.com")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShortenError::GenerationExhausted { attempts: 5 }
        ));
        assert_eq!(store.lengths().len(), 5);
    }

    #[tokio::test]
    async fn duplicate_url_is_not_retried() {
        struct RacedStore;

        #[async_trait]
        impl MappingStore for RacedStore {
            async fn find_by_url(&self, _url: &str) -> StoreResult<Option<Mapping>> {
                Ok(None)
            }
            async fn find_by_code(&self, _code: &ShortCode) -> StoreResult<Option<Mapping>> {
                Ok(None)
            }
            async fn find_by_id(&self, _id: u64) -> StoreResult<Option<Mapping>> {
                Ok(None)
            }
            async fn insert(
                &self,
                url: &str,
                _code: Option<&ShortCode>,
            ) -> StoreResult<Mapping> {
                Err(StoreError::DuplicateUrl(url.to_string()))
            }
            async fn increment_clicks(&self, id: u64) -> StoreResult<u64> {
                Err(StoreError::UnknownId(id))
            }
            async fn delete_by_url(&self, _url: &str) -> StoreResult<bool> {
                Ok(false)
            }
        }

        let coder = RandomCoder::new(RandomSettings::default()).unwrap();
        let err = coder
            .assign(&RacedStore, "https://example.com")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ShortenError::Store(StoreError::DuplicateUrl(_))
        ));
    }
}
