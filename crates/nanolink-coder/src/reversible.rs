use async_trait::async_trait;
use harsh::Harsh;
use nanolink_core::error::Result;
use nanolink_core::{Coder, Mapping, MappingStore, ShortCode, ShortenError};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default minimum code length, matching the deployment this core grew out of.
pub const DEFAULT_MIN_LENGTH: usize = 4;

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

/// Settings for [`ReversibleCoder`].
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
pub struct ReversibleSettings {
    /// Site-specific salt. Codes produced under one salt are not portable
    /// to a deployment using another.
    #[builder(setter(into))]
    pub salt: String,
    /// Minimum code length; shorter natural encodings are padded
    /// deterministically.
    #[builder(default = DEFAULT_MIN_LENGTH)]
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

/// Derives short codes from mapping ids with a salted Hashids encoding.
///
/// The alphabet is the Hashids default: ASCII alphanumerics, with the
/// `cfhistuCFHISTU` subset reserved as separators so consecutive encodings
/// avoid accidental words. Same id and salt always yield the same code, two
/// distinct ids never collide, and decoding inverts encoding exactly, so
/// this coder never consults the store to produce a code. The store is only
/// touched to resolve a decoded id back to its mapping.
///
/// A code minted under a different salt either fails to decode or decodes
/// to an id the store does not know; both end in a not-found outcome.
#[derive(Clone)]
pub struct ReversibleCoder {
    harsh: Harsh,
    min_length: usize,
}

impl ReversibleCoder {
    /// Builds the coder from its settings.
    pub fn new(settings: ReversibleSettings) -> Result<Self> {
        // Anything this coder mints must pass the resolution gate, so the
        // configured padding has to stay within the code length bounds.
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

        let harsh = Harsh::builder()
            .salt(settings.salt.as_str())
            .length(settings.min_length)
            .build()
            .map_err(|e| ShortenError::Config(format!("hashids setup failed: {}", e)))?;

        Ok(Self {
            harsh,
            min_length: settings.min_length,
        })
    }

    /// Encodes a mapping id into its short code.
    pub fn encode(&self, id: u64) -> ShortCode {
        let code = self.harsh.encode(&[id]);
        tracing::debug!(id, code = %code, "derived short code");
        ShortCode::new_unchecked(code)
    }

    /// Decodes a short code back to the mapping id it encodes.
    /// Returns `None` for malformed codes or codes minted under another salt.
    pub fn decode(&self, code: &ShortCode) -> Option<u64> {
        self.harsh
            .decode(code.as_str())
            .ok()
            .and_then(|ids| ids.first().copied())
    }

    /// The configured minimum code length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

impl std::fmt::Debug for ReversibleCoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReversibleCoder")
            .field("salt", &"<redacted>")
            .field("min_length", &self.min_length)
            .finish()
    }
}

#[async_trait]
impl Coder for ReversibleCoder {
    fn code_of(&self, mapping: &Mapping) -> Result<ShortCode> {
        Ok(self.encode(mapping.id))
    }

    async fn assign(&self, store: &dyn MappingStore, url: &str) -> Result<Mapping> {
        // The code is a pure function of the id the store hands out, so a
        // single insert suffices and nothing is stored in the code column.
        let mapping = store.insert(url, None).await?;
        Ok(mapping)
    }

    async fn resolve(
        &self,
        store: &dyn MappingStore,
        code: &ShortCode,
    ) -> Result<Option<Mapping>> {
        let Some(id) = self.decode(code) else {
            return Ok(None);
        };
        Ok(store.find_by_id(id).await?)
    }
}
