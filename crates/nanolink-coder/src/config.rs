use crate::random::{RandomCoder, RandomSettings};
use crate::reversible::{ReversibleCoder, ReversibleSettings};
use async_trait::async_trait;
use nanolink_core::error::Result;
use nanolink_core::{Coder, Mapping, MappingStore, ShortCode};
use serde::{Deserialize, Serialize};

/// Deployment-level coder selection.
///
/// Deserializes from configuration such as
///
/// ```json
/// { "mode": "reversible", "salt": "site-secret", "min_length": 4 }
/// ```
///
/// or
///
/// ```json
/// { "mode": "random", "min_length": 8 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CoderConfig {
    Reversible(ReversibleSettings),
    Random(RandomSettings),
}

impl CoderConfig {
    /// Builds the configured coder. Selection happens here, once, at
    /// service construction; the two modes are never mixed per deployment.
    pub fn build(self) -> Result<AnyCoder> {
        match self {
            CoderConfig::Reversible(settings) => {
                Ok(AnyCoder::Reversible(ReversibleCoder::new(settings)?))
            }
            CoderConfig::Random(settings) => Ok(AnyCoder::Random(RandomCoder::new(settings)?)),
        }
    }
}

/// Either coder behind a single type, for callers that pick the strategy
/// from configuration rather than at compile time.
#[derive(Debug, Clone)]
pub enum AnyCoder {
    Reversible(ReversibleCoder),
    Random(RandomCoder),
}

#[async_trait]
impl Coder for AnyCoder {
    fn code_of(&self, mapping: &Mapping) -> Result<ShortCode> {
        match self {
            AnyCoder::Reversible(coder) => coder.code_of(mapping),
            AnyCoder::Random(coder) => coder.code_of(mapping),
        }
    }

    async fn assign(&self, store: &dyn MappingStore, url: &str) -> Result<Mapping> {
        match self {
            AnyCoder::Reversible(coder) => coder.assign(store, url).await,
            AnyCoder::Random(coder) => coder.assign(store, url).await,
        }
    }

    async fn resolve(
        &self,
        store: &dyn MappingStore,
        code: &ShortCode,
    ) -> Result<Option<Mapping>> {
        match self {
            AnyCoder::Reversible(coder) => coder.resolve(store, code).await,
            AnyCoder::Random(coder) => coder.resolve(store, code).await,
        }
    }
}
