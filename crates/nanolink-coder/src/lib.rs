//! Coder implementations for the Nanolink URL shortener.
//!
//! Two interchangeable strategies implement the
//! [`Coder`](nanolink_core::Coder) trait:
//!
//! - [`ReversibleCoder`] derives the code deterministically from the mapping
//!   id with a salted, reversible encoding; no collision is possible and the
//!   code is never stored.
//! - [`RandomCoder`] draws an independent random code and retries against
//!   the store on collision, growing the code length under sustained
//!   collision pressure.
//!
//! [`CoderConfig`] selects one of the two from configuration, once, at
//! service construction.

pub mod config;
pub mod random;
pub mod reversible;

pub use config::{AnyCoder, CoderConfig};
pub use random::{RandomCoder, RandomSettings};
pub use reversible::{ReversibleCoder, ReversibleSettings};
