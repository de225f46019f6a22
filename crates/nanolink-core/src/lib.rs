//! Core types and traits for the Nanolink URL shortener.
//!
//! This crate defines the shared vocabulary of the system: the persisted
//! [`Mapping`], the validated [`ShortCode`], the [`MappingStore`] contract,
//! the [`Coder`] strategy seam, and the [`Shortener`] boundary trait that
//! request-handling collaborators call into.

pub mod coder;
pub mod error;
pub mod mapping;
pub mod shortcode;
pub mod shortener;
pub mod store;
pub mod validate;

pub use coder::Coder;
pub use error::{ShortenError, StoreError};
pub use mapping::Mapping;
pub use shortcode::ShortCode;
pub use shortener::{Shortened, Shortener};
pub use store::MappingStore;
