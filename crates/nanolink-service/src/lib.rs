//! Orchestration layer for the Nanolink URL shortener.
//!
//! [`ShorteningService`] wires a [`MappingStore`](nanolink_core::MappingStore)
//! and a [`Coder`](nanolink_core::Coder) together behind the
//! [`Shortener`](nanolink_core::Shortener) boundary trait. Both collaborators
//! arrive by constructor injection; the service holds no other state.

pub mod service;

pub use service::ShorteningService;
