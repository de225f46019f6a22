//! Storage backends for the Nanolink URL shortener.
//!
//! Currently provides the in-memory reference implementation of
//! [`MappingStore`](nanolink_core::MappingStore). Persistent backends are
//! deployment collaborators and live outside the core.

pub mod memory;

pub use memory::InMemoryStore;
