//! # mnemo-store
//!
//! The authoritative store for block content.
//!
//! [`BlockStore`] is the single point of truth for "what is the current
//! committed content" of every block. Persistence sits behind the
//! [`ContentBackend`] trait — a key-value-of-text abstraction — so the
//! backing medium (memory, files, a database later) can be swapped without
//! changing callers.
//!
//! ## Key invariants
//!
//! - **Validate before commit**: every write is checked against the block's
//!   registered schema; a failing write leaves the store untouched.
//! - **Per-block serialization**: writes to the same `(owner, label)` are
//!   serialized through a per-key lock; [`BlockStore::update`] runs a whole
//!   read-modify-write cycle under that lock.
//! - **Snapshot reads**: readers never observe a partially-written block
//!   (in-memory maps hand out clones; the filesystem backend replaces files
//!   atomically).

pub mod backend;
pub mod block_store;
pub mod error;
pub mod fs_backend;

pub use backend::{BlockKey, ContentBackend, MemoryBackend};
pub use block_store::{BlockStore, UpdateError};
pub use error::StoreError;
pub use fs_backend::FsBackend;
