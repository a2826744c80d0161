//! bpbook Storage
//!
//! This module provides local persistence for the measurement log:
//!
//! - **types**: Core data structures (Entry, Vital, Vitals)
//! - **kv**: Key-value stores (SQLite and in-memory)
//! - **persistence**: Serializes the whole collection under one key
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   Vec<Entry> → JSON array → KeyValueStore::set(key)
//!
//! Read Path:
//!   KeyValueStore::get(key) → JSON array → Vec<Entry> (empty on any failure)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bpbook::storage::{Entry, Persistence, SqliteStore, Vitals};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::open("./bpbook.db")?;
//!     let mut persistence = Persistence::new(Box::new(store));
//!
//!     let mut entries = persistence.load();
//!     entries.push(Entry::new(1_700_000_000_000, Vitals::new(120, 80, 65)));
//!     persistence.save(&entries)?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kv;
pub mod persistence;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use persistence::{Persistence, DEFAULT_STORAGE_KEY};
pub use types::{sort_descending, Entry, Vital, Vitals};
