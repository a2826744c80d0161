//! Application State
//!
//! Shared state accessible by all handlers. The book sits behind a std
//! mutex; handlers take the lock, do their synchronous work and drop it
//! before any `.await`.

use crate::app::BpBook;
use crate::web::error::WebError;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub book: Arc<Mutex<BpBook>>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(book: BpBook) -> Self {
        Self {
            book: Arc::new(Mutex::new(book)),
            start_time: Instant::now(),
        }
    }

    /// Lock the book
    pub fn book(&self) -> Result<MutexGuard<'_, BpBook>, WebError> {
        self.book
            .lock()
            .map_err(|e| WebError::Internal(format!("Book lock poisoned: {}", e)))
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
