//! Persistence gateway for yield observations
//!
//! The [`YieldStore`] trait is the seam between the HTTP layer and the
//! document store: the router only ever sees the trait object, so the
//! MongoDB-backed store and the in-memory test double are interchangeable.
//! Connection lifecycle (pooling, reconnects) belongs to the driver.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Client, Collection};

use crate::error::StorageError;
use crate::schema::{NewObservation, YieldObservation};

pub mod memory;

pub use memory::MemoryYieldStore;

/// Collection holding the observation documents
pub const COLLECTION_NAME: &str = "observations";

/// Database used when the connection string does not name one
pub const DEFAULT_DATABASE: &str = "crop_yield";

/// Durable storage and retrieval of yield observations
#[async_trait]
pub trait YieldStore: Send + Sync {
    /// Stamp and store a validated candidate, returning the stored record
    /// with its assigned identifier and timestamp.
    async fn insert(&self, candidate: NewObservation) -> Result<YieldObservation, StorageError>;

    /// Every stored record, newest first. Empty when none exist.
    async fn list_all(&self) -> Result<Vec<YieldObservation>, StorageError>;
}

/// Insertion clock producing strictly increasing millisecond timestamps
///
/// `createdAt` is the sole ordering key for listing, so two inserts must
/// never share a stamp at the BSON datetime's millisecond precision. When
/// the wall clock has not advanced past the previous stamp, the clock steps
/// forward by one millisecond instead.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_ms: Mutex<i64>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next insertion timestamp
    pub fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_millis();
        let mut last = self.last_ms.lock().unwrap_or_else(|e| e.into_inner());
        let stamp = if wall > *last { wall } else { *last + 1 };
        *last = stamp;
        DateTime::from_timestamp_millis(stamp).unwrap_or_else(Utc::now)
    }
}

/// MongoDB-backed yield store
pub struct MongoYieldStore {
    collection: Collection<YieldObservation>,
    clock: MonotonicClock,
}

impl MongoYieldStore {
    /// Connect to the store and verify it is reachable.
    ///
    /// The database named in the connection string wins over `db`. Called
    /// once at process startup; a failure here is startup-fatal for the
    /// caller.
    pub async fn connect(uri: &str, db: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StorageError::connection(e.to_string()))?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(db));

        // The driver connects lazily; ping so a bad endpoint fails now
        // rather than on the first request.
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::connection(e.to_string()))?;

        tracing::info!(database = %database.name(), "connected to document store");

        Ok(Self {
            collection: database.collection(COLLECTION_NAME),
            clock: MonotonicClock::new(),
        })
    }
}

#[async_trait]
impl YieldStore for MongoYieldStore {
    async fn insert(&self, candidate: NewObservation) -> Result<YieldObservation, StorageError> {
        let mut record = candidate.stamped(self.clock.now());

        let outcome = self
            .collection
            .insert_one(&record)
            .await
            .map_err(|e| StorageError::write(e.to_string()))?;

        record.id = outcome.inserted_id.as_object_id();
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<YieldObservation>, StorageError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(|e| StorageError::query(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| StorageError::query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_strictly_increases() {
        let clock = MonotonicClock::new();
        let mut previous = clock.now();
        for _ in 0..200 {
            let next = clock.now();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_monotonic_clock_tracks_wall_time() {
        let clock = MonotonicClock::new();
        let stamp = clock.now();
        // Within a second of the wall clock, not an arbitrary counter
        assert!((Utc::now() - stamp).num_seconds().abs() <= 1);
    }
}
