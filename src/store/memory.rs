//! In-memory yield store
//!
//! Substitutable double for the MongoDB store: same trait, same stamping
//! and ordering behavior, plus a failure-injection switch so storage
//! outages are testable without a database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use super::{MonotonicClock, YieldStore};
use crate::error::StorageError;
use crate::schema::{NewObservation, YieldObservation};

/// Yield store holding records in process memory
#[derive(Default)]
pub struct MemoryYieldStore {
    records: Mutex<Vec<YieldObservation>>,
    unavailable: AtomicBool,
    clock: MonotonicClock,
}

impl MemoryYieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with [`StorageError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("simulated outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl YieldStore for MemoryYieldStore {
    async fn insert(&self, candidate: NewObservation) -> Result<YieldObservation, StorageError> {
        self.check_available()?;

        let mut record = candidate.stamped(self.clock.now());
        record.id = Some(ObjectId::new());

        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<YieldObservation>, StorageError> {
        self.check_available()?;

        // Stamps are strictly increasing, so reversed insertion order is
        // createdAt descending.
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        records.reverse();
        Ok(records)
    }
}
