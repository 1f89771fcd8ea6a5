//! Crop yield collection service
//!
//! A small HTTP service that accepts crop-yield observations and persists
//! them to a MongoDB collection, with a single listing endpoint returning
//! records newest-first.
//!
//! Three pieces compose in a straight pipeline:
//! - [`schema`]: shape and validation of a yield observation
//! - [`store`]: the persistence gateway over the document store
//! - [`handler`]: the HTTP router translating requests into store calls

pub mod error;
pub mod handler;
pub mod schema;
pub mod store;

pub use error::{StorageError, ValidationError};
pub use schema::{CollectRequest, NewObservation, YieldObservation};
pub use store::{MemoryYieldStore, MongoYieldStore, YieldStore};
