//! Persistence repository for pod records
//!
//! The repository owns pod records outright; the reconciliation service
//! only ever touches them through this trait. The in-memory
//! implementation in [`memory`] backs the standalone server and the test
//! suites; durable stores are external collaborators implementing the
//! same trait.

mod memory;

pub use self::memory::MemoryRepository;

use thiserror::Error;

use crate::models::{PodRecord, PodSpec};

pub use async_trait::async_trait;

/// Errors surfaced by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("pod record {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// CRUD access to pod records keyed by an opaque 64-bit identifier.
///
/// Implementations guarantee identifier uniqueness and durability after
/// a successful write; nothing more is assumed of them.
#[async_trait]
pub trait PodRepository: Send + Sync {
    /// Insert a new record, returning the identifier assigned to it.
    async fn create(&self, spec: PodSpec) -> Result<i64, RepositoryError>;

    /// Remove the record with the given identifier.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Overwrite the record matching `record.id`.
    async fn update(&self, record: &PodRecord) -> Result<(), RepositoryError>;

    /// Fetch a single record by identifier.
    async fn find_by_id(&self, id: i64) -> Result<PodRecord, RepositoryError>;

    /// Fetch every stored record.
    async fn find_all(&self) -> Result<Vec<PodRecord>, RepositoryError>;
}
