//! In-memory pod record store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::{PodRepository, RepositoryError};
use crate::models::{PodRecord, PodSpec};

/// HashMap-backed repository with monotonically assigned identifiers.
#[derive(Debug)]
pub struct MemoryRepository {
    records: RwLock<HashMap<i64, PodRecord>>,
    next_id: AtomicI64,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl PodRepository for MemoryRepository {
    async fn create(&self, spec: PodSpec) -> Result<i64, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().await;
        records.insert(id, PodRecord::new(id, spec));
        Ok(id)
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        records
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn update(&self, record: &PodRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(record.id)),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<PodRecord, RepositoryError> {
        let records = self.records.read().await;
        records.get(&id).cloned().ok_or(RepositoryError::NotFound(id))
    }

    async fn find_all(&self) -> Result<Vec<PodRecord>, RepositoryError> {
        let records = self.records.read().await;
        let mut all: Vec<_> = records.values().cloned().collect();
        all.sort_by_key(|r| r.id);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PodSpec;

    fn spec(name: &str) -> PodSpec {
        PodSpec {
            name: name.to_string(),
            namespace: "default".to_string(),
            image: "nginx:1.25".to_string(),
            replicas: 1,
            ports: vec![],
            env: vec![],
            cpu_max: 0.25,
            memory_max: 128.0,
            pull_policy: "Always".to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let repo = MemoryRepository::new();
        let first = repo.create(spec("a")).await.unwrap();
        let second = repo.create(spec("b")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn find_by_id_returns_stored_record() {
        let repo = MemoryRepository::new();
        let id = repo.create(spec("web")).await.unwrap();

        let record = repo.find_by_id(id).await.unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.spec.name, "web");
    }

    #[tokio::test]
    async fn find_by_id_missing_is_not_found() {
        let repo = MemoryRepository::new();
        let err = repo.find_by_id(42).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(42)));
    }

    #[tokio::test]
    async fn update_overwrites_record() {
        let repo = MemoryRepository::new();
        let id = repo.create(spec("web")).await.unwrap();

        let mut record = repo.find_by_id(id).await.unwrap();
        record.spec.replicas = 5;
        repo.update(&record).await.unwrap();

        assert_eq!(repo.find_by_id(id).await.unwrap().spec.replicas, 5);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let repo = MemoryRepository::new();
        let record = PodRecord::new(7, spec("ghost"));
        let err = repo.update(&record).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(7)));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let repo = MemoryRepository::new();
        let id = repo.create(spec("web")).await.unwrap();

        repo.delete(id).await.unwrap();
        assert!(repo.find_by_id(id).await.is_err());

        let err = repo.delete(id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn find_all_returns_records_in_id_order() {
        let repo = MemoryRepository::new();
        repo.create(spec("a")).await.unwrap();
        repo.create(spec("b")).await.unwrap();
        repo.create(spec("c")).await.unwrap();

        let all = repo.find_all().await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.spec.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
