//! The persistence boundary.
//!
//! The engine hands every accepted record to a [`RecordSink`] and awaits the
//! outcome before moving on to the next row. [`MemoryStore`] is the sink
//! used by the HTTP adapter and the tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::PersistError;
use crate::models::ExtractedRecord;

/// Stores extracted records.
///
/// `commit` and `rollback` are only called under
/// [`CommitPolicy::AllOrNothing`](super::CommitPolicy::AllOrNothing); sinks
/// that store each record independently can leave them as no-ops.
pub trait RecordSink {
    /// Stores one record.
    fn persist(
        &self,
        record: &ExtractedRecord,
    ) -> impl Future<Output = Result<(), PersistError>> + Send;

    /// Makes every record persisted so far durable.
    fn commit(&self) -> impl Future<Output = Result<(), PersistError>> + Send {
        async { Ok(()) }
    }

    /// Discards every record persisted so far.
    fn rollback(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// A record held by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// The batch that stored the record.
    pub batch: Uuid,
    /// The record itself.
    pub record: ExtractedRecord,
}

/// An in-memory record store shared across imports.
///
/// Records are indexed by batch, so the per-batch checks in
/// [`MemoryBatch::persist`] never look at other imports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    batches: Mutex<StoredBatches>,
}

#[derive(Debug, Default)]
struct StoredBatches {
    by_id: HashMap<Uuid, BatchRecords>,
    order: Vec<Uuid>,
}

#[derive(Debug, Default)]
struct BatchRecords {
    records: Vec<ExtractedRecord>,
    employees: HashSet<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new batch writing into this store.
    pub fn batch(self: &Arc<Self>) -> MemoryBatch {
        MemoryBatch {
            id: Uuid::new_v4(),
            store: Arc::clone(self),
        }
    }

    /// Returns a snapshot of every stored record, batch by batch.
    pub async fn records(&self) -> Vec<StoredRecord> {
        let batches = self.batches.lock().await;
        batches
            .order
            .iter()
            .filter_map(|id| batches.by_id.get(id).map(|entry| (*id, entry)))
            .flat_map(|(batch, entry)| {
                entry.records.iter().map(move |record| StoredRecord {
                    batch,
                    record: record.clone(),
                })
            })
            .collect()
    }

    /// Returns the records stored by one batch.
    pub async fn batch_records(&self, batch: Uuid) -> Vec<ExtractedRecord> {
        self.batches
            .lock()
            .await
            .by_id
            .get(&batch)
            .map(|entry| entry.records.clone())
            .unwrap_or_default()
    }

    /// Number of stored batches.
    pub async fn batch_count(&self) -> usize {
        self.batches.lock().await.by_id.len()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.batches
            .lock()
            .await
            .by_id
            .values()
            .map(|entry| entry.records.len())
            .sum()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// One import's view of a [`MemoryStore`].
///
/// An employee may appear at most once per batch; a second record with the
/// same identifier (ignoring ASCII case) is refused.
#[derive(Debug, Clone)]
pub struct MemoryBatch {
    id: Uuid,
    store: Arc<MemoryStore>,
}

impl MemoryBatch {
    /// The batch identifier stamped on every stored record.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl RecordSink for MemoryBatch {
    fn persist(
        &self,
        record: &ExtractedRecord,
    ) -> impl Future<Output = Result<(), PersistError>> + Send {
        let record = record.clone();
        async move {
            let Some(employee_id) = record.employee_id.clone() else {
                return Err(PersistError::new("record has no employee identifier"));
            };
            let employee_key = employee_id.to_ascii_lowercase();

            let mut batches = self.store.batches.lock().await;
            let StoredBatches { by_id, order } = &mut *batches;
            let entry = by_id.entry(self.id).or_insert_with(|| {
                order.push(self.id);
                BatchRecords::default()
            });
            if entry.employees.contains(&employee_key) {
                return Err(PersistError::new(format!(
                    "employee '{}' already appears in this import",
                    employee_id
                )));
            }

            entry.employees.insert(employee_key);
            entry.records.push(record);
            Ok(())
        }
    }

    fn rollback(&self) -> impl Future<Output = ()> + Send {
        async move {
            let mut batches = self.store.batches.lock().await;
            batches.by_id.remove(&self.id);
            batches.order.retain(|id| *id != self.id);
        }
    }
}
