//! Batch processing with account-connected lanes
//!
//! A batch of operation records is split into *lanes*. Two records share a lane
//! when they touch a common account, directly or through a chain of transfers.
//! Lanes therefore never share an account: they run as concurrent tokio tasks,
//! and each lane replays its records in their original order. The resulting
//! account states are the same as a sequential replay of the batch.
//!
//! Batches themselves are processed one after another by the caller.

use super::AsyncLedgerEngine;
use crate::types::{LedgerError, OperationRecord, Receipt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinError;

/// Result of processing a single record
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The record that was processed
    pub record: OperationRecord,

    /// The outcome of processing it
    pub result: Result<Receipt, LedgerError>,
}

/// Batch processor with lane partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    engine: Arc<AsyncLedgerEngine>,
}

impl BatchProcessor {
    pub fn new(engine: Arc<AsyncLedgerEngine>) -> Self {
        Self { engine }
    }

    /// Split a batch into account-disjoint lanes
    ///
    /// # Guarantees
    ///
    /// - Each record appears in exactly one lane
    /// - Records within a lane keep their original relative order
    /// - No account is touched by records of two different lanes
    /// - Lanes are returned in order of their first record
    pub fn partition_into_lanes(&self, batch: Vec<OperationRecord>) -> Vec<Vec<OperationRecord>> {
        let mut accounts = AccountSets::default();
        for record in &batch {
            let mut touched = record.touched_accounts();
            if let Some(first) = touched.next() {
                let first = accounts.id(first);
                for other in touched {
                    let other = accounts.id(other);
                    accounts.union(first, other);
                }
            }
        }

        let mut lane_of_root: HashMap<usize, usize> = HashMap::new();
        let mut lanes: Vec<Vec<OperationRecord>> = Vec::new();
        for record in batch {
            let id = accounts.id(&record.account);
            let root = accounts.find(id);
            let lane = *lane_of_root.entry(root).or_insert_with(|| {
                lanes.push(Vec::new());
                lanes.len() - 1
            });
            lanes[lane].push(record);
        }
        lanes
    }

    /// Process one lane's records sequentially
    ///
    /// Failures are captured in the results and do not stop the lane.
    pub fn process_lane(&self, records: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        records
            .into_iter()
            .map(|record| {
                let result = self.engine.process(&record);
                ProcessingResult { record, result }
            })
            .collect()
    }

    /// Process a batch, one tokio task per lane
    ///
    /// Results are grouped by lane; the order across lanes is unspecified.
    /// Every record gets exactly one result, including the records of a lane
    /// whose task failed.
    pub async fn process_batch(&self, batch: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        let lanes = self.partition_into_lanes(batch);

        let mut tasks = Vec::with_capacity(lanes.len());
        for lane in lanes {
            let processor = self.clone();
            let records = lane.clone();
            tasks.push((records, tokio::spawn(async move { processor.process_lane(lane) })));
        }

        let mut results = Vec::new();
        for (records, task) in tasks {
            results.extend(lane_outcome(records, task.await));
        }
        results
    }
}

/// Results of a joined lane task
///
/// A task that panicked or was cancelled fails each of its records with
/// `TaskFailed`; whether any of them reached the store is unknown.
fn lane_outcome(
    records: Vec<OperationRecord>,
    joined: Result<Vec<ProcessingResult>, JoinError>,
) -> Vec<ProcessingResult> {
    match joined {
        Ok(results) => results,
        Err(e) => {
            tracing::error!(error = %e, records = records.len(), "lane task failed");
            let message = e.to_string();
            records
                .into_iter()
                .map(|record| ProcessingResult {
                    record,
                    result: Err(LedgerError::TaskFailed {
                        message: message.clone(),
                    }),
                })
                .collect()
        }
    }
}

/// Disjoint sets over account numbers
#[derive(Debug, Default)]
struct AccountSets {
    ids: HashMap<String, usize>,
    parent: Vec<usize>,
}

impl AccountSets {
    fn id(&mut self, account: &str) -> usize {
        if let Some(&id) = self.ids.get(account) {
            return id;
        }
        let id = self.parent.len();
        self.parent.push(id);
        self.ids.insert(account.to_string(), id);
        id
    }

    fn find(&mut self, mut id: usize) -> usize {
        while self.parent[id] != id {
            self.parent[id] = self.parent[self.parent[id]];
            id = self.parent[id];
        }
        id
    }

    fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a != b {
            self.parent[b] = a;
        }
    }
}
