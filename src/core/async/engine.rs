//! Thread-safe operation engine
//!
//! `AsyncLedgerEngine` applies operation records to a shared
//! [`SharedRegistry`]. It takes `&self`, so one engine behind an `Arc` can serve
//! any number of tasks. Dispatch is the same `apply_operation` used by the
//! synchronous engine.

use super::SharedRegistry;
use crate::core::account::Account;
use crate::core::engine::apply_operation;
use crate::types::{LedgerError, OperationRecord, Receipt};
use std::sync::Arc;

/// Engine over a concurrent account registry
#[derive(Debug, Clone)]
pub struct AsyncLedgerEngine {
    registry: Arc<SharedRegistry>,
}

impl AsyncLedgerEngine {
    /// Create an engine over the given registry
    pub fn new(registry: Arc<SharedRegistry>) -> Self {
        Self { registry }
    }

    /// Apply one record
    ///
    /// Safe to call from several threads. Records touching disjoint accounts
    /// proceed in parallel; records touching the same account are serialized
    /// by that account's lock.
    pub fn process(&self, record: &OperationRecord) -> Result<Receipt, LedgerError> {
        let mut store = self.registry.as_ref();
        apply_operation(&mut store, record)
    }

    /// Final account states, sorted by account number
    pub fn get_accounts(&self) -> Vec<Account> {
        self.registry.accounts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationType;
    use rust_decimal::Decimal;
    use std::thread;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    #[test]
    fn test_process_open_and_deposit() {
        let engine = AsyncLedgerEngine::new(Arc::new(SharedRegistry::new()));

        engine
            .process(
                &OperationRecord::new(OperationType::Open, "A")
                    .with_owner("Ada")
                    .with_amount(dec(10)),
            )
            .unwrap();
        let receipt = engine
            .process(&OperationRecord::new(OperationType::Deposit, "A").with_amount(dec(5)))
            .unwrap();

        assert_eq!(receipt.balance, dec(15));
        assert_eq!(engine.get_accounts().len(), 1);
    }

    #[test]
    fn test_engine_shared_across_threads() {
        let registry = Arc::new(SharedRegistry::new());
        registry.open("A", "Ada", dec(0)).unwrap();
        let engine = AsyncLedgerEngine::new(Arc::clone(&registry));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let engine = engine.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let record =
                        OperationRecord::new(OperationType::Deposit, "A").with_amount(dec(1));
                    engine.process(&record).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.get("A").unwrap().balance(), dec(400));
    }
}
