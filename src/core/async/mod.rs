//! Thread-safe implementations of the core components
//!
//! This module provides concurrent counterparts of the registry and engine,
//! plus the batch processor that drives them from tokio tasks.
//!
//! # Architecture
//!
//! - **SharedRegistry**: accounts in a DashMap, one mutex per account, ordered
//!   locking for transfers
//! - **AsyncLedgerEngine**: applies records to a shared registry through `&self`
//! - **BatchProcessor**: splits batches into account-disjoint lanes and runs
//!   them concurrently
//!
//! # Thread Safety
//!
//! - Operations on different accounts proceed in parallel
//! - Operations on the same account are serialized by its lock
//! - A transfer holds both of its accounts' locks for the whole operation

pub mod batch_processor;
pub mod engine;
pub mod shared_registry;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::AsyncLedgerEngine;
pub use shared_registry::SharedRegistry;
