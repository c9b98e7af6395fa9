//! Transient failure handling for locking transactions.
//!
//! [`classifier`] decides whether a store error is worth another attempt and
//! how long to wait first. [`policy`] runs a transaction body under that
//! decision with a bounded number of attempts and an optional deadline.

pub mod classifier;
pub mod policy;

pub use classifier::{classify_sqlite, classify_sqlstate, Classification, ErrorClass, TransactionErrorClassifier};
pub use policy::{Deadline, RetryPolicy};
