//! Core business logic - framework-agnostic ledger operations.
//!
//! Reference-data CRUD, the order aggregate with total reconciliation,
//! payment recording, period reporting, and workbook export. Everything here
//! returns structured data; rendering is the caller's concern.

/// Client reference-data operations
pub mod client;
/// Employee reference-data operations and roles
pub mod employee;
/// Workbook export built from computed report aggregates
pub mod export;
/// Order aggregate: creation, status, line items, total reconciliation
pub mod order;
/// Payment recording and per-order payment queries
pub mod payment;
/// Product reference-data operations
pub mod product;
/// Period report aggregation
pub mod report;
