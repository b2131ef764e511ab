//! hierflat - Flattened hierarchy tables for SAP BW hierarchies on ClickHouse
//!
//! This crate turns a parent/child hierarchy (BW hierarchy tables replicated
//! into ClickHouse) into a denormalized table with one column per hierarchy
//! level, through:
//! - Depth probing of a named hierarchy instance
//! - SQL generation (self-join chain, per-level CASE projection, locale text
//!   resolution)
//! - Full-refresh DDL execution with a bounded retry
//! - Bulk load/read helpers with progress reporting

pub mod bulk;
pub mod client;
pub mod config;
pub mod executor;
pub mod flatten_query_generator;
pub mod flattener;
pub mod hierarchy_catalog;
pub mod utils;
