//! CLI command handlers

pub mod commands;

pub use commands::{csv, export, init_tracing, inspect, xls};
