//! # SCPI Bench Core Library
//!
//! This crate is the core library for the `scpi_bench` application: discovery
//! and aliasing of laboratory measurement instruments, and table-driven
//! construction of the vendor control-language (SCPI-style) commands sent to
//! them. An operator scans the bus, names the instruments that answer, and
//! issues cataloged commands by name — never hand-typing raw command strings.
//!
//! ## Crate Structure
//!
//! - **`bench`**: The central [`bench::Bench`] hub tying the command catalog
//!   to the instrument registry for alias-addressed dispatch.
//! - **`catalog`**: Immutable per-model command descriptor tables, the
//!   parameter-specification grammar, value formatting, and template
//!   substitution.
//! - **`config`**: TOML-backed application settings.
//! - **`error`**: The [`error::BenchError`] taxonomy shared across the crate.
//! - **`registry`**: Identity-keyed instrument registry with alias assignment
//!   and snapshot-based dispatch.
//! - **`server`**: The HTTP/JSON request boundary.
//! - **`transport`**: The bus seam: resource enumeration and raw query/write
//!   primitives, with serial and mock implementations.

pub mod bench;
pub mod catalog;
pub mod config;
pub mod error;
pub mod registry;
pub mod server;
pub mod transport;
