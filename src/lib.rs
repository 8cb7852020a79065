//! Tidrapport - terminal time reporting with rolling snapshot backups
//!
//! This library provides the core functionality for the Tidrapport
//! application: a journal of worked shifts with derived pay, a snapshot
//! store for backups of that journal, and a lifecycle manager that
//! schedules automatic backups and enforces retention.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings and the backup preference store
//! - `error`: Custom error types
//! - `models`: Time entries, money and pay rules
//! - `storage`: JSON file storage, snapshot files and serializers
//! - `backup`: Backup scheduling, retention and restore
//! - `export`: JSON, YAML, CSV and TSV export
//! - `cli`: Command handlers for the `tidrapport` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use tidrapport::config::paths::TidrapportPaths;
//! use tidrapport::storage::Storage;
//!
//! let paths = TidrapportPaths::new()?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod storage;

pub use error::TidrapportError;
