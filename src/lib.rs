//! phonebook - REST backend for phonebook entries and phone numbers.
//!
//! Two resources, `/api/phonebook-entries` and `/api/phone-numbers`, backed
//! by SQLite. An entry groups zero or more numbers; a number optionally links
//! back to one entry.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod http;
pub mod metrics;
pub mod telemetry;
