//! Integration test common infrastructure.
//!
//! Provides an in-process application backed by a private in-memory
//! database, and helpers for sending JSON requests to it.

pub mod server;

#[allow(unused_imports)]
pub use server::{TestApp, TestResponse};
