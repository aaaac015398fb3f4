//! Core types, storage ports and authorization-aware services for the
//! interviewer resource manager.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement the traits in [`store`]; the HTTP layer calls the
//! services in [`service`] and maps [`Error`] to status codes.

// Native `async fn` in traits; the store traits spell out `Send` futures
// explicitly where it matters.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod document;
pub mod error;
pub mod fallback;
pub mod interview;
pub mod memory;
pub mod message;
pub mod service;
pub mod store;
pub mod take;
pub mod user;

#[cfg(test)]
mod flaky;

pub use error::{Error, ErrorKind, Result};
