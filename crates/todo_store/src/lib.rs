//! Todo storage for the todo backend
//!
//! This crate provides the storage contract for todos and its backends: a
//! relational store on SQLite, a key-value store on a Redis hash, and an
//! in-memory store for tests. The backend is picked once at startup from a
//! [`StoreBackend`] value.

mod backend;
mod error;
mod kv;
mod memory;
mod sql;
mod traits;

pub use backend::*;
pub use error::*;
pub use kv::*;
pub use memory::*;
pub use sql::*;
pub use traits::*;
