//! Core entity definitions for the todo backend.
//!
//! This crate defines the todo record shared by the stores and the HTTP
//! server, together with the allocator that hands out todo identifiers.

mod id_allocator;
mod todo;

pub use id_allocator::*;
pub use todo::*;
