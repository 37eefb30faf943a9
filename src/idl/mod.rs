//! # IDL Module
//!
//! The canonical schema model and the loader that produces it.
//!
//! A document declares messages (records with typed fields) and services
//! (collections of methods) keyed by name:
//!
//! ```yaml
//! name: UserService
//! version: 1.0.0
//! package: users
//! messages:
//!   User:
//!     fields:
//!       id: { type: int64, required: true }
//!       name: { type: string }
//! services:
//!   Users:
//!     methods:
//!       Get: { input: int64, output: User }
//! ```
//!
//! Loading decodes the document, stamps each map key onto the entity's name,
//! orders every collection by name, and validates the invariants in
//! [`validate`]. Type tokens are free text here; unresolved references are
//! reported by the [`linter`](crate::linter), never by the loader.

mod load;
mod types;

pub use load::*;
pub use types::*;
