//! Core type definitions for BookHouse.
//!
//! This crate defines the fundamental types used throughout the catalog
//! service:
//! - Surrogate identifiers for books, branches and faculties
//! - Entity records and the composite-key relation records
//! - Field bundles used as create/update input
//!
//! Storage, seeding and the HTTP layer all speak these types; anything
//! specific to SQL or to the wire format belongs in those crates, not here.

mod ids;
mod records;

pub use ids::{BookId, BranchId, FacultyId};
pub use records::{
    Book, BookFields, Branch, BranchFields, EntityKind, Faculty, FacultyUsage, StockLevel,
};
