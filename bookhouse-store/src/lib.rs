//! Catalog store for BookHouse.
//!
//! Provides durable storage for the three entity kinds (books, branches,
//! faculties) and the two composite-key relations (per-branch stock,
//! per-branch-per-book faculty usage), plus the derived catalog queries.
//!
//! # Architecture
//!
//! - Entities carry a store-assigned surrogate id and a unique natural key
//!   (book title, branch name, faculty name)
//! - Relations are addressed by their composite key, never by surrogate id
//! - All listings are ordered: entities by id, relations by composite key
//! - Writes validate input and resolve natural keys before touching a row

mod catalog;
mod error;
mod store;

pub use catalog::{BranchBookCopies, BranchBookFaculties};
pub use error::{CatalogError, CatalogResult};
pub use store::CatalogStore;
