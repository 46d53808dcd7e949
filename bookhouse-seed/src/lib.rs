//! Seeding for BookHouse: desired-state datasets and the reconciler that
//! converges the store toward them.
//!
//! A [`SeedDataset`] describes entities by natural key and relations by the
//! natural keys of their parents. [`reconcile`] applies it with
//! look-up-before-insert upserts: missing rows are created, divergent fields
//! corrected, matching rows left untouched, and rows absent from the dataset
//! are never deleted. Running the same dataset any number of times leaves the
//! store exactly as one run would.

mod dataset;
mod reconcile;

pub use dataset::{BookSeed, BranchSeed, FacultySeed, SeedDataset, StockSeed, UsageSeed};
pub use reconcile::{reconcile, ReconcileReport};
