//! HTTP API for the BookHouse catalog.
//!
//! A thin layer over [`bookhouse_store::CatalogStore`]: routing, input
//! decoding and status-code mapping live here; every catalog rule (natural
//! keys, referential guards, idempotent usage adds) lives in the store.

mod api;

pub use api::build_router;
