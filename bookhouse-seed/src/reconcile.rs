//! The upsert engine: converges store state toward a [`SeedDataset`].

use crate::SeedDataset;
use bookhouse_store::{CatalogError, CatalogResult, CatalogStore};
use bookhouse_types::{
    BookFields, BookId, BranchFields, BranchId, EntityKind, FacultyId, FacultyUsage, StockLevel,
};
use std::collections::HashMap;
use tracing::info;

/// Row counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Converges the store to include everything in `dataset`.
///
/// Entities are reconciled before the relations that reference them, in
/// dataset order: branches, books, faculties, then stock, then usage. Each
/// row is resolved by its natural (or composite) key; a missing row is
/// created, a row with divergent non-key fields gets one full field update,
/// and a matching row causes no write. Rows present in the store but absent
/// from the dataset are left alone.
///
/// A relation whose parent resolves neither inside the dataset nor in the
/// store fails with `NotFound` and aborts the remainder of the pass; each
/// completed step is already durable, and a re-run converges.
pub fn reconcile(store: &CatalogStore, dataset: &SeedDataset) -> CatalogResult<ReconcileReport> {
    let mut report = ReconcileReport::default();

    // Ids assigned (or discovered) during this pass, so relations can
    // reference entities seeded moments ago.
    let mut branch_ids: HashMap<String, BranchId> = HashMap::new();
    let mut book_ids: HashMap<String, BookId> = HashMap::new();
    let mut faculty_ids: HashMap<String, FacultyId> = HashMap::new();

    for seed in &dataset.branches {
        let fields = BranchFields {
            name: seed.name.clone(),
            address: seed.address.clone(),
        };
        let id = match store.find_branch_by_name(&seed.name)? {
            None => {
                let created = store.create_branch(&fields)?;
                report.created += 1;
                created.id
            }
            Some(existing) if existing.address != seed.address => {
                store.update_branch(existing.id, &fields)?;
                report.updated += 1;
                existing.id
            }
            Some(existing) => {
                report.unchanged += 1;
                existing.id
            }
        };
        branch_ids.insert(seed.name.clone(), id);
    }

    for seed in &dataset.books {
        let fields = BookFields {
            title: seed.title.clone(),
            author: seed.author.clone(),
            year: seed.year,
        };
        let id = match store.find_book_by_title(&seed.title)? {
            None => {
                let created = store.create_book(&fields)?;
                report.created += 1;
                created.id
            }
            Some(existing) if existing.author != seed.author || existing.year != seed.year => {
                store.update_book(existing.id, &fields)?;
                report.updated += 1;
                existing.id
            }
            Some(existing) => {
                report.unchanged += 1;
                existing.id
            }
        };
        book_ids.insert(seed.title.clone(), id);
    }

    for seed in &dataset.faculties {
        // The name is the whole record, so there is no update case.
        let id = match store.find_faculty_by_name(&seed.name)? {
            None => {
                let created = store.create_faculty(&seed.name)?;
                report.created += 1;
                created.id
            }
            Some(existing) => {
                report.unchanged += 1;
                existing.id
            }
        };
        faculty_ids.insert(seed.name.clone(), id);
    }

    for seed in &dataset.stock {
        let branch_id = resolve_branch(store, &branch_ids, &seed.branch)?;
        let book_id = resolve_book(store, &book_ids, &seed.book)?;
        match store.get_stock(branch_id, book_id)? {
            None => {
                store.create_stock(StockLevel {
                    branch_id,
                    book_id,
                    copies: seed.copies,
                })?;
                report.created += 1;
            }
            Some(existing) if existing.copies != seed.copies => {
                store.update_stock_copies(branch_id, book_id, seed.copies)?;
                report.updated += 1;
            }
            Some(_) => report.unchanged += 1,
        }
    }

    for seed in &dataset.usage {
        let usage = FacultyUsage {
            branch_id: resolve_branch(store, &branch_ids, &seed.branch)?,
            book_id: resolve_book(store, &book_ids, &seed.book)?,
            faculty_id: resolve_faculty(store, &faculty_ids, &seed.faculty)?,
        };
        // Presence-only: either the fact is recorded or it is not.
        if store.get_usage(usage)?.is_none() {
            store.create_usage(usage)?;
            report.created += 1;
        } else {
            report.unchanged += 1;
        }
    }

    info!(
        created = report.created,
        updated = report.updated,
        unchanged = report.unchanged,
        "reconciled seed dataset"
    );
    Ok(report)
}

fn resolve_branch(
    store: &CatalogStore,
    ids: &HashMap<String, BranchId>,
    name: &str,
) -> CatalogResult<BranchId> {
    if let Some(id) = ids.get(name) {
        return Ok(*id);
    }
    store
        .find_branch_by_name(name)?
        .map(|branch| branch.id)
        .ok_or_else(|| CatalogError::not_found(EntityKind::Branch, name))
}

fn resolve_book(
    store: &CatalogStore,
    ids: &HashMap<String, BookId>,
    title: &str,
) -> CatalogResult<BookId> {
    if let Some(id) = ids.get(title) {
        return Ok(*id);
    }
    store
        .find_book_by_title(title)?
        .map(|book| book.id)
        .ok_or_else(|| CatalogError::not_found(EntityKind::Book, title))
}

fn resolve_faculty(
    store: &CatalogStore,
    ids: &HashMap<String, FacultyId>,
    name: &str,
) -> CatalogResult<FacultyId> {
    if let Some(id) = ids.get(name) {
        return Ok(*id);
    }
    store
        .find_faculty_by_name(name)?
        .map(|faculty| faculty.id)
        .ok_or_else(|| CatalogError::not_found(EntityKind::Faculty, name))
}
