//! Derived catalog queries: copy counts and faculty usage per (branch, book).
//!
//! Every query guards that the referenced parents exist before reading the
//! relation tables, so a dangling id surfaces as `NotFound` naming the
//! missing entity rather than as an empty result.

use crate::error::CatalogResult;
use crate::store::{
    insert_usage, query_stock, query_usage, require_book, require_branch, require_faculty,
    CatalogStore,
};
use bookhouse_types::{BookId, BranchId, Faculty, FacultyId, FacultyUsage};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// How many copies of a book a branch holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchBookCopies {
    pub branch_id: BranchId,
    pub book_id: BookId,
    pub copies: u32,
}

/// The faculties using a book at a branch, ordered by faculty id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchBookFaculties {
    pub branch_id: BranchId,
    pub book_id: BookId,
    pub faculty_count: usize,
    pub faculties: Vec<Faculty>,
}

impl CatalogStore {
    /// Returns the number of copies of `book_id` held at `branch_id`.
    ///
    /// A missing stock row reads as zero. Fails with `NotFound` if the branch
    /// or the book does not exist, checked before the stock lookup.
    pub fn copies_of(
        &self,
        branch_id: BranchId,
        book_id: BookId,
    ) -> CatalogResult<BranchBookCopies> {
        self.with_conn(|conn| {
            require_branch(conn, branch_id)?;
            require_book(conn, book_id)?;
            let copies = query_stock(conn, branch_id, book_id)?
                .map(|level| level.copies)
                .unwrap_or(0);
            Ok(BranchBookCopies {
                branch_id,
                book_id,
                copies,
            })
        })
    }

    /// Returns the faculties using `book_id` at `branch_id`, ordered by
    /// faculty id ascending.
    ///
    /// An empty list is success, not an error. Fails with `NotFound` if the
    /// branch or the book does not exist.
    pub fn faculties_using(
        &self,
        branch_id: BranchId,
        book_id: BookId,
    ) -> CatalogResult<BranchBookFaculties> {
        self.with_conn(|conn| {
            require_branch(conn, branch_id)?;
            require_book(conn, book_id)?;
            faculties_using_on(conn, branch_id, book_id)
        })
    }

    /// Records that `faculty_id` uses `book_id` at `branch_id` and returns
    /// the refreshed faculty list.
    ///
    /// Re-adding an existing triple is an idempotent no-op. Fails with
    /// `NotFound` if any of the three referenced entities does not exist.
    pub fn add_usage(
        &self,
        branch_id: BranchId,
        book_id: BookId,
        faculty_id: FacultyId,
    ) -> CatalogResult<BranchBookFaculties> {
        self.with_conn(|conn| {
            require_branch(conn, branch_id)?;
            require_book(conn, book_id)?;
            require_faculty(conn, faculty_id)?;
            let usage = FacultyUsage {
                branch_id,
                book_id,
                faculty_id,
            };
            if query_usage(conn, usage)?.is_none() {
                insert_usage(conn, usage)?;
            }
            faculties_using_on(conn, branch_id, book_id)
        })
    }
}

fn faculties_using_on(
    conn: &Connection,
    branch_id: BranchId,
    book_id: BookId,
) -> CatalogResult<BranchBookFaculties> {
    let mut stmt = conn.prepare(
        "SELECT f.id, f.name FROM faculties f \
         JOIN book_faculties bf ON bf.faculty_id = f.id \
         WHERE bf.branch_id = ?1 AND bf.book_id = ?2 \
         ORDER BY f.id",
    )?;
    let rows = stmt.query_map(params![branch_id.as_i64(), book_id.as_i64()], |row| {
        Ok(Faculty {
            id: FacultyId::from_i64(row.get(0)?),
            name: row.get(1)?,
        })
    })?;
    let faculties = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(BranchBookFaculties {
        branch_id,
        book_id,
        faculty_count: faculties.len(),
        faculties,
    })
}
