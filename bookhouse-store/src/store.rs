//! Entity store: CRUD over the catalog tables and natural-key resolution.

use crate::error::{CatalogError, CatalogResult};
use bookhouse_db::Database;
use bookhouse_types::{
    Book, BookFields, BookId, Branch, BranchFields, BranchId, EntityKind, Faculty, FacultyId,
    FacultyUsage, StockLevel,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// Durable store for the catalog.
///
/// Cheap to clone; clones share the underlying connection. Every public
/// method takes the connection for the duration of the call, so each call is
/// one serialized unit of work against the store.
#[derive(Clone)]
pub struct CatalogStore {
    db: Database,
}

impl CatalogStore {
    /// Wraps an already-opened database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens (or creates) a store backed by the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> CatalogResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Runs `f` with exclusive access to the connection.
    pub(crate) fn with_conn<T, F>(&self, f: F) -> CatalogResult<T>
    where
        F: FnOnce(&Connection) -> CatalogResult<T>,
    {
        self.db.with_conn(f)
    }

    // ── Books ────────────────────────────────────────────────────

    /// Lists all books, ordered by id ascending.
    pub fn list_books(&self) -> CatalogResult<Vec<Book>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, title, author, year FROM books ORDER BY id")?;
            let rows = stmt.query_map([], book_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Fetches one book by id.
    pub fn get_book(&self, id: BookId) -> CatalogResult<Book> {
        self.with_conn(|conn| require_book(conn, id))
    }

    /// Looks a book up by its exact title. Read-only.
    pub fn find_book_by_title(&self, title: &str) -> CatalogResult<Option<Book>> {
        self.with_conn(|conn| query_book_by_title(conn, title))
    }

    /// Creates a book, assigning the next surrogate id.
    pub fn create_book(&self, fields: &BookFields) -> CatalogResult<Book> {
        validate_book(fields)?;
        self.with_conn(|conn| {
            if query_book_by_title(conn, &fields.title)?.is_some() {
                return Err(CatalogError::Validation(format!(
                    "book title already in use: {}",
                    fields.title
                )));
            }
            conn.execute(
                "INSERT INTO books (title, author, year) VALUES (?1, ?2, ?3)",
                params![fields.title, fields.author, fields.year],
            )?;
            Ok(Book {
                id: BookId::from_i64(conn.last_insert_rowid()),
                title: fields.title.clone(),
                author: fields.author.clone(),
                year: fields.year,
            })
        })
    }

    /// Replaces all mutable fields of a book.
    pub fn update_book(&self, id: BookId, fields: &BookFields) -> CatalogResult<Book> {
        validate_book(fields)?;
        self.with_conn(|conn| {
            require_book(conn, id)?;
            if let Some(other) = query_book_by_title(conn, &fields.title)? {
                if other.id != id {
                    return Err(CatalogError::Validation(format!(
                        "book title already in use: {}",
                        fields.title
                    )));
                }
            }
            conn.execute(
                "UPDATE books SET title = ?1, author = ?2, year = ?3 WHERE id = ?4",
                params![fields.title, fields.author, fields.year, id.as_i64()],
            )?;
            Ok(Book {
                id,
                title: fields.title.clone(),
                author: fields.author.clone(),
                year: fields.year,
            })
        })
    }

    // ── Branches ─────────────────────────────────────────────────

    /// Lists all branches, ordered by id ascending.
    pub fn list_branches(&self) -> CatalogResult<Vec<Branch>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, address FROM branches ORDER BY id")?;
            let rows = stmt.query_map([], branch_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Fetches one branch by id.
    pub fn get_branch(&self, id: BranchId) -> CatalogResult<Branch> {
        self.with_conn(|conn| require_branch(conn, id))
    }

    /// Looks a branch up by its exact name. Read-only.
    pub fn find_branch_by_name(&self, name: &str) -> CatalogResult<Option<Branch>> {
        self.with_conn(|conn| query_branch_by_name(conn, name))
    }

    /// Creates a branch, assigning the next surrogate id.
    pub fn create_branch(&self, fields: &BranchFields) -> CatalogResult<Branch> {
        validate_branch(fields)?;
        self.with_conn(|conn| {
            if query_branch_by_name(conn, &fields.name)?.is_some() {
                return Err(CatalogError::Validation(format!(
                    "branch name already in use: {}",
                    fields.name
                )));
            }
            conn.execute(
                "INSERT INTO branches (name, address) VALUES (?1, ?2)",
                params![fields.name, fields.address],
            )?;
            Ok(Branch {
                id: BranchId::from_i64(conn.last_insert_rowid()),
                name: fields.name.clone(),
                address: fields.address.clone(),
            })
        })
    }

    /// Replaces all mutable fields of a branch.
    pub fn update_branch(&self, id: BranchId, fields: &BranchFields) -> CatalogResult<Branch> {
        validate_branch(fields)?;
        self.with_conn(|conn| {
            require_branch(conn, id)?;
            if let Some(other) = query_branch_by_name(conn, &fields.name)? {
                if other.id != id {
                    return Err(CatalogError::Validation(format!(
                        "branch name already in use: {}",
                        fields.name
                    )));
                }
            }
            conn.execute(
                "UPDATE branches SET name = ?1, address = ?2 WHERE id = ?3",
                params![fields.name, fields.address, id.as_i64()],
            )?;
            Ok(Branch {
                id,
                name: fields.name.clone(),
                address: fields.address.clone(),
            })
        })
    }

    // ── Faculties ────────────────────────────────────────────────

    /// Lists all faculties, ordered by id ascending.
    pub fn list_faculties(&self) -> CatalogResult<Vec<Faculty>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM faculties ORDER BY id")?;
            let rows = stmt.query_map([], faculty_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Fetches one faculty by id.
    pub fn get_faculty(&self, id: FacultyId) -> CatalogResult<Faculty> {
        self.with_conn(|conn| require_faculty(conn, id))
    }

    /// Looks a faculty up by its exact name. Read-only.
    pub fn find_faculty_by_name(&self, name: &str) -> CatalogResult<Option<Faculty>> {
        self.with_conn(|conn| query_faculty_by_name(conn, name))
    }

    /// Creates a faculty, assigning the next surrogate id.
    pub fn create_faculty(&self, name: &str) -> CatalogResult<Faculty> {
        if name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "faculty name must not be blank".into(),
            ));
        }
        self.with_conn(|conn| {
            if query_faculty_by_name(conn, name)?.is_some() {
                return Err(CatalogError::Validation(format!(
                    "faculty name already in use: {name}"
                )));
            }
            conn.execute("INSERT INTO faculties (name) VALUES (?1)", params![name])?;
            Ok(Faculty {
                id: FacultyId::from_i64(conn.last_insert_rowid()),
                name: name.to_owned(),
            })
        })
    }

    // ── Stock (branch × book) ────────────────────────────────────

    /// Fetches the stock row for (branch, book), if one exists.
    ///
    /// `None` means no row; callers that want the "missing reads as zero"
    /// semantics go through [`CatalogStore::copies_of`] instead.
    pub fn get_stock(
        &self,
        branch_id: BranchId,
        book_id: BookId,
    ) -> CatalogResult<Option<StockLevel>> {
        self.with_conn(|conn| query_stock(conn, branch_id, book_id))
    }

    /// Creates the stock row for (branch, book). Both parents must exist.
    pub fn create_stock(&self, level: StockLevel) -> CatalogResult<StockLevel> {
        self.with_conn(|conn| {
            require_branch(conn, level.branch_id)?;
            require_book(conn, level.book_id)?;
            conn.execute(
                "INSERT INTO branch_stock (branch_id, book_id, copies) VALUES (?1, ?2, ?3)",
                params![level.branch_id.as_i64(), level.book_id.as_i64(), level.copies],
            )?;
            Ok(level)
        })
    }

    /// Sets the copy count on an existing stock row.
    pub fn update_stock_copies(
        &self,
        branch_id: BranchId,
        book_id: BookId,
        copies: u32,
    ) -> CatalogResult<StockLevel> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE branch_stock SET copies = ?1 WHERE branch_id = ?2 AND book_id = ?3",
                params![copies, branch_id.as_i64(), book_id.as_i64()],
            )?;
            if changed == 0 {
                return Err(CatalogError::not_found(
                    EntityKind::Stock,
                    stock_key(branch_id, book_id),
                ));
            }
            Ok(StockLevel {
                branch_id,
                book_id,
                copies,
            })
        })
    }

    /// Lists all stock rows, ordered by (branch_id, book_id).
    pub fn list_stock(&self) -> CatalogResult<Vec<StockLevel>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT branch_id, book_id, copies FROM branch_stock ORDER BY branch_id, book_id",
            )?;
            let rows = stmt.query_map([], stock_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    // ── Usage (branch × book × faculty) ──────────────────────────

    /// Fetches the usage row for the given triple, if one exists.
    pub fn get_usage(&self, usage: FacultyUsage) -> CatalogResult<Option<FacultyUsage>> {
        self.with_conn(|conn| query_usage(conn, usage))
    }

    /// Creates a usage row. All three parents must exist.
    pub fn create_usage(&self, usage: FacultyUsage) -> CatalogResult<FacultyUsage> {
        self.with_conn(|conn| {
            require_branch(conn, usage.branch_id)?;
            require_book(conn, usage.book_id)?;
            require_faculty(conn, usage.faculty_id)?;
            insert_usage(conn, usage)?;
            Ok(usage)
        })
    }

    /// Lists all usage rows, ordered by (branch_id, book_id, faculty_id).
    pub fn list_usage(&self) -> CatalogResult<Vec<FacultyUsage>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT branch_id, book_id, faculty_id FROM book_faculties \
                 ORDER BY branch_id, book_id, faculty_id",
            )?;
            let rows = stmt.query_map([], usage_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }
}

// ── Row mapping ──────────────────────────────────────────────────

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: BookId::from_i64(row.get(0)?),
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get(3)?,
    })
}

fn branch_from_row(row: &Row<'_>) -> rusqlite::Result<Branch> {
    Ok(Branch {
        id: BranchId::from_i64(row.get(0)?),
        name: row.get(1)?,
        address: row.get(2)?,
    })
}

fn faculty_from_row(row: &Row<'_>) -> rusqlite::Result<Faculty> {
    Ok(Faculty {
        id: FacultyId::from_i64(row.get(0)?),
        name: row.get(1)?,
    })
}

fn stock_from_row(row: &Row<'_>) -> rusqlite::Result<StockLevel> {
    Ok(StockLevel {
        branch_id: BranchId::from_i64(row.get(0)?),
        book_id: BookId::from_i64(row.get(1)?),
        copies: row.get(2)?,
    })
}

fn usage_from_row(row: &Row<'_>) -> rusqlite::Result<FacultyUsage> {
    Ok(FacultyUsage {
        branch_id: BranchId::from_i64(row.get(0)?),
        book_id: BookId::from_i64(row.get(1)?),
        faculty_id: FacultyId::from_i64(row.get(2)?),
    })
}

// ── Connection-level queries ─────────────────────────────────────
// Shared between the public methods above and the catalog facade so that a
// guard plus its follow-up query run under one lock acquisition.

pub(crate) fn query_book(conn: &Connection, id: BookId) -> CatalogResult<Option<Book>> {
    Ok(conn
        .query_row(
            "SELECT id, title, author, year FROM books WHERE id = ?1",
            params![id.as_i64()],
            book_from_row,
        )
        .optional()?)
}

pub(crate) fn query_book_by_title(conn: &Connection, title: &str) -> CatalogResult<Option<Book>> {
    Ok(conn
        .query_row(
            "SELECT id, title, author, year FROM books WHERE title = ?1",
            params![title],
            book_from_row,
        )
        .optional()?)
}

pub(crate) fn query_branch(conn: &Connection, id: BranchId) -> CatalogResult<Option<Branch>> {
    Ok(conn
        .query_row(
            "SELECT id, name, address FROM branches WHERE id = ?1",
            params![id.as_i64()],
            branch_from_row,
        )
        .optional()?)
}

pub(crate) fn query_branch_by_name(conn: &Connection, name: &str) -> CatalogResult<Option<Branch>> {
    Ok(conn
        .query_row(
            "SELECT id, name, address FROM branches WHERE name = ?1",
            params![name],
            branch_from_row,
        )
        .optional()?)
}

pub(crate) fn query_faculty(conn: &Connection, id: FacultyId) -> CatalogResult<Option<Faculty>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM faculties WHERE id = ?1",
            params![id.as_i64()],
            faculty_from_row,
        )
        .optional()?)
}

pub(crate) fn query_faculty_by_name(
    conn: &Connection,
    name: &str,
) -> CatalogResult<Option<Faculty>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM faculties WHERE name = ?1",
            params![name],
            faculty_from_row,
        )
        .optional()?)
}

pub(crate) fn query_stock(
    conn: &Connection,
    branch_id: BranchId,
    book_id: BookId,
) -> CatalogResult<Option<StockLevel>> {
    Ok(conn
        .query_row(
            "SELECT branch_id, book_id, copies FROM branch_stock \
             WHERE branch_id = ?1 AND book_id = ?2",
            params![branch_id.as_i64(), book_id.as_i64()],
            stock_from_row,
        )
        .optional()?)
}

pub(crate) fn query_usage(
    conn: &Connection,
    usage: FacultyUsage,
) -> CatalogResult<Option<FacultyUsage>> {
    Ok(conn
        .query_row(
            "SELECT branch_id, book_id, faculty_id FROM book_faculties \
             WHERE branch_id = ?1 AND book_id = ?2 AND faculty_id = ?3",
            params![
                usage.branch_id.as_i64(),
                usage.book_id.as_i64(),
                usage.faculty_id.as_i64()
            ],
            usage_from_row,
        )
        .optional()?)
}

pub(crate) fn insert_usage(conn: &Connection, usage: FacultyUsage) -> CatalogResult<()> {
    conn.execute(
        "INSERT INTO book_faculties (branch_id, book_id, faculty_id) VALUES (?1, ?2, ?3)",
        params![
            usage.branch_id.as_i64(),
            usage.book_id.as_i64(),
            usage.faculty_id.as_i64()
        ],
    )?;
    Ok(())
}

// ── Existence guards ─────────────────────────────────────────────

pub(crate) fn require_book(conn: &Connection, id: BookId) -> CatalogResult<Book> {
    query_book(conn, id)?.ok_or_else(|| CatalogError::not_found(EntityKind::Book, id))
}

pub(crate) fn require_branch(conn: &Connection, id: BranchId) -> CatalogResult<Branch> {
    query_branch(conn, id)?.ok_or_else(|| CatalogError::not_found(EntityKind::Branch, id))
}

pub(crate) fn require_faculty(conn: &Connection, id: FacultyId) -> CatalogResult<Faculty> {
    query_faculty(conn, id)?.ok_or_else(|| CatalogError::not_found(EntityKind::Faculty, id))
}

pub(crate) fn stock_key(branch_id: BranchId, book_id: BookId) -> String {
    format!("branch {branch_id} / book {book_id}")
}

// ── Validation ───────────────────────────────────────────────────
// Rejected before any store mutation.

fn validate_book(fields: &BookFields) -> CatalogResult<()> {
    if fields.title.trim().is_empty() {
        return Err(CatalogError::Validation("book title must not be blank".into()));
    }
    if fields.author.trim().is_empty() {
        return Err(CatalogError::Validation(
            "book author must not be blank".into(),
        ));
    }
    Ok(())
}

fn validate_branch(fields: &BranchFields) -> CatalogResult<()> {
    if fields.name.trim().is_empty() {
        return Err(CatalogError::Validation(
            "branch name must not be blank".into(),
        ));
    }
    Ok(())
}
