use crate::{BookId, BranchId, FacultyId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A book in the catalog. `title` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: Option<i32>,
}

/// A library branch. `name` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub address: Option<String>,
}

/// A faculty that uses books. `name` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
}

/// Stock of one book at one branch, keyed by (branch_id, book_id).
///
/// At most one row exists per pair. A missing row reads as zero copies but
/// is distinct from a persisted row with `copies == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub branch_id: BranchId,
    pub book_id: BookId,
    pub copies: u32,
}

/// A membership fact: the faculty uses the book at the branch.
///
/// Keyed by the full (branch_id, book_id, faculty_id) triple; carries no
/// payload beyond the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacultyUsage {
    pub branch_id: BranchId,
    pub book_id: BookId,
    pub faculty_id: FacultyId,
}

/// Mutable fields of a book, used as create/update input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Mutable fields of a branch, used as create/update input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchFields {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// The kinds of rows the store manages. Used to identify what was missing
/// or malformed in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Branch,
    Faculty,
    Stock,
    Usage,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Book => "book",
            EntityKind::Branch => "branch",
            EntityKind::Faculty => "faculty",
            EntityKind::Stock => "stock entry",
            EntityKind::Usage => "faculty usage",
        };
        f.write_str(s)
    }
}
