//! Desired-state description of the catalog.
//!
//! Relations reference their parents by natural key rather than surrogate id:
//! ids are only known once the entities themselves have been reconciled.

use bookhouse_store::CatalogResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Desired branch state. `name` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSeed {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Desired book state. `title` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSeed {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Desired faculty state. The name is both the natural key and the only field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultySeed {
    pub name: String,
}

/// Desired stock level for one (branch, book) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSeed {
    pub branch: String,
    pub book: String,
    pub copies: u32,
}

/// Desired usage fact for one (branch, book, faculty) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSeed {
    pub branch: String,
    pub book: String,
    pub faculty: String,
}

/// A complete desired-state dataset, applied by [`crate::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDataset {
    #[serde(default)]
    pub branches: Vec<BranchSeed>,
    #[serde(default)]
    pub books: Vec<BookSeed>,
    #[serde(default)]
    pub faculties: Vec<FacultySeed>,
    #[serde(default)]
    pub stock: Vec<StockSeed>,
    #[serde(default)]
    pub usage: Vec<UsageSeed>,
}

impl SeedDataset {
    /// The dataset the service ships with.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            branches: vec![
                BranchSeed {
                    name: "Main Branch".into(),
                    address: Some("1 Academic Street".into()),
                },
                BranchSeed {
                    name: "IT Branch".into(),
                    address: Some("42 Programmers Avenue".into()),
                },
            ],
            books: vec![
                BookSeed {
                    title: "Introduction to Algorithms".into(),
                    author: "Cormen et al.".into(),
                    year: Some(2009),
                },
                BookSeed {
                    title: "Introduction to Machine Learning".into(),
                    author: "A. N. Avtorov".into(),
                    year: Some(2020),
                },
            ],
            faculties: vec![
                FacultySeed {
                    name: "Faculty of Information Technology".into(),
                },
                FacultySeed {
                    name: "Faculty of Mathematics".into(),
                },
            ],
            stock: vec![
                StockSeed {
                    branch: "Main Branch".into(),
                    book: "Introduction to Algorithms".into(),
                    copies: 5,
                },
                StockSeed {
                    branch: "Main Branch".into(),
                    book: "Introduction to Machine Learning".into(),
                    copies: 2,
                },
                StockSeed {
                    branch: "IT Branch".into(),
                    book: "Introduction to Algorithms".into(),
                    copies: 3,
                },
            ],
            usage: vec![
                UsageSeed {
                    branch: "Main Branch".into(),
                    book: "Introduction to Algorithms".into(),
                    faculty: "Faculty of Information Technology".into(),
                },
                UsageSeed {
                    branch: "Main Branch".into(),
                    book: "Introduction to Algorithms".into(),
                    faculty: "Faculty of Mathematics".into(),
                },
                UsageSeed {
                    branch: "IT Branch".into(),
                    book: "Introduction to Algorithms".into(),
                    faculty: "Faculty of Information Technology".into(),
                },
                UsageSeed {
                    branch: "Main Branch".into(),
                    book: "Introduction to Machine Learning".into(),
                    faculty: "Faculty of Mathematics".into(),
                },
            ],
        }
    }

    /// Loads a caller-supplied dataset from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
