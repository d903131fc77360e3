//! Read-only access to borrowers and loans
//!
//! [`LendingStore`] is the seam between the detail service and storage. The
//! query descriptors spell out exactly what is asked of storage (filter,
//! ordering, limit) so callers never sort or filter on their side.

mod postgres;

pub use postgres::PgLendingStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Borrower, Loan};

/// Single-record lookup of a borrower by primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowerLookup {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Columns loan history may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanColumn {
    CreatedAt,
}

impl LoanColumn {
    pub fn as_sql(&self) -> &'static str {
        match self {
            LoanColumn::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: LoanColumn,
    pub direction: SortDirection,
}

/// All loans of one borrower
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanHistoryQuery {
    pub borrower_id: Uuid,
    pub order_by: OrderBy,
    /// `None` returns the full history
    pub limit: Option<u32>,
}

impl LoanHistoryQuery {
    /// Full history, newest first
    pub fn newest_first(borrower_id: Uuid) -> Self {
        Self {
            borrower_id,
            order_by: OrderBy {
                column: LoanColumn::CreatedAt,
                direction: SortDirection::Descending,
            },
            limit: None,
        }
    }
}

/// Read-query service over the `borrowers` and `loans` tables
#[async_trait]
pub trait LendingStore: Send + Sync {
    /// `Ok(None)` when no borrower has this id
    async fn find_borrower(&self, lookup: BorrowerLookup) -> anyhow::Result<Option<Borrower>>;

    /// Loans in the order requested by `query`
    async fn list_loans(&self, query: LoanHistoryQuery) -> anyhow::Result<Vec<Loan>>;

    /// Connectivity check for health reporting
    async fn ping(&self) -> anyhow::Result<()>;
}
