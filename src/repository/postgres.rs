//! PostgreSQL implementation of [`LendingStore`]

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::{BorrowerLookup, LendingStore, LoanHistoryQuery};
use crate::models::{Borrower, Loan};

const BORROWER_BY_ID: &str = r#"
    SELECT id, full_name, id_number, phone, email, address,
           guarantor_name, guarantor_phone, guarantor_address
    FROM borrowers
    WHERE id = $1
"#;

/// Store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgLendingStore {
    db_pool: PgPool,
}

impl PgLendingStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

/// SQL for a loan history query. Ordering and limit come from closed enums
/// and integers, never from request text.
pub(crate) fn loan_history_sql(query: &LoanHistoryQuery) -> String {
    let mut sql = format!(
        "SELECT id, borrower_id, disbursement_date, principal, total_payable, \
         status::text AS status, created_at \
         FROM loans WHERE borrower_id = $1 ORDER BY {} {}",
        query.order_by.column.as_sql(),
        query.order_by.direction.as_sql(),
    );
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    sql
}

#[async_trait]
impl LendingStore for PgLendingStore {
    async fn find_borrower(&self, lookup: BorrowerLookup) -> anyhow::Result<Option<Borrower>> {
        let borrower = sqlx::query_as::<_, Borrower>(BORROWER_BY_ID)
            .bind(lookup.id)
            .fetch_optional(&self.db_pool)
            .await
            .with_context(|| format!("Failed to load borrower {}", lookup.id))?;

        Ok(borrower)
    }

    async fn list_loans(&self, query: LoanHistoryQuery) -> anyhow::Result<Vec<Loan>> {
        let sql = loan_history_sql(&query);
        let loans = sqlx::query_as::<_, Loan>(&sql)
            .bind(query.borrower_id)
            .fetch_all(&self.db_pool)
            .await
            .with_context(|| format!("Failed to load loans for borrower {}", query.borrower_id))?;

        tracing::debug!(
            borrower_id = %query.borrower_id,
            count = loans.len(),
            "Loaded loan history"
        );

        Ok(loans)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.db_pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}
