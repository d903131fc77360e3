//! Borrower detail loading
//!
//! Fetches a borrower and their loan history through the query caches. The
//! two queries are independent: neither waits for the other, and a failure
//! in one leaves the other untouched.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::models::{Borrower, Loan};
use crate::query_cache::{CachePolicy, QueryCache, QueryKey, QueryResult};
use crate::repository::{BorrowerLookup, LendingStore, LoanHistoryQuery};
use crate::views::{BorrowerDetailView, QueryState};

pub struct BorrowerDetailService {
    store: Arc<dyn LendingStore>,
    borrowers: QueryCache<Option<Borrower>>,
    loan_history: QueryCache<Vec<Loan>>,
    render_deadline: Duration,
}

impl BorrowerDetailService {
    pub fn new(store: Arc<dyn LendingStore>, policy: CachePolicy, render_deadline: Duration) -> Self {
        Self {
            store,
            borrowers: QueryCache::new(policy.clone()),
            loan_history: QueryCache::new(policy),
            render_deadline,
        }
    }

    /// Borrower by id; `Ok(None)` when it does not exist
    pub async fn load_borrower(&self, id: Uuid) -> QueryResult<Option<Borrower>> {
        let store = self.store.clone();
        self.borrowers
            .fetch(QueryKey::borrower(id), move || {
                let store = store.clone();
                async move { store.find_borrower(BorrowerLookup { id }).await }
            })
            .await
    }

    /// Full loan history, newest first as ordered by storage
    pub async fn load_loan_history(&self, id: Uuid) -> QueryResult<Vec<Loan>> {
        let store = self.store.clone();
        self.loan_history
            .fetch(QueryKey::borrower_loans(id), move || {
                let store = store.clone();
                async move { store.list_loans(LoanHistoryQuery::newest_first(id)).await }
            })
            .await
    }

    /// Run both queries concurrently and capture their state at the render
    /// deadline. Queries still running keep going in the background.
    pub async fn load_view(&self, id: Uuid) -> BorrowerDetailView {
        let (borrower, loans) = tokio::join!(
            settle(self.render_deadline, self.load_borrower(id)),
            settle(self.render_deadline, self.load_loan_history(id)),
        );

        if let QueryState::Failed(error) = &borrower {
            tracing::error!(borrower_id = %id, error = %error, "Borrower query failed");
        }
        if let QueryState::Failed(error) = &loans {
            tracing::error!(borrower_id = %id, error = %error, "Loan history query failed");
        }

        BorrowerDetailView {
            borrower_id: id,
            borrower,
            loans,
        }
    }

    /// Forget cached results for one borrower
    pub async fn invalidate(&self, id: Uuid) {
        self.borrowers.invalidate(&QueryKey::borrower(id)).await;
        self.loan_history
            .invalidate(&QueryKey::borrower_loans(id))
            .await;
    }

    pub async fn purge_expired(&self) -> usize {
        self.borrowers.purge_expired().await + self.loan_history.purge_expired().await
    }

    pub async fn ping_store(&self) -> anyhow::Result<()> {
        self.store.ping().await
    }
}

async fn settle<T>(deadline: Duration, query: impl Future<Output = QueryResult<T>>) -> QueryState<T> {
    match tokio::time::timeout(deadline, query).await {
        Ok(Ok(value)) => QueryState::Ready(value),
        Ok(Err(err)) => QueryState::Failed(err.to_string()),
        Err(_) => QueryState::Loading,
    }
}
