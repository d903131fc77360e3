//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tower::ServiceExt;
use uuid::Uuid;

use loanbook_server::models::{Borrower, Loan, LoanStatus};
use loanbook_server::query_cache::CachePolicy;
use loanbook_server::repository::{BorrowerLookup, LendingStore, LoanHistoryQuery, SortDirection};
use loanbook_server::routes::app_router;
use loanbook_server::services::BorrowerDetailService;
use loanbook_server::state::AppState;
use loanbook_server::views::DisplayOptions;

/// Store that keeps rows in memory and orders them the way storage would
#[derive(Default)]
pub struct InMemoryStore {
    borrowers: RwLock<Vec<Borrower>>,
    loans: RwLock<Vec<Loan>>,
    failing: AtomicBool,
    delay: RwLock<Duration>,
    pub borrower_calls: AtomicUsize,
    pub loan_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn insert_borrower(&self, borrower: Borrower) {
        self.borrowers.write().unwrap().push(borrower);
    }

    pub fn insert_loan(&self, loan: Loan) {
        self.loans.write().unwrap().push(loan);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every borrower and loan query take `delay`
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap() = delay;
    }

    async fn wait(&self) {
        let delay = *self.delay.read().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("could not connect to server: Connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl LendingStore for InMemoryStore {
    async fn find_borrower(&self, lookup: BorrowerLookup) -> anyhow::Result<Option<Borrower>> {
        self.borrower_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.check()?;
        let borrowers = self.borrowers.read().unwrap();
        Ok(borrowers.iter().find(|b| b.id == lookup.id).cloned())
    }

    async fn list_loans(&self, query: LoanHistoryQuery) -> anyhow::Result<Vec<Loan>> {
        self.loan_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.check()?;
        let mut loans: Vec<Loan> = self
            .loans
            .read()
            .unwrap()
            .iter()
            .filter(|loan| loan.borrower_id == query.borrower_id)
            .cloned()
            .collect();

        // Stable sort keeps insertion order for equal timestamps
        loans.sort_by_key(|loan| loan.created_at);
        if query.order_by.direction == SortDirection::Descending {
            loans.reverse();
        }
        if let Some(limit) = query.limit {
            loans.truncate(limit as usize);
        }
        Ok(loans)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.check()
    }
}

pub fn test_app(store: Arc<InMemoryStore>) -> Router {
    test_app_with_deadline(store, Duration::from_secs(2))
}

/// App whose page handler gives up waiting on queries after `render_deadline`
pub fn test_app_with_deadline(store: Arc<InMemoryStore>, render_deadline: Duration) -> Router {
    let policy = CachePolicy {
        ttl: Duration::from_secs(60),
        max_entries: 64,
        retry_attempts: 0,
        retry_base_delay: Duration::ZERO,
    };
    let service = Arc::new(BorrowerDetailService::new(
        store,
        policy,
        render_deadline,
    ));
    app_router(AppState::new(service, DisplayOptions::default()), None, false)
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn borrower(full_name: &str) -> Borrower {
    Borrower {
        id: Uuid::new_v4(),
        full_name: full_name.to_string(),
        id_number: "30125896".to_string(),
        phone: "+254722123456".to_string(),
        email: None,
        address: Some("Plot 12, Thika Road".to_string()),
        guarantor_name: Some("John Mwangi".to_string()),
        guarantor_phone: None,
        guarantor_address: None,
    }
}

pub fn loan(borrower_id: Uuid, created_day: u32, principal: i64, status: LoanStatus) -> Loan {
    let created_at = Utc.with_ymd_and_hms(2024, 7, created_day, 10, 30, 0).unwrap();
    Loan {
        id: Uuid::new_v4(),
        borrower_id,
        disbursement_date: created_at,
        principal: Decimal::new(principal, 0),
        total_payable: Decimal::new(principal, 0) * Decimal::new(115, 2),
        status,
        created_at,
    }
}
