//! Borrower detail page

use axum::http::StatusCode;
use uuid::Uuid;

use super::format::{format_currency, format_date, or_placeholder};
use super::layout::{escape_html, page, spinner, Refresh};
use super::{DisplayOptions, QueryState};
use crate::models::{Borrower, Loan};
use crate::navigation::Location;

/// Everything the detail page needs: the borrower query and the loan
/// history query, each in whatever state it had reached.
#[derive(Debug, Clone)]
pub struct BorrowerDetailView {
    pub borrower_id: Uuid,
    pub borrower: QueryState<Option<Borrower>>,
    pub loans: QueryState<Vec<Loan>>,
}

/// HTML document plus the status code it should be served with
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub status: StatusCode,
    pub html: String,
}

impl BorrowerDetailView {
    pub fn render(&self, display: &DisplayOptions) -> RenderedPage {
        // Reloads target the canonical path, never `?refresh=true`
        let canonical = Location::BorrowerDetail(self.borrower_id).path();
        let refresh = Refresh {
            after_seconds: display.loading_refresh_seconds,
            target: &canonical,
        };

        let borrower = match &self.borrower {
            QueryState::Loading => {
                return RenderedPage {
                    status: StatusCode::OK,
                    html: page("Loading borrower", Some(refresh), &spinner("loading-page")),
                };
            }
            QueryState::Failed(_) => {
                let retry = format!("{}?refresh=true", canonical);
                let body = format!(
                    r#"<div class="empty"><p>Unable to load borrower</p><p><a class="action" href="{}">Try again</a></p></div>"#,
                    escape_html(&retry)
                );
                return RenderedPage {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    html: page("Borrower unavailable", None, &body),
                };
            }
            QueryState::Ready(None) => {
                return RenderedPage {
                    status: StatusCode::NOT_FOUND,
                    html: page(
                        "Borrower not found",
                        None,
                        r#"<div class="empty"><p class="muted">Borrower not found</p></div>"#,
                    ),
                };
            }
            QueryState::Ready(Some(borrower)) => borrower,
        };

        let refresh = self.loans.is_loading().then_some(refresh);

        let body = format!(
            "{header}\n<div class=\"grid\">\n{personal}\n{guarantor}\n</div>\n{history}",
            header = header(borrower),
            personal = personal_card(borrower),
            guarantor = guarantor_card(borrower),
            history = loan_history_card(&self.loans, display),
        );

        RenderedPage {
            status: StatusCode::OK,
            html: page(&borrower.full_name, refresh, &body),
        }
    }
}

/// Page for a path segment that is not a borrower id
pub fn invalid_id_page() -> RenderedPage {
    let body = format!(
        r#"<div class="empty"><p class="muted">Invalid borrower id</p><p><a class="action" href="{}">Back to borrowers</a></p></div>"#,
        Location::BorrowerList
    );
    RenderedPage {
        status: StatusCode::BAD_REQUEST,
        html: page("Invalid borrower id", None, &body),
    }
}

fn header(borrower: &Borrower) -> String {
    format!(
        r#"<div class="header">
    <a class="back" href="{back}" aria-label="Back to borrowers">&larr;</a>
    <div>
        <h1>{name}</h1>
        <p class="muted">Borrower Details</p>
    </div>
</div>"#,
        back = Location::BorrowerList,
        name = escape_html(&borrower.full_name),
    )
}

fn field(label: &str, value: &str) -> String {
    format!(
        r#"<div class="field"><p class="label">{}</p><p class="value">{}</p></div>"#,
        label,
        escape_html(value)
    )
}

fn card(title: &str, content: &str) -> String {
    format!(
        "<section class=\"card\">\n<h2>{}</h2>\n{}\n</section>",
        title, content
    )
}

fn personal_card(borrower: &Borrower) -> String {
    let fields = [
        field("Full Name", &borrower.full_name),
        field("ID Number", &borrower.id_number),
        field("Phone", &borrower.phone),
        field("Email", or_placeholder(borrower.email.as_deref())),
        field("Address", or_placeholder(borrower.address.as_deref())),
    ];
    card("Personal Information", &fields.join("\n"))
}

fn guarantor_card(borrower: &Borrower) -> String {
    let fields = [
        field("Name", or_placeholder(borrower.guarantor_name.as_deref())),
        field("Phone", or_placeholder(borrower.guarantor_phone.as_deref())),
        field("Address", or_placeholder(borrower.guarantor_address.as_deref())),
    ];
    card("Guarantor Information", &fields.join("\n"))
}

fn loan_history_card(loans: &QueryState<Vec<Loan>>, display: &DisplayOptions) -> String {
    let content = match loans {
        QueryState::Loading => spinner("loading-card"),
        QueryState::Failed(_) => {
            r#"<div class="empty">Unable to load loan history</div>"#.to_string()
        }
        QueryState::Ready(loans) if loans.is_empty() => {
            r#"<div class="empty">No loans found for this borrower</div>"#.to_string()
        }
        QueryState::Ready(loans) => loan_table(loans, display),
    };
    card("Loan History", &content)
}

/// Rows keep the order the store returned them in.
fn loan_table(loans: &[Loan], display: &DisplayOptions) -> String {
    let rows: Vec<String> = loans
        .iter()
        .map(|loan| {
            format!(
                r#"<tr data-loan-id="{id}">
    <td>{date}</td>
    <td class="amount">{principal}</td>
    <td class="amount">{total}</td>
    <td><span class="badge {class}">{label}</span></td>
    <td class="text-right"><a class="action" href="{view}">View</a></td>
</tr>"#,
                id = loan.id,
                date = escape_html(&format_date(
                    loan.disbursement_date,
                    &display.date_format,
                    display.utc_offset,
                )),
                principal = escape_html(&format_currency(loan.principal, &display.currency_symbol)),
                total = escape_html(&format_currency(
                    loan.total_payable,
                    &display.currency_symbol
                )),
                class = loan.status.badge_class(),
                label = escape_html(&loan.status.label()),
                view = Location::LoanDetail(loan.id),
            )
        })
        .collect();

    format!(
        r#"<table>
<thead>
<tr><th>Date</th><th>Principal</th><th>Total Payable</th><th>Status</th><th class="text-right">Actions</th></tr>
</thead>
<tbody>
{}
</tbody>
</table>"#,
        rows.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoanStatus;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn borrower() -> Borrower {
        Borrower {
            id: Uuid::new_v4(),
            full_name: "Amina Odhiambo".to_string(),
            id_number: "29384756".to_string(),
            phone: "+254700000001".to_string(),
            email: None,
            address: Some(String::new()),
            guarantor_name: Some("Peter Kamau".to_string()),
            guarantor_phone: None,
            guarantor_address: None,
        }
    }

    fn loan(borrower_id: Uuid, day: u32, status: LoanStatus) -> Loan {
        Loan {
            id: Uuid::new_v4(),
            borrower_id,
            disbursement_date: Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap(),
            principal: Decimal::new(1_234_567, 0),
            total_payable: Decimal::new(1_400_000, 0),
            status,
            created_at: Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap(),
        }
    }

    fn view(
        borrower: QueryState<Option<Borrower>>,
        loans: QueryState<Vec<Loan>>,
    ) -> BorrowerDetailView {
        BorrowerDetailView {
            borrower_id: Uuid::new_v4(),
            borrower,
            loans,
        }
    }

    #[test]
    fn test_not_found_skips_cards_and_table() {
        let page = view(QueryState::Ready(None), QueryState::Ready(vec![]))
            .render(&DisplayOptions::default());

        assert_eq!(page.status, StatusCode::NOT_FOUND);
        assert!(page.html.contains("Borrower not found"));
        assert!(!page.html.contains("Personal Information"));
        assert!(!page.html.contains("Guarantor Information"));
        assert!(!page.html.contains("Loan History"));
        assert!(!page.html.contains("<table>"));
    }

    #[test]
    fn test_borrower_loading_shows_spinner_only() {
        let loading = view(QueryState::Loading, QueryState::Ready(vec![]));
        let page = loading.render(&DisplayOptions::default());

        assert_eq!(page.status, StatusCode::OK);
        assert!(page.html.contains("class=\"spinner\""));
        assert!(page.html.contains(&format!(
            r#"<meta http-equiv="refresh" content="2; url=/borrowers/{}">"#,
            loading.borrower_id
        )));
        assert!(!page.html.contains("Borrower not found"));
        assert!(!page.html.contains("Loan History"));
    }

    #[test]
    fn test_borrower_failure_is_distinct() {
        let page = view(
            QueryState::Failed("connection refused".to_string()),
            QueryState::Ready(vec![]),
        )
        .render(&DisplayOptions::default());

        assert_eq!(page.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(page.html.contains("Unable to load borrower"));
        assert!(page.html.contains("?refresh=true"));
        assert!(!page.html.contains("connection refused"));
        assert!(!page.html.contains("Borrower not found"));
    }

    #[test]
    fn test_empty_loan_history() {
        let page = view(QueryState::Ready(Some(borrower())), QueryState::Ready(vec![]))
            .render(&DisplayOptions::default());

        assert_eq!(page.status, StatusCode::OK);
        assert!(page.html.contains("Personal Information"));
        assert!(page.html.contains("Guarantor Information"));
        assert!(page.html.contains("No loans found for this borrower"));
        assert!(!page.html.contains("<table>"));
        assert!(!page.html.contains("class=\"spinner\""));
    }

    #[test]
    fn test_loan_history_loading_and_failed_states() {
        let loading_view = view(QueryState::Ready(Some(borrower())), QueryState::Loading);
        let loading = loading_view.render(&DisplayOptions::default());
        assert!(loading.html.contains("Amina Odhiambo"));
        assert!(loading.html.contains("class=\"spinner\""));
        assert!(loading.html.contains(&format!(
            "url=/borrowers/{}\"",
            loading_view.borrower_id
        )));
        assert!(!loading.html.contains("refresh=true"));
        assert!(!loading.html.contains("No loans found for this borrower"));

        let failed = view(
            QueryState::Ready(Some(borrower())),
            QueryState::Failed("timeout".to_string()),
        )
        .render(&DisplayOptions::default());
        assert_eq!(failed.status, StatusCode::OK);
        assert!(failed.html.contains("Unable to load loan history"));
        assert!(!failed.html.contains("No loans found for this borrower"));
    }

    #[test]
    fn test_optional_fields_use_placeholder() {
        let page = view(QueryState::Ready(Some(borrower())), QueryState::Ready(vec![]))
            .render(&DisplayOptions::default());

        assert!(page.html.contains(r#"<p class="label">Email</p><p class="value">—</p>"#));
        assert!(page.html.contains(r#"<p class="label">Address</p><p class="value">—</p>"#));
        assert!(page.html.contains(r#"<p class="value">Peter Kamau</p>"#));
        assert!(!page.html.contains("null"));
        assert!(!page.html.contains(r#"<p class="value"></p>"#));
    }

    #[test]
    fn test_loan_rows_keep_store_order() {
        let b = borrower();
        let newer = loan(b.id, 20, LoanStatus::PendingApproval);
        let older = loan(b.id, 2, LoanStatus::Unrecognized("frozen".to_string()));
        let page = view(
            QueryState::Ready(Some(b)),
            QueryState::Ready(vec![newer.clone(), older.clone()]),
        )
        .render(&DisplayOptions::default());

        let newer_at = page.html.find(&newer.id.to_string()).unwrap();
        let older_at = page.html.find(&older.id.to_string()).unwrap();
        assert!(newer_at < older_at);

        assert!(page.html.contains("$1,234,567"));
        assert!(page.html.contains("$1,400,000"));
        assert!(page.html.contains("5/20/2024"));
        assert!(page.html.contains("Pending Approval"));
        assert!(page.html.contains("Frozen"));
        assert!(page.html.contains(&format!("href=\"/loans/{}\"", newer.id)));
        assert!(page.html.contains("href=\"/borrowers\""));
    }

    #[test]
    fn test_invalid_id_page() {
        let page = invalid_id_page();
        assert_eq!(page.status, StatusCode::BAD_REQUEST);
        assert!(page.html.contains("Invalid borrower id"));
        assert!(page.html.contains(r#"href="/borrowers""#));
        assert!(!page.html.contains("http-equiv"));
    }

    #[test]
    fn test_borrower_text_is_escaped() {
        let mut b = borrower();
        b.full_name = "<b>Mallory</b>".to_string();
        let page = view(QueryState::Ready(Some(b)), QueryState::Ready(vec![]))
            .render(&DisplayOptions::default());

        assert!(page.html.contains("&lt;b&gt;Mallory&lt;/b&gt;"));
        assert!(!page.html.contains("<b>Mallory</b>"));
    }
}
