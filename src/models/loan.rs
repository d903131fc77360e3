//! Loan models
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::views::format::{format_currency, format_date};
use crate::views::status::format_status;
use crate::views::DisplayOptions;

/// Loan lifecycle status.
///
/// Storage holds the status as a snake_case token. Tokens outside the known
/// set are kept verbatim in `Unrecognized` so a new backend state never breaks
/// row decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LoanStatus {
    PendingApproval,
    Approved,
    Disbursed,
    Active,
    Cleared,
    Rejected,
    Defaulted,
    Unrecognized(String),
}

impl LoanStatus {
    /// Every status the backend is known to produce
    pub const KNOWN: [LoanStatus; 7] = [
        LoanStatus::PendingApproval,
        LoanStatus::Approved,
        LoanStatus::Disbursed,
        LoanStatus::Active,
        LoanStatus::Cleared,
        LoanStatus::Rejected,
        LoanStatus::Defaulted,
    ];

    /// Storage token
    pub fn as_str(&self) -> &str {
        match self {
            LoanStatus::PendingApproval => "pending_approval",
            LoanStatus::Approved => "approved",
            LoanStatus::Disbursed => "disbursed",
            LoanStatus::Active => "active",
            LoanStatus::Cleared => "cleared",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Defaulted => "defaulted",
            LoanStatus::Unrecognized(token) => token,
        }
    }

    /// Human readable label, e.g. "Pending Approval"
    pub fn label(&self) -> String {
        format_status(self.as_str())
    }

    pub fn hue(&self) -> StatusHue {
        match self {
            LoanStatus::PendingApproval => StatusHue::Yellow,
            LoanStatus::Approved => StatusHue::Blue,
            LoanStatus::Disbursed => StatusHue::Purple,
            LoanStatus::Active => StatusHue::Green,
            LoanStatus::Cleared => StatusHue::Gray,
            LoanStatus::Rejected => StatusHue::Red,
            LoanStatus::Defaulted => StatusHue::Orange,
            LoanStatus::Unrecognized(_) => StatusHue::Gray,
        }
    }

    /// Badge style classes for this status
    pub fn badge_class(&self) -> &'static str {
        self.hue().badge_class()
    }
}

impl From<&str> for LoanStatus {
    fn from(token: &str) -> Self {
        match token {
            "pending_approval" => LoanStatus::PendingApproval,
            "approved" => LoanStatus::Approved,
            "disbursed" => LoanStatus::Disbursed,
            "active" => LoanStatus::Active,
            "cleared" => LoanStatus::Cleared,
            "rejected" => LoanStatus::Rejected,
            "defaulted" => LoanStatus::Defaulted,
            other => LoanStatus::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for LoanStatus {
    fn from(token: String) -> Self {
        match LoanStatus::from(token.as_str()) {
            LoanStatus::Unrecognized(_) => LoanStatus::Unrecognized(token),
            known => known,
        }
    }
}

impl From<LoanStatus> for String {
    fn from(status: LoanStatus) -> Self {
        match status {
            LoanStatus::Unrecognized(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color family of a status badge.
///
/// Each hue expresses a background tint, a text color and a border tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusHue {
    Yellow,
    Blue,
    Purple,
    Green,
    Gray,
    Red,
    Orange,
}

impl StatusHue {
    pub const ALL: [StatusHue; 7] = [
        StatusHue::Yellow,
        StatusHue::Blue,
        StatusHue::Purple,
        StatusHue::Green,
        StatusHue::Gray,
        StatusHue::Red,
        StatusHue::Orange,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatusHue::Yellow => "yellow",
            StatusHue::Blue => "blue",
            StatusHue::Purple => "purple",
            StatusHue::Green => "green",
            StatusHue::Gray => "gray",
            StatusHue::Red => "red",
            StatusHue::Orange => "orange",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            StatusHue::Yellow => "bg-yellow-500/10 text-yellow-700 border-yellow-500/20",
            StatusHue::Blue => "bg-blue-500/10 text-blue-700 border-blue-500/20",
            StatusHue::Purple => "bg-purple-500/10 text-purple-700 border-purple-500/20",
            StatusHue::Green => "bg-green-500/10 text-green-700 border-green-500/20",
            StatusHue::Gray => "bg-gray-500/10 text-gray-700 border-gray-500/20",
            StatusHue::Red => "bg-red-500/10 text-red-700 border-red-500/20",
            StatusHue::Orange => "bg-orange-500/10 text-orange-700 border-orange-500/20",
        }
    }

    /// RGB triple of the hue's 500 shade (tints) and 700 shade (text)
    pub fn rgb(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        match self {
            StatusHue::Yellow => ((234, 179, 8), (161, 98, 7)),
            StatusHue::Blue => ((59, 130, 246), (29, 78, 216)),
            StatusHue::Purple => ((168, 85, 247), (126, 34, 206)),
            StatusHue::Green => ((34, 197, 94), (21, 128, 61)),
            StatusHue::Gray => ((107, 114, 128), (55, 65, 81)),
            StatusHue::Red => ((239, 68, 68), (185, 28, 28)),
            StatusHue::Orange => ((249, 115, 22), (194, 65, 12)),
        }
    }
}

/// Read-only projection of a row in `loans`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Loan {
    pub id: Uuid,
    pub borrower_id: Uuid,
    pub disbursement_date: DateTime<Utc>,
    pub principal: Decimal,
    pub total_payable: Decimal,
    #[sqlx(try_from = "String")]
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

/// Loan as returned by the JSON API, with display fields precomputed
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub id: Uuid,
    pub borrower_id: Uuid,
    pub disbursement_date: DateTime<Utc>,
    pub principal: Decimal,
    pub total_payable: Decimal,
    pub status: LoanStatus,
    pub status_label: String,
    pub status_class: String,
    pub principal_display: String,
    pub total_payable_display: String,
    pub disbursement_date_display: String,
    pub created_at: DateTime<Utc>,
}

impl LoanResponse {
    pub fn new(loan: Loan, display: &DisplayOptions) -> Self {
        Self {
            status_label: loan.status.label(),
            status_class: loan.status.badge_class().to_string(),
            principal_display: format_currency(loan.principal, &display.currency_symbol),
            total_payable_display: format_currency(loan.total_payable, &display.currency_symbol),
            disbursement_date_display: format_date(
                loan.disbursement_date,
                &display.date_format,
                display.utc_offset,
            ),
            id: loan.id,
            borrower_id: loan.borrower_id,
            disbursement_date: loan.disbursement_date,
            principal: loan.principal,
            total_payable: loan.total_payable,
            status: loan.status,
            created_at: loan.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_token_round_trip() {
        for status in LoanStatus::KNOWN {
            let token = status.as_str().to_string();
            assert_eq!(LoanStatus::from(token.clone()), status);
            assert_eq!(String::from(status), token);
        }
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status = LoanStatus::from("written_off");
        assert_eq!(status, LoanStatus::Unrecognized("written_off".to_string()));
        assert_eq!(status.as_str(), "written_off");
        assert_eq!(status.label(), "Written Off");
        assert_eq!(status.hue(), StatusHue::Gray);
    }

    #[test]
    fn test_each_known_status_has_its_own_hue() {
        let hues: std::collections::HashSet<_> =
            LoanStatus::KNOWN.iter().map(|s| s.hue()).collect();
        assert_eq!(hues.len(), StatusHue::ALL.len());
        assert_eq!(LoanStatus::PendingApproval.hue(), StatusHue::Yellow);
        assert_eq!(LoanStatus::Defaulted.hue(), StatusHue::Orange);
    }

    #[test]
    fn test_status_serializes_as_token() {
        let json = serde_json::to_string(&LoanStatus::PendingApproval).unwrap();
        assert_eq!(json, "\"pending_approval\"");

        let parsed: LoanStatus = serde_json::from_str("\"frozen\"").unwrap();
        assert_eq!(parsed, LoanStatus::Unrecognized("frozen".to_string()));
    }

    #[test]
    fn test_loan_response_display_fields() {
        let loan = Loan {
            id: Uuid::new_v4(),
            borrower_id: Uuid::new_v4(),
            disbursement_date: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
            principal: Decimal::new(1_234_567, 0),
            total_payable: Decimal::new(150_000_050, 2),
            status: LoanStatus::Active,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        };

        let response = LoanResponse::new(loan, &DisplayOptions::default());
        assert_eq!(response.principal_display, "$1,234,567");
        assert_eq!(response.total_payable_display, "$1,500,000.5");
        assert_eq!(response.disbursement_date_display, "3/5/2024");
        assert_eq!(response.status_label, "Active");
        assert!(response.status_class.contains("green"));
    }
}
