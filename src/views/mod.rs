//! Server-rendered HTML views

pub mod borrower_detail;
pub mod format;
pub mod layout;
pub mod status;

pub use borrower_detail::{invalid_id_page, BorrowerDetailView, RenderedPage};

use chrono::{FixedOffset, Offset, Utc};

use format::DEFAULT_DATE_FORMAT;

/// Presentation settings shared by pages and API responses
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub date_format: String,
    /// Zone dates are shown in; timestamps are stored in UTC
    pub utc_offset: FixedOffset,
    pub loading_refresh_seconds: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            utc_offset: Utc.fix(),
            loading_refresh_seconds: 2,
        }
    }
}

/// Observed state of one query at render time
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Still in flight when the page had to be rendered
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }
}
