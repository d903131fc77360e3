//! Locations owned by the wider application's router.
//!
//! The detail page never navigates on its own; it only links to these.

use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    BorrowerList,
    BorrowerDetail(Uuid),
    LoanDetail(Uuid),
}

impl Location {
    pub fn path(&self) -> String {
        match self {
            Location::BorrowerList => "/borrowers".to_string(),
            Location::BorrowerDetail(id) => format!("/borrowers/{}", id),
            Location::LoanDetail(id) => format!("/loans/{}", id),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
