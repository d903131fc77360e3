//! Borrower models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only projection of a row in `borrowers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Borrower {
    pub id: Uuid,
    pub full_name: String,
    pub id_number: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub guarantor_name: Option<String>,
    pub guarantor_phone: Option<String>,
    pub guarantor_address: Option<String>,
}

/// Borrower as returned by the JSON API
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowerResponse {
    pub id: Uuid,
    pub full_name: String,
    pub id_number: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub guarantor: GuarantorResponse,
}

/// Guarantor fields grouped for API consumers
#[derive(Debug, Serialize, Deserialize)]
pub struct GuarantorResponse {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<Borrower> for BorrowerResponse {
    fn from(borrower: Borrower) -> Self {
        Self {
            id: borrower.id,
            full_name: borrower.full_name,
            id_number: borrower.id_number,
            phone: borrower.phone,
            email: borrower.email,
            address: borrower.address,
            guarantor: GuarantorResponse {
                name: borrower.guarantor_name,
                phone: borrower.guarantor_phone,
                address: borrower.guarantor_address,
            },
        }
    }
}
