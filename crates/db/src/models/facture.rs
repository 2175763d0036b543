//! Invoice (facture) models and DTOs.

use agence_core::error::CoreError;
use agence_core::line_item::{validate_line_item, FactureItem};
use agence_core::totals::validate_invoice_type;
use agence_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `factures` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Facture {
    pub id: DbId,
    pub reference: String,
    pub client_id: DbId,
    pub devis_id: Option<DbId>,
    pub invoice_type: String,
    pub title: String,
    pub status: String,
    pub total_ht: Decimal,
    pub total_vat: Decimal,
    pub total_ttc: Decimal,
    pub due_date: Option<Date>,
    pub sent_at: Option<Timestamp>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `facture_items` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FactureItemRow {
    pub id: DbId,
    pub facture_id: DbId,
    pub position: i32,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub vat_rate: Decimal,
    pub total: Decimal,
}

impl FactureItemRow {
    pub fn to_item(&self) -> FactureItem {
        FactureItem::new(self.description.clone(), self.quantity, self.unit_price)
            .with_discount(self.discount)
            .with_vat_rate(self.vat_rate)
    }
}

/// DTO for creating an invoice with its lines.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFacture {
    pub client_id: DbId,
    pub devis_id: Option<DbId>,
    /// `standard`, `acompte` or `solde`.
    pub invoice_type: String,
    pub title: String,
    pub due_date: Option<Date>,
    #[serde(default)]
    pub items: Vec<FactureItem>,
}

impl CreateFacture {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_invoice_type(&self.invoice_type)?;
        self.items.iter().try_for_each(validate_line_item)
    }
}
