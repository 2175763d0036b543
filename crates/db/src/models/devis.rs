//! Quote (devis) models and DTOs.

use agence_core::error::CoreError;
use agence_core::line_item::{validate_line_item, DevisItem};
use agence_core::money::validate_percentage;
use agence_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `devis` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Devis {
    pub id: DbId,
    pub reference: String,
    pub client_id: DbId,
    pub title: String,
    pub status: String,
    pub vat_rate: Decimal,
    pub total_ht: Decimal,
    pub total_vat: Decimal,
    pub total_ttc: Decimal,
    pub valid_until: Option<Date>,
    pub sent_at: Option<Timestamp>,
    pub accepted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `devis_items` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DevisItemRow {
    pub id: DbId,
    pub devis_id: DbId,
    pub position: i32,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub vat_rate: Decimal,
    pub total: Decimal,
}

impl DevisItemRow {
    pub fn to_item(&self) -> DevisItem {
        DevisItem::new(self.description.clone(), self.quantity, self.unit_price)
            .with_discount(self.discount)
            .with_vat_rate(self.vat_rate)
    }
}

/// DTO for creating a quote with its lines.
///
/// `vat_rate` defaults to 20 %, `valid_until` to thirty days from creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevis {
    pub client_id: DbId,
    pub title: String,
    pub vat_rate: Option<Decimal>,
    pub valid_until: Option<Date>,
    #[serde(default)]
    pub items: Vec<DevisItem>,
}

impl CreateDevis {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(vat_rate) = self.vat_rate {
            validate_percentage("vat_rate", vat_rate)?;
        }
        self.items.iter().try_for_each(validate_line_item)
    }
}
