//! Document-level totals and deposit/balance invoicing.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::line_item::{DevisItem, DocumentItem, FactureItem};
use crate::money::{format_money, percent_of, round_money, validate_percentage};

/* --------------------------------------------------------------------------
Quote totals
-------------------------------------------------------------------------- */

/// Quote amounts. VAT is applied once, at document level, on `total_ht`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevisAmounts {
    total_ht: Decimal,
    vat_rate: Decimal,
    total_vat: Decimal,
    total_ttc: Decimal,
}

impl DevisAmounts {
    pub fn new(total_ht: Decimal, vat_rate: Decimal) -> Self {
        let mut amounts = Self {
            total_ht: round_money(total_ht),
            vat_rate,
            total_vat: Decimal::ZERO,
            total_ttc: Decimal::ZERO,
        };
        amounts.recalculate();
        amounts
    }

    /// Sum the VAT-exclusive totals of the quote lines.
    pub fn from_items(items: &[DevisItem], vat_rate: Decimal) -> Self {
        let total_ht = items.iter().map(DocumentItem::total).sum();
        Self::new(total_ht, vat_rate)
    }

    /// Change the VAT rate; `total_ht` is left untouched.
    pub fn set_vat_rate(&mut self, vat_rate: Decimal) -> &mut Self {
        self.vat_rate = vat_rate;
        self.recalculate();
        self
    }

    pub fn set_total_ht(&mut self, total_ht: Decimal) -> &mut Self {
        self.total_ht = round_money(total_ht);
        self.recalculate();
        self
    }

    fn recalculate(&mut self) {
        self.total_vat = round_money(percent_of(self.total_ht, self.vat_rate));
        self.total_ttc = self.total_ht + self.total_vat;
    }

    pub fn total_ht(&self) -> Decimal {
        self.total_ht
    }

    pub fn vat_rate(&self) -> Decimal {
        self.vat_rate
    }

    pub fn total_vat(&self) -> Decimal {
        self.total_vat
    }

    pub fn total_ttc(&self) -> Decimal {
        self.total_ttc
    }
}

/* --------------------------------------------------------------------------
Invoice totals
-------------------------------------------------------------------------- */

/// Invoice amounts, summed from per-line VAT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactureTotals {
    pub total_ht: Decimal,
    pub total_vat: Decimal,
    pub total_ttc: Decimal,
}

impl FactureTotals {
    pub fn from_items(items: &[FactureItem]) -> Self {
        let total_ht: Decimal = items.iter().map(DocumentItem::total_after_discount).sum();
        let total_ttc: Decimal = items.iter().map(DocumentItem::total).sum();
        Self {
            total_ht: round_money(total_ht),
            total_vat: round_money(total_ttc - total_ht),
            total_ttc: round_money(total_ttc),
        }
    }
}

/* --------------------------------------------------------------------------
Invoice types
-------------------------------------------------------------------------- */

pub const INVOICE_TYPE_STANDARD: &str = "standard";
/// Deposit invoice billing a share of an accepted quote.
pub const INVOICE_TYPE_ACOMPTE: &str = "acompte";
/// Final invoice billing what remains of a quote after deposits.
pub const INVOICE_TYPE_SOLDE: &str = "solde";

pub const VALID_INVOICE_TYPES: &[&str] =
    &[INVOICE_TYPE_STANDARD, INVOICE_TYPE_ACOMPTE, INVOICE_TYPE_SOLDE];

pub fn validate_invoice_type(invoice_type: &str) -> Result<(), CoreError> {
    if VALID_INVOICE_TYPES.contains(&invoice_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid invoice type '{invoice_type}'. Must be one of: {}",
            VALID_INVOICE_TYPES.join(", ")
        )))
    }
}

/// Single line of a deposit invoice for `percent`% of the quote.
pub fn deposit_item(
    devis_reference: &str,
    devis_total_ht: Decimal,
    percent: Decimal,
    vat_rate: Decimal,
) -> Result<FactureItem, CoreError> {
    validate_percentage("deposit percentage", percent)?;
    if percent.is_zero() || percent == Decimal::ONE_HUNDRED {
        return Err(CoreError::Validation(format!(
            "Deposit percentage must be strictly between 0 and 100 (got {percent})"
        )));
    }

    let amount = round_money(percent_of(devis_total_ht, percent));
    Ok(FactureItem::new(
        format!(
            "Acompte de {} % sur le devis {devis_reference}",
            percent.normalize()
        ),
        Decimal::ONE,
        amount,
    )
    .with_vat_rate(vat_rate))
}

/// Single line of a balance invoice: the quote HT minus every deposit HT.
pub fn balance_item(
    devis_reference: &str,
    devis_total_ht: Decimal,
    deposits_ht: &[Decimal],
    vat_rate: Decimal,
) -> Result<FactureItem, CoreError> {
    let deposited: Decimal = deposits_ht.iter().copied().sum();
    let remaining = round_money(devis_total_ht - deposited);
    if remaining <= Decimal::ZERO {
        return Err(CoreError::Conflict(format!(
            "Nothing left to invoice on devis {devis_reference}: deposits total {} for {}",
            format_money(deposited),
            format_money(devis_total_ht)
        )));
    }

    let description = if deposited.is_zero() {
        format!("Solde du devis {devis_reference}")
    } else {
        format!(
            "Solde du devis {devis_reference} (acomptes déduits : {} € HT)",
            format_money(deposited)
        )
    };
    Ok(FactureItem::new(description, Decimal::ONE, remaining).with_vat_rate(vat_rate))
}
