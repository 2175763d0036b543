//! Quote and invoice line items.
//!
//! Both item kinds share the same maths through [`DocumentItem`]. They differ
//! in what their stored `total` means: a quote item's total excludes VAT
//! (VAT is applied once on the quote), an invoice item's total includes it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::{round_money, validate_percentage, DEFAULT_VAT_RATE};

/// Shared line-item maths.
///
/// All computed amounts are rounded to two decimals from the unrounded
/// product, so `total_after_discount = round(q × price × (1 − discount/100))`
/// holds exactly.
pub trait DocumentItem {
    /// Whether the stored `total` includes VAT.
    const TOTAL_INCLUDES_VAT: bool;

    fn description(&self) -> &str;
    fn quantity(&self) -> Decimal;
    fn unit_price(&self) -> Decimal;
    /// Discount percentage, 0 to 100.
    fn discount(&self) -> Decimal;
    /// VAT percentage, 0 to 100.
    fn vat_rate(&self) -> Decimal;

    fn subtotal(&self) -> Decimal {
        round_money(self.quantity() * self.unit_price())
    }

    fn total_after_discount(&self) -> Decimal {
        round_money(self.quantity() * self.unit_price() * discount_factor(self.discount()))
    }

    fn discount_amount(&self) -> Decimal {
        self.subtotal() - self.total_after_discount()
    }

    /// VAT-inclusive amount of the line.
    fn total_ttc(&self) -> Decimal {
        round_money(
            self.quantity()
                * self.unit_price()
                * discount_factor(self.discount())
                * vat_factor(self.vat_rate()),
        )
    }

    fn vat_amount(&self) -> Decimal {
        self.total_ttc() - self.total_after_discount()
    }

    /// The amount stored in the item's `total` column.
    fn total(&self) -> Decimal {
        if Self::TOTAL_INCLUDES_VAT {
            self.total_ttc()
        } else {
            self.total_after_discount()
        }
    }

    fn amounts(&self) -> LineAmounts {
        LineAmounts {
            subtotal: self.subtotal(),
            discount_amount: self.discount_amount(),
            total_after_discount: self.total_after_discount(),
            vat_amount: self.vat_amount(),
            total_ttc: self.total_ttc(),
            total: self.total(),
        }
    }
}

fn discount_factor(discount: Decimal) -> Decimal {
    Decimal::ONE - discount / Decimal::ONE_HUNDRED
}

fn vat_factor(vat_rate: Decimal) -> Decimal {
    Decimal::ONE + vat_rate / Decimal::ONE_HUNDRED
}

/// Every computed amount of a line, as shown on a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineAmounts {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total_after_discount: Decimal,
    pub vat_amount: Decimal,
    pub total_ttc: Decimal,
    pub total: Decimal,
}

macro_rules! define_line_item {
    (
        $(#[$meta:meta])*
        $name:ident, includes_vat = $includes_vat:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub description: String,
            pub quantity: Decimal,
            pub unit_price: Decimal,
            #[serde(default)]
            pub discount: Decimal,
            #[serde(default = "default_vat_rate")]
            pub vat_rate: Decimal,
        }

        impl $name {
            /// A line with no discount at the default VAT rate.
            pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
                Self {
                    description: description.into(),
                    quantity,
                    unit_price,
                    discount: Decimal::ZERO,
                    vat_rate: DEFAULT_VAT_RATE,
                }
            }

            pub fn with_discount(mut self, discount: Decimal) -> Self {
                self.discount = discount;
                self
            }

            pub fn with_vat_rate(mut self, vat_rate: Decimal) -> Self {
                self.vat_rate = vat_rate;
                self
            }
        }

        impl DocumentItem for $name {
            const TOTAL_INCLUDES_VAT: bool = $includes_vat;

            fn description(&self) -> &str {
                &self.description
            }
            fn quantity(&self) -> Decimal {
                self.quantity
            }
            fn unit_price(&self) -> Decimal {
                self.unit_price
            }
            fn discount(&self) -> Decimal {
                self.discount
            }
            fn vat_rate(&self) -> Decimal {
                self.vat_rate
            }
        }
    };
}

fn default_vat_rate() -> Decimal {
    DEFAULT_VAT_RATE
}

define_line_item! {
    /// A quote line. `total` excludes VAT.
    DevisItem, includes_vat = false
}

define_line_item! {
    /// An invoice line. `total` includes VAT.
    FactureItem, includes_vat = true
}

/// Validate a line before it is persisted.
pub fn validate_line_item<I: DocumentItem>(item: &I) -> Result<(), CoreError> {
    if item.description().trim().is_empty() {
        return Err(CoreError::Validation(
            "Line item description must not be empty".to_string(),
        ));
    }
    if item.quantity() <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "Quantity must be positive (got {})",
            item.quantity()
        )));
    }
    if item.unit_price() < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "Unit price must not be negative (got {})",
            item.unit_price()
        )));
    }
    validate_percentage("discount", item.discount())?;
    validate_percentage("vat_rate", item.vat_rate())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn facture_item() -> FactureItem {
        FactureItem::new("Développement", d("10"), d("50.00"))
            .with_discount(d("10"))
            .with_vat_rate(d("20.00"))
    }

    #[test]
    fn invoice_item_amounts() {
        let amounts = facture_item().amounts();
        assert_eq!(amounts.subtotal, d("500.00"));
        assert_eq!(amounts.discount_amount, d("50.00"));
        assert_eq!(amounts.total_after_discount, d("450.00"));
        assert_eq!(amounts.vat_amount, d("90.00"));
        assert_eq!(amounts.total_ttc, d("540.00"));
        assert_eq!(amounts.total, d("540.00"));
    }

    #[test]
    fn quote_item_total_excludes_vat() {
        let item = DevisItem::new("Développement", d("10"), d("50.00"))
            .with_discount(d("10"))
            .with_vat_rate(d("20.00"));
        assert_eq!(item.total(), d("450.00"));
        assert_eq!(item.vat_amount(), d("90.00"));
        assert_eq!(item.total_ttc(), d("540.00"));
    }

    #[test]
    fn amounts_render_with_two_decimals() {
        let item = DevisItem::new("Audit", d("3"), d("33.3"));
        assert_eq!(item.total().to_string(), "99.90");
    }

    #[test]
    fn total_rounds_once_from_unrounded_product() {
        // 3 × 19.99 × 0.85 = 50.9745
        let item = DevisItem::new("Maintenance", d("3"), d("19.99")).with_discount(d("15"));
        assert_eq!(item.total(), d("50.97"));
        assert_eq!(item.subtotal(), d("59.97"));
        assert_eq!(item.discount_amount(), d("9.00"));
    }

    #[test]
    fn invoice_total_rounds_once_including_vat() {
        // 1.5 × 33.33 × 1.055 = 52.744725
        let item = FactureItem::new("Hébergement", d("1.5"), d("33.33")).with_vat_rate(d("5.5"));
        assert_eq!(item.total_after_discount(), d("50.00"));
        assert_eq!(item.total(), d("52.74"));
        assert_eq!(item.vat_amount(), d("2.74"));
    }

    #[test]
    fn full_discount_zeroes_the_line() {
        let item = facture_item().with_discount(d("100"));
        assert_eq!(item.total(), d("0.00"));
        assert_eq!(item.discount_amount(), d("500.00"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let item: DevisItem = serde_json::from_value(serde_json::json!({
            "description": "Logo",
            "quantity": "2",
            "unit_price": "150.00",
        }))
        .unwrap();
        assert_eq!(item.discount, Decimal::ZERO);
        assert_eq!(item.vat_rate, DEFAULT_VAT_RATE);
        assert_eq!(item.total().to_string(), "300.00");
    }

    #[test]
    fn validation_rejects_bad_lines() {
        assert!(validate_line_item(&facture_item()).is_ok());
        assert!(validate_line_item(&facture_item().with_discount(d("120"))).is_err());
        assert!(validate_line_item(&facture_item().with_vat_rate(d("-5"))).is_err());
        assert!(validate_line_item(&FactureItem::new("x", d("0"), d("10"))).is_err());
        assert!(validate_line_item(&FactureItem::new("x", d("1"), d("-10"))).is_err());
        assert!(validate_line_item(&FactureItem::new("  ", d("1"), d("10"))).is_err());
    }
}
