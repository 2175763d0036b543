//! Date-driven status changes applied by the `update-status` command.

use chrono::Days;

use crate::types::Date;
use crate::workflow::{devis, facture};

/// Default validity of a quote after it is issued.
pub const DEFAULT_QUOTE_VALIDITY_DAYS: u64 = 30;

/// Default payment term of an invoice after it is issued.
pub const DEFAULT_PAYMENT_TERM_DAYS: u64 = 30;

pub fn default_valid_until(issued_on: Date) -> Date {
    issued_on + Days::new(DEFAULT_QUOTE_VALIDITY_DAYS)
}

pub fn default_due_date(issued_on: Date) -> Date {
    issued_on + Days::new(DEFAULT_PAYMENT_TERM_DAYS)
}

/// Target status for a quote whose validity has lapsed, if any.
///
/// Only quotes awaiting an answer expire; the validity date itself is
/// still valid.
pub fn devis_expiry(status: &str, valid_until: Option<Date>, today: Date) -> Option<&'static str> {
    let lapsed = valid_until.is_some_and(|d| d < today);
    (lapsed && devis::AWAITING_ANSWER.contains(&status)).then_some(devis::STATUS_EXPIRE)
}

/// Target status for an invoice past its due date, if any.
pub fn facture_overdue(status: &str, due_date: Option<Date>, today: Date) -> Option<&'static str> {
    let overdue = due_date.is_some_and(|d| d < today);
    (overdue && facture::AWAITING_PAYMENT.contains(&status)).then_some(facture::STATUS_EN_RETARD)
}
