//! `update-status`: date-driven status changes.
//!
//! Quotes awaiting an answer past their validity become `expire`; invoices
//! awaiting payment past their due date become `en_retard`. Every change
//! still goes through the workflow validator.

use agence_core::status_rules::{devis_expiry, facture_overdue};
use agence_core::types::Date;
use agence_core::workflow::{devis, facture};
use agence_db::repositories::{DevisRepo, FactureRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::WorkerError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusUpdateReport {
    pub expired_devis: u32,
    pub overdue_factures: u32,
    pub errors: u32,
}

impl StatusUpdateReport {
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

/// Apply the expiry and overdue rules as of `today`.
pub async fn run(pool: &PgPool, today: Date) -> Result<StatusUpdateReport, WorkerError> {
    let mut report = StatusUpdateReport::default();

    for quote in DevisRepo::list_lapsed(pool, today).await? {
        let Some(target) = devis_expiry(&quote.status, quote.valid_until, today) else {
            continue;
        };
        if let Err(e) = devis::WORKFLOW.validate_transition(&quote.status, target) {
            tracing::warn!(devis_id = quote.id, error = %e, "Expiry rejected by workflow");
            report.errors += 1;
            continue;
        }
        match DevisRepo::update_status(pool, quote.id, &quote.status, target).await {
            Ok(Some(_)) => {
                tracing::info!(devis_id = quote.id, reference = %quote.reference, "Quote expired");
                report.expired_devis += 1;
            }
            Ok(None) => {
                tracing::debug!(devis_id = quote.id, "Quote status changed meanwhile, skipped");
            }
            Err(e) => {
                tracing::error!(devis_id = quote.id, error = %e, "Failed to expire quote");
                report.errors += 1;
            }
        }
    }

    for invoice in FactureRepo::list_overdue(pool, today).await? {
        let Some(target) = facture_overdue(&invoice.status, invoice.due_date, today) else {
            continue;
        };
        if let Err(e) = facture::WORKFLOW.validate_transition(&invoice.status, target) {
            tracing::warn!(facture_id = invoice.id, error = %e, "Overdue rejected by workflow");
            report.errors += 1;
            continue;
        }
        match FactureRepo::update_status(pool, invoice.id, &invoice.status, target).await {
            Ok(Some(_)) => {
                tracing::info!(facture_id = invoice.id, reference = %invoice.reference, "Invoice overdue");
                report.overdue_factures += 1;
            }
            Ok(None) => {
                tracing::debug!(facture_id = invoice.id, "Invoice status changed meanwhile, skipped");
            }
            Err(e) => {
                tracing::error!(facture_id = invoice.id, error = %e, "Failed to mark invoice overdue");
                report.errors += 1;
            }
        }
    }

    tracing::info!(
        expired_devis = report.expired_devis,
        overdue_factures = report.overdue_factures,
        errors = report.errors,
        "Status update finished"
    );
    Ok(report)
}
