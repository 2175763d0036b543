//! `invoice`: deposit and balance invoices issued from an accepted quote.

use agence_core::error::CoreError;
use agence_core::totals::{
    balance_item, deposit_item, INVOICE_TYPE_ACOMPTE, INVOICE_TYPE_SOLDE,
};
use agence_core::types::{Date, DbId};
use agence_core::workflow::{devis, facture};
use agence_db::models::devis::Devis;
use agence_db::models::facture::{CreateFacture, Facture};
use agence_db::repositories::{DevisRepo, FactureRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::WorkerError;

/// Issue a deposit invoice for `percent`% of an accepted quote.
///
/// Refused with a conflict once a live balance invoice exists, or when the
/// live deposits would cover the whole quote.
pub async fn create_deposit(
    pool: &PgPool,
    devis_id: DbId,
    percent: Decimal,
    today: Date,
) -> Result<Facture, WorkerError> {
    let quote = accepted_devis(pool, devis_id).await?;
    let item = deposit_item(&quote.reference, quote.total_ht, percent, quote.vat_rate)?;

    let existing = FactureRepo::list_by_devis(pool, devis_id).await?;
    if let Some(balance) = live_balance(&existing) {
        return Err(CoreError::Conflict(format!(
            "Devis {} is already settled by balance invoice {}",
            quote.reference, balance.reference
        ))
        .into());
    }

    // Deposits must leave something for the balance invoice.
    let deposited: Decimal = FactureRepo::deposits_ht_for_devis(pool, devis_id)
        .await?
        .iter()
        .sum();
    if deposited + item.unit_price >= quote.total_ht {
        return Err(CoreError::Conflict(format!(
            "A deposit of {} on top of {deposited} already invoiced would reach the {} total of devis {}",
            item.unit_price, quote.total_ht, quote.reference
        ))
        .into());
    }

    let input = CreateFacture {
        client_id: quote.client_id,
        devis_id: Some(quote.id),
        invoice_type: INVOICE_TYPE_ACOMPTE.to_string(),
        title: format!("{} (acompte)", quote.title),
        due_date: None,
        items: vec![item],
    };
    let invoice = FactureRepo::create(pool, &input, today).await?;
    tracing::info!(devis_id, facture_id = invoice.id, reference = %invoice.reference, %percent, "Deposit invoice created");
    Ok(invoice)
}

/// Issue the balance invoice of an accepted quote: its HT minus every
/// non-cancelled deposit. A quote has at most one live balance invoice.
pub async fn create_balance(
    pool: &PgPool,
    devis_id: DbId,
    today: Date,
) -> Result<Facture, WorkerError> {
    let quote = accepted_devis(pool, devis_id).await?;

    let existing = FactureRepo::list_by_devis(pool, devis_id).await?;
    if let Some(balance) = live_balance(&existing) {
        return Err(CoreError::Conflict(format!(
            "Devis {} already has balance invoice {}",
            quote.reference, balance.reference
        ))
        .into());
    }

    let deposits = FactureRepo::deposits_ht_for_devis(pool, devis_id).await?;
    let item = balance_item(&quote.reference, quote.total_ht, &deposits, quote.vat_rate)?;

    let input = CreateFacture {
        client_id: quote.client_id,
        devis_id: Some(quote.id),
        invoice_type: INVOICE_TYPE_SOLDE.to_string(),
        title: format!("{} (solde)", quote.title),
        due_date: None,
        items: vec![item],
    };
    let invoice = FactureRepo::create(pool, &input, today).await?;
    tracing::info!(devis_id, facture_id = invoice.id, reference = %invoice.reference, deposits = deposits.len(), "Balance invoice created");
    Ok(invoice)
}

fn live_balance(invoices: &[Facture]) -> Option<&Facture> {
    invoices
        .iter()
        .find(|f| f.invoice_type == INVOICE_TYPE_SOLDE && f.status != facture::STATUS_ANNULEE)
}

async fn accepted_devis(pool: &PgPool, devis_id: DbId) -> Result<Devis, WorkerError> {
    let quote = DevisRepo::find_by_id(pool, devis_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "devis",
            id: devis_id,
        })?;
    if quote.status != devis::STATUS_ACCEPTE {
        return Err(CoreError::Validation(format!(
            "Only accepted quotes can be invoiced; {} is '{}'",
            quote.reference, quote.status
        ))
        .into());
    }
    Ok(quote)
}
