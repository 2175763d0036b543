//! Repository for the `factures` and `facture_items` tables.

use agence_core::line_item::{DocumentItem, FactureItem};
use agence_core::numbering::PREFIX_FACTURE;
use agence_core::status_rules::default_due_date;
use agence_core::totals::{FactureTotals, INVOICE_TYPE_ACOMPTE};
use agence_core::types::{Date, DbId};
use agence_core::workflow::facture;
use chrono::Datelike;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::facture::{CreateFacture, Facture, FactureItemRow};
use crate::repositories::DocumentSequenceRepo;

/// Column list for factures queries.
const COLUMNS: &str = "id, reference, client_id, devis_id, invoice_type, title, status, \
    total_ht, total_vat, total_ttc, due_date, sent_at, paid_at, created_at, updated_at";

/// Column list for facture_items queries.
const ITEM_COLUMNS: &str =
    "id, facture_id, position, description, quantity, unit_price, discount, vat_rate, total";

/// Provides data access for invoices and their lines.
pub struct FactureRepo;

impl FactureRepo {
    /// Create an invoice with its lines in one transaction.
    ///
    /// Allocates the next `FAC-{year}-NNNN` reference for the year of
    /// `issued_on`; `due_date` defaults to thirty days later. Invalid lines
    /// or invoice type are rejected before anything is written.
    pub async fn create(pool: &PgPool, input: &CreateFacture, issued_on: Date) -> DbResult<Facture> {
        input.validate()?;
        let totals = FactureTotals::from_items(&input.items);
        let due_date = input.due_date.unwrap_or_else(|| default_due_date(issued_on));

        let mut tx = pool.begin().await?;
        let reference =
            DocumentSequenceRepo::next_reference(&mut tx, PREFIX_FACTURE, issued_on.year())
                .await?;

        let query = format!(
            "INSERT INTO factures
                (reference, client_id, devis_id, invoice_type, title,
                 total_ht, total_vat, total_ttc, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let facture = sqlx::query_as::<_, Facture>(&query)
            .bind(&reference)
            .bind(input.client_id)
            .bind(input.devis_id)
            .bind(&input.invoice_type)
            .bind(&input.title)
            .bind(totals.total_ht)
            .bind(totals.total_vat)
            .bind(totals.total_ttc)
            .bind(due_date)
            .fetch_one(&mut *tx)
            .await?;

        for (index, item) in input.items.iter().enumerate() {
            Self::insert_item(&mut tx, facture.id, index, item).await?;
        }

        tx.commit().await?;
        Ok(facture)
    }

    /// Find an invoice by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Facture>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM factures WHERE id = $1");
        sqlx::query_as::<_, Facture>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lines of an invoice, in display order.
    pub async fn list_items(
        pool: &PgPool,
        facture_id: DbId,
    ) -> Result<Vec<FactureItemRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM facture_items
             WHERE facture_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, FactureItemRow>(&query)
            .bind(facture_id)
            .fetch_all(pool)
            .await
    }

    /// Invoices issued from a quote, oldest first.
    pub async fn list_by_devis(pool: &PgPool, devis_id: DbId) -> Result<Vec<Facture>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM factures
             WHERE devis_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Facture>(&query)
            .bind(devis_id)
            .fetch_all(pool)
            .await
    }

    /// HT amounts of the non-cancelled deposit invoices of a quote.
    pub async fn deposits_ht_for_devis(
        pool: &PgPool,
        devis_id: DbId,
    ) -> Result<Vec<Decimal>, sqlx::Error> {
        let rows: Vec<(Decimal,)> = sqlx::query_as(
            "SELECT total_ht FROM factures
             WHERE devis_id = $1 AND invoice_type = $2 AND status <> $3
             ORDER BY id ASC",
        )
        .bind(devis_id)
        .bind(INVOICE_TYPE_ACOMPTE)
        .bind(facture::STATUS_ANNULEE)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(ht,)| ht).collect())
    }

    /// Invoices awaiting payment whose due date is before `today`.
    pub async fn list_overdue(pool: &PgPool, today: Date) -> Result<Vec<Facture>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM factures
             WHERE status = ANY($1) AND due_date < $2
             ORDER BY due_date ASC, id ASC"
        );
        sqlx::query_as::<_, Facture>(&query)
            .bind(facture::AWAITING_PAYMENT)
            .bind(today)
            .fetch_all(pool)
            .await
    }

    /// Move an invoice from `from` to `to`, stamping `sent_at` on first send
    /// and `paid_at` on payment.
    ///
    /// Returns `None` if the invoice does not exist or is no longer in `from`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<Facture>, sqlx::Error> {
        let query = format!(
            "UPDATE factures SET
                status = $3,
                sent_at = CASE WHEN $3 = '{sent}' THEN COALESCE(sent_at, NOW()) ELSE sent_at END,
                paid_at = CASE WHEN $3 = '{paid}' THEN NOW() ELSE paid_at END,
                updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}",
            sent = facture::STATUS_ENVOYEE,
            paid = facture::STATUS_PAYEE,
        );
        sqlx::query_as::<_, Facture>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    async fn insert_item(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        facture_id: DbId,
        index: usize,
        item: &FactureItem,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO facture_items
                (facture_id, position, description, quantity, unit_price, discount, vat_rate, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(facture_id)
        .bind(index as i32 + 1)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.discount)
        .bind(item.vat_rate)
        .bind(item.total())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
