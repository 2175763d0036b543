//! Repository for the `devis` and `devis_items` tables.

use agence_core::line_item::{DevisItem, DocumentItem};
use agence_core::money::{validate_percentage, DEFAULT_VAT_RATE};
use agence_core::numbering::PREFIX_DEVIS;
use agence_core::status_rules::default_valid_until;
use agence_core::totals::DevisAmounts;
use agence_core::types::{Date, DbId};
use agence_core::workflow::devis;
use chrono::Datelike;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::devis::{CreateDevis, Devis, DevisItemRow};
use crate::repositories::DocumentSequenceRepo;

/// Column list for devis queries.
const COLUMNS: &str = "id, reference, client_id, title, status, vat_rate, total_ht, total_vat, \
    total_ttc, valid_until, sent_at, accepted_at, created_at, updated_at";

/// Column list for devis_items queries.
const ITEM_COLUMNS: &str =
    "id, devis_id, position, description, quantity, unit_price, discount, vat_rate, total";

/// Provides data access for quotes and their lines.
pub struct DevisRepo;

impl DevisRepo {
    /// Create a quote with its lines in one transaction.
    ///
    /// Allocates the next `DEV-{year}-NNNN` reference for the year of
    /// `issued_on` and stores totals computed from the lines. Invalid lines
    /// or VAT rate are rejected before anything is written.
    pub async fn create(pool: &PgPool, input: &CreateDevis, issued_on: Date) -> DbResult<Devis> {
        input.validate()?;
        let vat_rate = input.vat_rate.unwrap_or(DEFAULT_VAT_RATE);
        let amounts = DevisAmounts::from_items(&input.items, vat_rate);
        let valid_until = input
            .valid_until
            .unwrap_or_else(|| default_valid_until(issued_on));

        let mut tx = pool.begin().await?;
        let reference =
            DocumentSequenceRepo::next_reference(&mut tx, PREFIX_DEVIS, issued_on.year()).await?;

        let query = format!(
            "INSERT INTO devis
                (reference, client_id, title, vat_rate, total_ht, total_vat, total_ttc, valid_until)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let devis = sqlx::query_as::<_, Devis>(&query)
            .bind(&reference)
            .bind(input.client_id)
            .bind(&input.title)
            .bind(amounts.vat_rate())
            .bind(amounts.total_ht())
            .bind(amounts.total_vat())
            .bind(amounts.total_ttc())
            .bind(valid_until)
            .fetch_one(&mut *tx)
            .await?;

        for (index, item) in input.items.iter().enumerate() {
            Self::insert_item(&mut tx, devis.id, index, item).await?;
        }

        tx.commit().await?;
        tracing::debug!(devis_id = devis.id, reference = %devis.reference, "Quote created");
        Ok(devis)
    }

    /// Find a quote by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Devis>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devis WHERE id = $1");
        sqlx::query_as::<_, Devis>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a quote by its reference.
    pub async fn find_by_reference(
        pool: &PgPool,
        reference: &str,
    ) -> Result<Option<Devis>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devis WHERE reference = $1");
        sqlx::query_as::<_, Devis>(&query)
            .bind(reference)
            .fetch_optional(pool)
            .await
    }

    /// Lines of a quote, in display order.
    pub async fn list_items(pool: &PgPool, devis_id: DbId) -> Result<Vec<DevisItemRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM devis_items
             WHERE devis_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, DevisItemRow>(&query)
            .bind(devis_id)
            .fetch_all(pool)
            .await
    }

    /// Quotes in any of `statuses`, newest first.
    pub async fn list_by_status(
        pool: &PgPool,
        statuses: &[&str],
    ) -> Result<Vec<Devis>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM devis
             WHERE status = ANY($1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Devis>(&query)
            .bind(statuses)
            .fetch_all(pool)
            .await
    }

    /// Quotes awaiting an answer whose validity ended before `today`.
    pub async fn list_lapsed(pool: &PgPool, today: Date) -> Result<Vec<Devis>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM devis
             WHERE status = ANY($1) AND valid_until < $2
             ORDER BY valid_until ASC, id ASC"
        );
        sqlx::query_as::<_, Devis>(&query)
            .bind(devis::AWAITING_ANSWER)
            .bind(today)
            .fetch_all(pool)
            .await
    }

    /// Move a quote from `from` to `to`, stamping `sent_at` on first send
    /// and `accepted_at` on acceptance.
    ///
    /// Returns `None` if the quote does not exist or is no longer in `from`.
    /// Transition rules are enforced by the caller.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<Devis>, sqlx::Error> {
        let query = format!(
            "UPDATE devis SET
                status = $3,
                sent_at = CASE WHEN $3 = '{sent}' THEN COALESCE(sent_at, NOW()) ELSE sent_at END,
                accepted_at = CASE WHEN $3 = '{accepted}' THEN NOW() ELSE accepted_at END,
                updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}",
            sent = devis::STATUS_ENVOYE,
            accepted = devis::STATUS_ACCEPTE,
        );
        sqlx::query_as::<_, Devis>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// Change the quote VAT rate. `total_ht` is kept, VAT and TTC follow.
    pub async fn set_vat_rate(
        pool: &PgPool,
        id: DbId,
        vat_rate: Decimal,
    ) -> DbResult<Option<Devis>> {
        validate_percentage("vat_rate", vat_rate)?;
        let Some(current) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let amounts = DevisAmounts::new(current.total_ht, vat_rate);

        let query = format!(
            "UPDATE devis SET
                vat_rate = $2, total_vat = $3, total_ttc = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let devis = sqlx::query_as::<_, Devis>(&query)
            .bind(id)
            .bind(amounts.vat_rate())
            .bind(amounts.total_vat())
            .bind(amounts.total_ttc())
            .fetch_optional(pool)
            .await?;
        Ok(devis)
    }

    async fn insert_item(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        devis_id: DbId,
        index: usize,
        item: &DevisItem,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO devis_items
                (devis_id, position, description, quantity, unit_price, discount, vat_rate, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(devis_id)
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
