//! Repository for the `document_sequences` table.

use agence_core::numbering::format_reference;

/// Allocates per-year reference numbers for quotes and invoices.
pub struct DocumentSequenceRepo;

impl DocumentSequenceRepo {
    /// Allocate the next sequence value for `(kind, year)`.
    ///
    /// The upsert takes a row lock, so concurrent allocations for the same
    /// key are serialized until the surrounding transaction ends.
    pub async fn next_value(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        kind: &str,
        year: i32,
    ) -> Result<i64, sqlx::Error> {
        let (value,): (i64,) = sqlx::query_as(
            "INSERT INTO document_sequences (kind, year, last_value)
             VALUES ($1, $2, 1)
             ON CONFLICT (kind, year) DO UPDATE SET
                last_value = document_sequences.last_value + 1
             RETURNING last_value",
        )
        .bind(kind)
        .bind(year)
        .fetch_one(&mut **tx)
        .await?;
        Ok(value)
    }

    /// Allocate and format the next reference, e.g. `DEV-2026-0007`.
    pub async fn next_reference(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        prefix: &str,
        year: i32,
    ) -> Result<String, sqlx::Error> {
        let value = Self::next_value(tx, prefix, year).await?;
        Ok(format_reference(prefix, year, value))
    }
}
