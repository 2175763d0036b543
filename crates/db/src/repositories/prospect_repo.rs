//! Repository for the `prospects` table.

use agence_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::Client;
use crate::models::prospect::{CreateProspect, Prospect};
use crate::repositories::ClientRepo;

/// Column list for prospects queries.
const COLUMNS: &str = "id, name, company, email, phone, source, status, notes, \
    next_follow_up, client_id, created_at, updated_at";

/// Provides data access for the prospect pipeline.
pub struct ProspectRepo;

impl ProspectRepo {
    /// Insert a new prospect in the initial `identifie` status.
    pub async fn create(pool: &PgPool, input: &CreateProspect) -> Result<Prospect, sqlx::Error> {
        let query = format!(
            "INSERT INTO prospects (name, company, email, phone, source, notes, next_follow_up)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prospect>(&query)
            .bind(&input.name)
            .bind(&input.company)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.source)
            .bind(&input.notes)
            .bind(input.next_follow_up)
            .fetch_one(pool)
            .await
    }

    /// Find a prospect by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Prospect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prospects WHERE id = $1");
        sqlx::query_as::<_, Prospect>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Prospects in the given status, soonest follow-up first.
    pub async fn list_by_status(pool: &PgPool, status: &str) -> Result<Vec<Prospect>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prospects
             WHERE status = $1
             ORDER BY next_follow_up ASC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, Prospect>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Move a prospect from `from` to `to`.
    ///
    /// Returns `None` if the prospect does not exist or is no longer in `from`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<Prospect>, sqlx::Error> {
        let query = format!(
            "UPDATE prospects SET status = $3, updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prospect>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// Move a prospect from `from` to `to` and make sure it has a client, in
    /// one transaction.
    ///
    /// Returns `None` if the prospect does not exist or is no longer in `from`;
    /// nothing is written in that case.
    pub async fn mark_won(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<(Prospect, Client)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM prospects WHERE id = $1 FOR UPDATE");
        let Some(prospect) = sqlx::query_as::<_, Prospect>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };
        if prospect.status != from {
            return Ok(None);
        }

        let client = match prospect.client_id {
            Some(client_id) => ClientRepo::find_in(&mut tx, client_id).await?,
            None => Self::link_new_client(&mut tx, &prospect).await?,
        };

        let query = format!(
            "UPDATE prospects SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let prospect = sqlx::query_as::<_, Prospect>(&query)
            .bind(id)
            .bind(to)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(prospect_id = id, client_id = client.id, status = to, "Prospect won");
        Ok(Some((prospect, client)))
    }

    async fn link_new_client(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        prospect: &Prospect,
    ) -> Result<Client, sqlx::Error> {
        let client = ClientRepo::create_in(tx, &prospect.to_client()).await?;
        sqlx::query("UPDATE prospects SET client_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(prospect.id)
            .bind(client.id)
            .execute(&mut **tx)
            .await?;
        Ok(client)
    }
}
