//! Prospect entity model and DTOs.

use agence_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::client::CreateClient;

/// A row from the `prospects` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Prospect {
    pub id: DbId,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub next_follow_up: Option<Date>,
    pub client_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Prospect {
    /// Client created when this prospect is won.
    pub fn to_client(&self) -> CreateClient {
        CreateClient {
            name: self.name.clone(),
            company: self.company.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: None,
            notes: self.notes.clone(),
        }
    }
}

/// DTO for creating a new prospect. Status starts at `identifie`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProspect {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub next_follow_up: Option<Date>,
}
