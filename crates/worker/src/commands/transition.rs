//! `transition`: apply a workflow action to a quote, invoice or prospect.

use agence_core::error::CoreError;
use agence_core::types::DbId;
use agence_core::workflow::{prospect, WorkflowKind};
use agence_db::repositories::{DevisRepo, FactureRepo, ProspectRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::WorkerError;

/// What a successful transition changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    pub kind: &'static str,
    pub id: DbId,
    /// Document reference, or the prospect name.
    pub reference: String,
    pub from: String,
    pub to: &'static str,
    pub message: String,
    /// Client created or linked when a prospect is won.
    pub client_id: Option<DbId>,
}

/// Move an entity along its workflow by action name (`envoyer`, `encaisser`,
/// `gagner`, ...).
///
/// Fails with a validation error when the action is unknown or its target
/// is not reachable from the current status, and with a conflict when the
/// status changed between the read and the update.
pub async fn run(
    pool: &PgPool,
    kind: WorkflowKind,
    id: DbId,
    action: &str,
) -> Result<TransitionOutcome, WorkerError> {
    let workflow = kind.config();

    let (reference, from, to, client_id) = match kind {
        WorkflowKind::Devis => {
            let quote = DevisRepo::find_by_id(pool, id)
                .await?
                .ok_or(CoreError::NotFound { entity: "devis", id })?;
            let to = workflow.apply_action(&quote.status, action)?;
            DevisRepo::update_status(pool, id, &quote.status, to)
                .await?
                .ok_or_else(|| concurrent_change(kind, id))?;
            (quote.reference, quote.status, to, None)
        }
        WorkflowKind::Facture => {
            let invoice = FactureRepo::find_by_id(pool, id)
                .await?
                .ok_or(CoreError::NotFound { entity: "facture", id })?;
            let to = workflow.apply_action(&invoice.status, action)?;
            FactureRepo::update_status(pool, id, &invoice.status, to)
                .await?
                .ok_or_else(|| concurrent_change(kind, id))?;
            (invoice.reference, invoice.status, to, None)
        }
        WorkflowKind::Prospect => {
            let lead = ProspectRepo::find_by_id(pool, id)
                .await?
                .ok_or(CoreError::NotFound { entity: "prospect", id })?;
            let to = workflow.apply_action(&lead.status, action)?;
            let client_id = if to == prospect::STATUS_GAGNE {
                let (_, client) = ProspectRepo::mark_won(pool, id, &lead.status, to)
                    .await?
                    .ok_or_else(|| concurrent_change(kind, id))?;
                Some(client.id)
            } else {
                ProspectRepo::update_status(pool, id, &lead.status, to)
                    .await?
                    .ok_or_else(|| concurrent_change(kind, id))?;
                lead.client_id
            };
            (lead.name, lead.status, to, client_id)
        }
    };

    let message = workflow.transition_message(&reference, to);
    tracing::info!(kind = kind.as_str(), id, %from, to, "Workflow transition applied");

    Ok(TransitionOutcome {
        kind: kind.as_str(),
        id,
        reference,
        from,
        to,
        message,
        client_id,
    })
}

fn concurrent_change(kind: WorkflowKind, id: DbId) -> CoreError {
    CoreError::Conflict(format!("The status of {kind} {id} changed meanwhile, retry"))
}
