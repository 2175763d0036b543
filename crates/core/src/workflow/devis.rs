//! Quote (devis) workflow.
//!
//! ```text
//! brouillon  -> a_envoyer, annule
//! a_envoyer  -> envoye, brouillon, annule
//! envoye     -> relance, accepte, refuse, expire
//! relance    -> relance, accepte, refuse, expire
//! accepte, refuse, expire, annule: terminal
//! ```

use super::{ActionDef, Badge, Gender, StatusDef, WorkflowConfig};

pub const STATUS_BROUILLON: &str = "brouillon";
pub const STATUS_A_ENVOYER: &str = "a_envoyer";
pub const STATUS_ENVOYE: &str = "envoye";
pub const STATUS_RELANCE: &str = "relance";
pub const STATUS_ACCEPTE: &str = "accepte";
pub const STATUS_REFUSE: &str = "refuse";
pub const STATUS_EXPIRE: &str = "expire";
pub const STATUS_ANNULE: &str = "annule";

/// Statuses in which the client has the quote in hand and may still answer.
pub const AWAITING_ANSWER: &[&str] = &[STATUS_ENVOYE, STATUS_RELANCE];

pub static WORKFLOW: WorkflowConfig = WorkflowConfig {
    entity: "Devis",
    noun: "devis",
    gender: Gender::Masculine,
    initial_status: STATUS_BROUILLON,
    statuses: &[
        StatusDef {
            status: STATUS_BROUILLON,
            label: "Brouillon",
            badge: Badge::Secondary,
            transitions: &[STATUS_A_ENVOYER, STATUS_ANNULE],
        },
        StatusDef {
            status: STATUS_A_ENVOYER,
            label: "À envoyer",
            badge: Badge::Info,
            transitions: &[STATUS_ENVOYE, STATUS_BROUILLON, STATUS_ANNULE],
        },
        StatusDef {
            status: STATUS_ENVOYE,
            label: "Envoyé",
            badge: Badge::Primary,
            transitions: &[STATUS_RELANCE, STATUS_ACCEPTE, STATUS_REFUSE, STATUS_EXPIRE],
        },
        StatusDef {
            status: STATUS_RELANCE,
            label: "Relancé",
            badge: Badge::Warning,
            transitions: &[STATUS_RELANCE, STATUS_ACCEPTE, STATUS_REFUSE, STATUS_EXPIRE],
        },
        StatusDef {
            status: STATUS_ACCEPTE,
            label: "Accepté",
            badge: Badge::Success,
            transitions: &[],
        },
        StatusDef {
            status: STATUS_REFUSE,
            label: "Refusé",
            badge: Badge::Danger,
            transitions: &[],
        },
        StatusDef {
            status: STATUS_EXPIRE,
            label: "Expiré",
            badge: Badge::Dark,
            transitions: &[],
        },
        StatusDef {
            status: STATUS_ANNULE,
            label: "Annulé",
            badge: Badge::Dark,
            transitions: &[],
        },
    ],
    actions: &[
        ActionDef {
            action: "repasser_brouillon",
            label: "Repasser en brouillon",
            status: STATUS_BROUILLON,
        },
        ActionDef {
            action: "preparer",
            label: "Prêt à envoyer",
            status: STATUS_A_ENVOYER,
        },
        ActionDef {
            action: "envoyer",
            label: "Marquer comme envoyé",
            status: STATUS_ENVOYE,
        },
        ActionDef {
            action: "relancer",
            label: "Relancer",
            status: STATUS_RELANCE,
        },
        ActionDef {
            action: "accepter",
            label: "Accepter",
            status: STATUS_ACCEPTE,
        },
        ActionDef {
            action: "refuser",
            label: "Refuser",
            status: STATUS_REFUSE,
        },
        ActionDef {
            action: "expirer",
            label: "Marquer comme expiré",
            status: STATUS_EXPIRE,
        },
        ActionDef {
            action: "annuler",
            label: "Annuler",
            status: STATUS_ANNULE,
        },
    ],
};
