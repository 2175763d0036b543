//! Invoice (facture) workflow.
//!
//! ```text
//! brouillon  -> a_envoyer, annulee
//! a_envoyer  -> envoyee, brouillon, annulee
//! envoyee    -> relancee, en_retard, payee, annulee
//! en_retard  -> relancee, payee, annulee
//! relancee   -> relancee, en_retard, payee, annulee
//! payee, annulee: terminal
//! ```

use super::{ActionDef, Badge, Gender, StatusDef, WorkflowConfig};

pub const STATUS_BROUILLON: &str = "brouillon";
pub const STATUS_A_ENVOYER: &str = "a_envoyer";
pub const STATUS_ENVOYEE: &str = "envoyee";
pub const STATUS_RELANCEE: &str = "relancee";
pub const STATUS_EN_RETARD: &str = "en_retard";
pub const STATUS_PAYEE: &str = "payee";
pub const STATUS_ANNULEE: &str = "annulee";

/// Statuses in which payment is expected and the due date matters.
pub const AWAITING_PAYMENT: &[&str] = &[STATUS_ENVOYEE, STATUS_RELANCEE];

pub static WORKFLOW: WorkflowConfig = WorkflowConfig {
    entity: "Facture",
    noun: "facture",
    gender: Gender::Feminine,
    initial_status: STATUS_BROUILLON,
    statuses: &[
        StatusDef {
            status: STATUS_BROUILLON,
            label: "Brouillon",
            badge: Badge::Secondary,
            transitions: &[STATUS_A_ENVOYER, STATUS_ANNULEE],
        },
        StatusDef {
            status: STATUS_A_ENVOYER,
            label: "À envoyer",
            badge: Badge::Info,
            transitions: &[STATUS_ENVOYEE, STATUS_BROUILLON, STATUS_ANNULEE],
        },
        StatusDef {
            status: STATUS_ENVOYEE,
            label: "Envoyée",
            badge: Badge::Primary,
            transitions: &[STATUS_RELANCEE, STATUS_EN_RETARD, STATUS_PAYEE, STATUS_ANNULEE],
        },
        StatusDef {
            status: STATUS_EN_RETARD,
            label: "En retard",
            badge: Badge::Danger,
            transitions: &[STATUS_RELANCEE, STATUS_PAYEE, STATUS_ANNULEE],
        },
        StatusDef {
            status: STATUS_RELANCEE,
            label: "Relancée",
            badge: Badge::Warning,
            transitions: &[STATUS_RELANCEE, STATUS_EN_RETARD, STATUS_PAYEE, STATUS_ANNULEE],
        },
        StatusDef {
            status: STATUS_PAYEE,
            label: "Payée",
            badge: Badge::Success,
            transitions: &[],
        },
        StatusDef {
            status: STATUS_ANNULEE,
            label: "Annulée",
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
            label: "Prête à envoyer",
            status: STATUS_A_ENVOYER,
        },
        ActionDef {
            action: "envoyer",
            label: "Marquer comme envoyée",
            status: STATUS_ENVOYEE,
        },
        ActionDef {
            action: "relancer",
            label: "Relancer",
            status: STATUS_RELANCEE,
        },
        ActionDef {
            action: "marquer_en_retard",
            label: "Marquer en retard",
            status: STATUS_EN_RETARD,
        },
        ActionDef {
            action: "encaisser",
            label: "Marquer comme payée",
            status: STATUS_PAYEE,
        },
        ActionDef {
            action: "annuler",
            label: "Annuler",
            status: STATUS_ANNULEE,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sent_invoice_can_be_paid_or_go_overdue() {
        assert!(WORKFLOW.is_allowed(STATUS_ENVOYEE, STATUS_PAYEE));
        assert!(WORKFLOW.is_allowed(STATUS_ENVOYEE, STATUS_EN_RETARD));
    }

    #[test]
    fn overdue_invoice_cannot_go_back_to_sent() {
        assert!(!WORKFLOW.is_allowed(STATUS_EN_RETARD, STATUS_ENVOYEE));
        assert!(WORKFLOW.is_allowed(STATUS_EN_RETARD, STATUS_RELANCEE));
    }

    #[test]
    fn draft_cannot_be_paid_directly() {
        assert!(WORKFLOW.validate_transition(STATUS_BROUILLON, STATUS_PAYEE).is_err());
    }

    #[test]
    fn paid_and_cancelled_are_terminal() {
        assert!(WORKFLOW.is_terminal(STATUS_PAYEE));
        assert!(WORKFLOW.is_terminal(STATUS_ANNULEE));
        assert!(!WORKFLOW.is_terminal(STATUS_EN_RETARD));
    }

    #[test]
    fn cash_in_action_maps_to_paid() {
        assert_eq!(WORKFLOW.status_for_action("encaisser"), Some(STATUS_PAYEE));
        assert_eq!(WORKFLOW.action_for_status(STATUS_PAYEE), Some("encaisser"));
    }
}
