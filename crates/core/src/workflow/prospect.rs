//! Prospect pipeline workflow.
//!
//! ```text
//! identifie    -> contacte, perdu
//! contacte     -> relance, rdv, proposition, perdu
//! relance      -> relance, rdv, proposition, perdu
//! rdv          -> proposition, perdu
//! proposition  -> relance, gagne, perdu
//! gagne        terminal
//! perdu        -> identifie (reactivation)
//! ```

use super::{ActionDef, Badge, Gender, StatusDef, WorkflowConfig};

pub const STATUS_IDENTIFIE: &str = "identifie";
pub const STATUS_CONTACTE: &str = "contacte";
pub const STATUS_RELANCE: &str = "relance";
pub const STATUS_RDV: &str = "rdv";
pub const STATUS_PROPOSITION: &str = "proposition";
pub const STATUS_GAGNE: &str = "gagne";
pub const STATUS_PERDU: &str = "perdu";

pub static WORKFLOW: WorkflowConfig = WorkflowConfig {
    entity: "Prospect",
    noun: "prospect",
    gender: Gender::Masculine,
    initial_status: STATUS_IDENTIFIE,
    statuses: &[
        StatusDef {
            status: STATUS_IDENTIFIE,
            label: "Identifié",
            badge: Badge::Secondary,
            transitions: &[STATUS_CONTACTE, STATUS_PERDU],
        },
        StatusDef {
            status: STATUS_CONTACTE,
            label: "Contacté",
            badge: Badge::Info,
            transitions: &[STATUS_RELANCE, STATUS_RDV, STATUS_PROPOSITION, STATUS_PERDU],
        },
        StatusDef {
            status: STATUS_RELANCE,
            label: "Relancé",
            badge: Badge::Warning,
            transitions: &[STATUS_RELANCE, STATUS_RDV, STATUS_PROPOSITION, STATUS_PERDU],
        },
        StatusDef {
            status: STATUS_RDV,
            label: "Rendez-vous",
            badge: Badge::Primary,
            transitions: &[STATUS_PROPOSITION, STATUS_PERDU],
        },
        StatusDef {
            status: STATUS_PROPOSITION,
            label: "Proposition envoyée",
            badge: Badge::Primary,
            transitions: &[STATUS_RELANCE, STATUS_GAGNE, STATUS_PERDU],
        },
        StatusDef {
            status: STATUS_GAGNE,
            label: "Gagné",
            badge: Badge::Success,
            transitions: &[],
        },
        StatusDef {
            status: STATUS_PERDU,
            label: "Perdu",
            badge: Badge::Danger,
            transitions: &[STATUS_IDENTIFIE],
        },
    ],
    actions: &[
        ActionDef {
            action: "reactiver",
            label: "Réactiver",
            status: STATUS_IDENTIFIE,
        },
        ActionDef {
            action: "contacter",
            label: "Marquer comme contacté",
            status: STATUS_CONTACTE,
        },
        ActionDef {
            action: "relancer",
            label: "Relancer",
            status: STATUS_RELANCE,
        },
        ActionDef {
            action: "planifier_rdv",
            label: "Planifier un rendez-vous",
            status: STATUS_RDV,
        },
        ActionDef {
            action: "proposer",
            label: "Envoyer une proposition",
            status: STATUS_PROPOSITION,
        },
        ActionDef {
            action: "gagner",
            label: "Gagné",
            status: STATUS_GAGNE,
        },
        ActionDef {
            action: "perdre",
            label: "Perdu",
            status: STATUS_PERDU,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_prospect_can_be_reactivated() {
        assert!(WORKFLOW.is_allowed(STATUS_PERDU, STATUS_IDENTIFIE));
        assert!(!WORKFLOW.is_terminal(STATUS_PERDU));
        assert_eq!(
            WORKFLOW.apply_action(STATUS_PERDU, "reactiver").unwrap(),
            STATUS_IDENTIFIE
        );
    }

    #[test]
    fn lost_prospect_cannot_jump_back_into_pipeline() {
        assert!(!WORKFLOW.is_allowed(STATUS_PERDU, STATUS_CONTACTE));
        assert!(!WORKFLOW.is_allowed(STATUS_PERDU, STATUS_GAGNE));
    }

    #[test]
    fn won_prospect_is_terminal() {
        assert!(WORKFLOW.is_terminal(STATUS_GAGNE));
        assert!(WORKFLOW.apply_action(STATUS_GAGNE, "perdre").is_err());
    }

    #[test]
    fn only_a_proposal_can_be_won() {
        for from in [STATUS_IDENTIFIE, STATUS_CONTACTE, STATUS_RELANCE, STATUS_RDV] {
            assert!(!WORKFLOW.is_allowed(from, STATUS_GAGNE), "{from} -> gagne");
        }
        assert!(WORKFLOW.is_allowed(STATUS_PROPOSITION, STATUS_GAGNE));
    }

    #[test]
    fn every_open_stage_can_be_lost() {
        for from in [
            STATUS_IDENTIFIE,
            STATUS_CONTACTE,
            STATUS_RELANCE,
            STATUS_RDV,
            STATUS_PROPOSITION,
        ] {
            assert!(WORKFLOW.is_allowed(from, STATUS_PERDU), "{from} -> perdu");
        }
    }
}
