//! Status workflows for quotes, invoices and prospects.
//!
//! Each entity kind declares a static [`WorkflowConfig`]: its statuses (with
//! label, badge and allowed targets), the back-office actions that move a
//! record to a status, and the grammatical gender used when formatting
//! transition messages. The methods on [`WorkflowConfig`] are pure table
//! lookups shared by every kind.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

pub mod devis;
pub mod facture;
pub mod prospect;

/* --------------------------------------------------------------------------
Table types
-------------------------------------------------------------------------- */

/// Grammatical gender of the entity noun, used for message agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Masculine,
    Feminine,
}

impl Gender {
    fn article(self) -> &'static str {
        match self {
            Gender::Masculine => "Le",
            Gender::Feminine => "La",
        }
    }

    fn agreement(self) -> &'static str {
        match self {
            Gender::Masculine => "",
            Gender::Feminine => "e",
        }
    }
}

/// Badge style the back office renders next to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Secondary,
    Info,
    Primary,
    Warning,
    Success,
    Danger,
    Dark,
}

/// One status of a workflow and the statuses reachable from it.
#[derive(Debug)]
pub struct StatusDef {
    pub status: &'static str,
    pub label: &'static str,
    pub badge: Badge,
    pub transitions: &'static [&'static str],
}

/// A back-office action and the status it moves a record to.
#[derive(Debug)]
pub struct ActionDef {
    pub action: &'static str,
    pub label: &'static str,
    pub status: &'static str,
}

/// Static workflow description for one entity kind.
#[derive(Debug)]
pub struct WorkflowConfig {
    /// Entity name used in error messages.
    pub entity: &'static str,
    /// Lowercase noun used in transition messages.
    pub noun: &'static str,
    pub gender: Gender,
    /// Status assigned to newly created records.
    pub initial_status: &'static str,
    pub statuses: &'static [StatusDef],
    pub actions: &'static [ActionDef],
}

/* --------------------------------------------------------------------------
Lookups
-------------------------------------------------------------------------- */

impl WorkflowConfig {
    fn find(&self, status: &str) -> Option<&'static StatusDef> {
        // `statuses` is a 'static slice, so the element borrow is 'static too.
        let statuses: &'static [StatusDef] = self.statuses;
        statuses.iter().find(|s| s.status == status)
    }

    /// All status values of this workflow, in declaration order.
    pub fn status_values(&self) -> Vec<&'static str> {
        self.statuses.iter().map(|s| s.status).collect()
    }

    pub fn is_known_status(&self, status: &str) -> bool {
        self.find(status).is_some()
    }

    /// Validate that a status string belongs to this workflow.
    pub fn validate_status(&self, status: &str) -> Result<(), CoreError> {
        if self.is_known_status(status) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Invalid {} status '{status}'. Must be one of: {}",
                self.entity,
                self.status_values().join(", ")
            )))
        }
    }

    /// Returns the set of statuses that `status` may transition to.
    ///
    /// Unknown statuses have no transitions.
    pub fn transitions(&self, status: &str) -> &'static [&'static str] {
        self.find(status).map(|s| s.transitions).unwrap_or(&[])
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn is_allowed(&self, from: &str, to: &str) -> bool {
        self.transitions(from).contains(&to)
    }

    /// A known status with no outgoing transitions.
    pub fn is_terminal(&self, status: &str) -> bool {
        self.find(status).is_some_and(|s| s.transitions.is_empty())
    }

    /// Validate that a status transition from `current` to `next` is allowed.
    pub fn validate_transition(&self, current: &str, next: &str) -> Result<(), CoreError> {
        self.validate_status(next)?;
        if self.is_allowed(current, next) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Cannot transition {} from '{current}' to '{next}'. Allowed transitions: {:?}",
                self.entity,
                self.transitions(current)
            )))
        }
    }

    /// Status an action moves a record to.
    pub fn status_for_action(&self, action: &str) -> Option<&'static str> {
        self.actions
            .iter()
            .find(|a| a.action == action)
            .map(|a| a.status)
    }

    /// Action that leads to `status`.
    pub fn action_for_status(&self, status: &str) -> Option<&'static str> {
        self.actions
            .iter()
            .find(|a| a.status == status)
            .map(|a| a.action)
    }

    /// Actions the back office offers for a record currently in `status`.
    pub fn available_actions(&self, status: &str) -> Vec<&'static ActionDef> {
        let actions: &'static [ActionDef] = self.actions;
        actions
            .iter()
            .filter(|a| self.is_allowed(status, a.status))
            .collect()
    }

    /// Resolve an action against the current status.
    ///
    /// Returns the target status when the action exists and its target is
    /// reachable from `current`.
    pub fn apply_action(&self, current: &str, action: &str) -> Result<&'static str, CoreError> {
        let target = self.status_for_action(action).ok_or_else(|| {
            CoreError::Validation(format!("Unknown {} action '{action}'", self.entity))
        })?;
        self.validate_transition(current, target)?;
        Ok(target)
    }

    /// Display label for a status. Unknown statuses have none.
    pub fn label(&self, status: &str) -> Option<&'static str> {
        self.find(status).map(|s| s.label)
    }

    /// Badge style for a status. Unknown statuses render as secondary.
    pub fn badge(&self, status: &str) -> Badge {
        self.find(status).map(|s| s.badge).unwrap_or(Badge::Secondary)
    }

    /// Human-readable message announcing that `reference` moved to `status`.
    ///
    /// ```text
    /// Le devis DEV-2026-0001 a été marqué comme « Envoyé ».
    /// La facture FAC-2026-0003 a été marquée comme « Payée ».
    /// ```
    pub fn transition_message(&self, reference: &str, status: &str) -> String {
        let label = self.label(status).unwrap_or(status);
        format!(
            "{} {} {reference} a été marqué{} comme « {label} ».",
            self.gender.article(),
            self.noun,
            self.gender.agreement(),
        )
    }
}

/* --------------------------------------------------------------------------
Kinds
-------------------------------------------------------------------------- */

/// The entity kinds that carry a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Devis,
    Facture,
    Prospect,
}

impl WorkflowKind {
    pub const ALL: [WorkflowKind; 3] = [
        WorkflowKind::Devis,
        WorkflowKind::Facture,
        WorkflowKind::Prospect,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowKind::Devis => "devis",
            WorkflowKind::Facture => "facture",
            WorkflowKind::Prospect => "prospect",
        }
    }

    /// The workflow table for this kind.
    pub fn config(self) -> &'static WorkflowConfig {
        match self {
            WorkflowKind::Devis => &devis::WORKFLOW,
            WorkflowKind::Facture => &facture::WORKFLOW,
            WorkflowKind::Prospect => &prospect::WORKFLOW,
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devis" => Ok(WorkflowKind::Devis),
            "facture" => Ok(WorkflowKind::Facture),
            "prospect" => Ok(WorkflowKind::Prospect),
            other => Err(CoreError::Validation(format!(
                "Unknown workflow kind '{other}'. Must be one of: devis, facture, prospect"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
