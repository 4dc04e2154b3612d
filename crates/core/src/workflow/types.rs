//! Status flow types.
//!
//! Each payment type with a workflow carries one status per flow. A flow is
//! a small directed graph; in this domain every flow has a single edge from
//! its pending status to its terminal status.

use serde::{Deserialize, Serialize};
use std::fmt;

use eusko_shared::types::{PostingId, StatusFlowId, StatusId};

/// The status flows provisioned in the ledger.
///
/// - Reconciliation: a_rapprocher → rapproche
/// - Remittance: a_remettre_a_euskal_moneta → remis_a_euskal_moneta
/// - Transfers: virements_a_faire → virements_faits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Reconciliation of vault, stock and bank movements.
    Reconciliation,
    /// Remittance of desk cash to Euskal Moneta.
    Remittance,
    /// Bank transfers between dedicated accounts.
    Transfers,
}

impl FlowKind {
    /// Returns the string representation of the flow.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reconciliation => "reconciliation",
            Self::Remittance => "remittance",
            Self::Transfers => "transfers",
        }
    }

    /// Parses a flow from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reconciliation" => Some(Self::Reconciliation),
            "remittance" => Some(Self::Remittance),
            "transfers" => Some(Self::Transfers),
            _ => None,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A legal move between two statuses of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEdge {
    /// Status before the move.
    pub from: StatusId,
    /// Status after the move.
    pub to: StatusId,
}

/// A status flow and its graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlow {
    /// Which flow this is.
    pub kind: FlowKind,
    /// Ledger id of the flow.
    pub id: StatusFlowId,
    /// Legal moves.
    pub edges: Vec<StatusEdge>,
}

impl StatusFlow {
    /// Builds a flow with a single pending → done edge.
    #[must_use]
    pub fn linear(kind: FlowKind, id: StatusFlowId, pending: StatusId, done: StatusId) -> Self {
        Self {
            kind,
            id,
            edges: vec![StatusEdge {
                from: pending,
                to: done,
            }],
        }
    }

    /// Returns true if the status belongs to this flow.
    #[must_use]
    pub fn contains(&self, status: &StatusId) -> bool {
        self.edges
            .iter()
            .any(|edge| &edge.from == status || &edge.to == status)
    }

    /// Statuses reachable from a status in one move.
    pub fn possible_next<'a>(&'a self, status: &'a StatusId) -> impl Iterator<Item = &'a StatusId> {
        self.edges
            .iter()
            .filter(move |edge| &edge.from == status)
            .map(|edge| &edge.to)
    }

    /// Returns true if moving from `from` to `to` follows an edge.
    #[must_use]
    pub fn is_valid_transition(&self, from: &StatusId, to: &StatusId) -> bool {
        self.possible_next(from).any(|next| next == to)
    }
}

/// A validated status change for one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    /// Posting to move.
    pub posting: PostingId,
    /// Flow the move happens in.
    pub flow: FlowKind,
    /// Current status.
    pub from: StatusId,
    /// New status.
    pub to: StatusId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remittance() -> StatusFlow {
        StatusFlow::linear(
            FlowKind::Remittance,
            StatusFlowId::new("remise"),
            StatusId::new("a_remettre"),
            StatusId::new("remis"),
        )
    }

    #[test]
    fn test_linear_flow_edges() {
        let flow = remittance();
        assert!(flow.is_valid_transition(&StatusId::new("a_remettre"), &StatusId::new("remis")));
        assert!(!flow.is_valid_transition(&StatusId::new("remis"), &StatusId::new("a_remettre")));
        assert!(!flow.is_valid_transition(&StatusId::new("remis"), &StatusId::new("remis")));
        assert!(flow.contains(&StatusId::new("remis")));
        assert!(!flow.contains(&StatusId::new("rapproche")));
    }

    #[test]
    fn test_flow_kind_parse_roundtrip() {
        for kind in [FlowKind::Reconciliation, FlowKind::Remittance, FlowKind::Transfers] {
            assert_eq!(FlowKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FlowKind::parse("unknown"), None);
    }
}
