//! Property-based tests for WorkflowService.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use eusko_shared::types::{PaymentTypeId, PostingId, StatusFlowId, StatusId};

use crate::ledger::Posting;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{FlowKind, StatusFlow};

const STATUSES: [&str; 6] = [
    "a_rapprocher",
    "rapproche",
    "a_remettre_a_euskal_moneta",
    "remis_a_euskal_moneta",
    "virements_a_faire",
    "virements_faits",
];

fn flows() -> Vec<StatusFlow> {
    vec![
        StatusFlow::linear(
            FlowKind::Reconciliation,
            StatusFlowId::new("rapprochement"),
            StatusId::new(STATUSES[0]),
            StatusId::new(STATUSES[1]),
        ),
        StatusFlow::linear(
            FlowKind::Remittance,
            StatusFlowId::new("remise"),
            StatusId::new(STATUSES[2]),
            StatusId::new(STATUSES[3]),
        ),
        StatusFlow::linear(
            FlowKind::Transfers,
            StatusFlowId::new("virements"),
            StatusId::new(STATUSES[4]),
            StatusId::new(STATUSES[5]),
        ),
    ]
}

/// Strategy for the set of statuses a posting currently holds.
fn arb_statuses() -> impl Strategy<Value = Vec<StatusId>> {
    proptest::sample::subsequence(STATUSES.to_vec(), 0..=3)
        .prop_map(|picked| picked.into_iter().map(StatusId::new).collect())
}

fn arb_flow() -> impl Strategy<Value = StatusFlow> {
    (0usize..3).prop_map(|i| flows().swap_remove(i))
}

fn arb_target() -> impl Strategy<Value = StatusId> {
    proptest::sample::select(STATUSES.to_vec()).prop_map(StatusId::new)
}

fn posting(statuses: Vec<StatusId>) -> Posting {
    Posting {
        id: PostingId::new("1"),
        transaction_id: None,
        date: Utc::now(),
        amount: Decimal::ONE,
        payment_type: PaymentTypeId::new("pt"),
        description: String::new(),
        custom_values: vec![],
        statuses,
        related_owner: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Any accepted transition follows exactly one edge of the flow.
    #[test]
    fn prop_accepted_transitions_follow_an_edge(
        flow in arb_flow(),
        statuses in arb_statuses(),
        target in arb_target(),
    ) {
        let posting = posting(statuses);
        if let Ok(transition) = WorkflowService::plan(&flow, &posting, &target) {
            let edges = flow
                .edges
                .iter()
                .filter(|edge| edge.from == transition.from && edge.to == transition.to)
                .count();
            prop_assert_eq!(edges, 1);
            prop_assert!(flow.contains(&transition.to));
            prop_assert!(posting.has_status(&transition.from));
        }
    }

    /// A terminal status is never left nor re-entered.
    #[test]
    fn prop_terminal_status_is_final(flow in arb_flow(), target in arb_target()) {
        let done = flow.edges[0].to.clone();
        let posting = posting(vec![done]);
        prop_assert!(WorkflowService::plan(&flow, &posting, &target).is_err());
    }

    /// A pending posting always reaches its flow's terminal status.
    #[test]
    fn prop_pending_reaches_terminal(flow in arb_flow()) {
        let edge = flow.edges[0].clone();
        let posting = posting(vec![edge.from.clone()]);
        let transition = WorkflowService::plan(&flow, &posting, &edge.to);
        prop_assert!(transition.is_ok());
    }
}
