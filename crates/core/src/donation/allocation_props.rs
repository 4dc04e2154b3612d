//! Property tests for donation attribution.

use proptest::prelude::*;
use rust_decimal::Decimal;

use eusko_shared::DonationConfig;
use eusko_shared::types::round;

use crate::directory::{Association, Member, MemberKind};
use crate::donation::allocation::{Allocation, DONATION_RATE};
use crate::donation::types::{DonationPeriod, DonationReport};
use crate::testing;

fn associations() -> Vec<Association> {
    vec![
        testing::association("1", "Z00001", "Euskal Moneta", 40),
        testing::association("2", "Z00010", "Ikastola", 45),
        testing::association("3", "Z00020", "Bertsulari", 5),
    ]
}

fn member(login: &str, first: &str, second: &str) -> Member {
    let mut member = testing::member(login, MemberKind::Individual);
    member.first_choice_association = Some(first.to_string());
    member.second_choice_association = Some(second.to_string());
    member
}

/// Logins E0..E3 with fixed choices; E3 is unknown to the directory.
fn members() -> Vec<Option<Member>> {
    vec![
        Some(member("E0", "2", "3")),
        Some(member("E1", "3", "2")),
        Some(member("E2", "3", "3")),
        None,
    ]
}

fn exchanges() -> impl Strategy<Value = Vec<(usize, Decimal)>> {
    prop::collection::vec((0usize..4, (1i64..1_000_000).prop_map(|c| Decimal::new(c, 2))), 0..40)
}

fn run(exchanges: &[(usize, Decimal)]) -> DonationReport {
    let associations = associations();
    let config = DonationConfig::default();
    let members = members();
    let mut allocation = Allocation::new(&associations, &config);
    for (who, amount) in exchanges {
        let login = format!("E{who}");
        let beneficiary = match allocation.beneficiary(&login) {
            Some(known) => known.to_string(),
            None => allocation.resolve(&login, members[*who].as_ref()),
        };
        allocation.credit(&beneficiary, *amount);
    }
    let day = testing::fixture_date().date_naive();
    allocation.into_report(DonationPeriod { begin: day, end: day })
}

proptest! {
    #[test]
    fn prop_order_does_not_change_the_report(
        (original, shuffled) in exchanges().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        prop_assert_eq!(run(&original), run(&shuffled));
    }

    #[test]
    fn prop_totals_follow_the_rate(exchanges in exchanges()) {
        let report = run(&exchanges);
        let total: Decimal = exchanges.iter().map(|(_, amount)| *amount).sum();
        prop_assert_eq!(report.total_exchanged, total);
        prop_assert_eq!(report.total_donated, round(total * DONATION_RATE, 2));
    }

    #[test]
    fn prop_second_choice_counted_once(exchanges in exchanges()) {
        let report = run(&exchanges);
        let ikastola = report.donation_to("Z00010").map(|d| d.sponsorship_count);
        let e1_exchanged = exchanges.iter().any(|(who, _)| *who == 1);
        prop_assert_eq!(ikastola, Some(45 + u32::from(e1_exchanged)));
    }
}
