//! Attribution of exchanges to beneficiary associations.
//!
//! A member's donations go to their first-choice association if it
//! qualifies, else to their second choice if that one qualifies, else to
//! the default association. Attribution is resolved once per member.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use eusko_shared::DonationConfig;
use eusko_shared::types::round;

use crate::directory::{Association, Member};
use crate::donation::types::{
    AssociationDonation, AssociationRef, DonationPeriod, DonationReport,
};

/// Share of each exchange given away: 3%.
pub const DONATION_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);

const CENTS: u32 = 2;

#[derive(Debug)]
struct Tally {
    name: String,
    sponsorships: u32,
    second_choices: u32,
    donated: Decimal,
}

/// Running totals of one calculation.
#[derive(Debug)]
pub struct Allocation<'a> {
    config: &'a DonationConfig,
    by_id: HashMap<&'a str, &'a Association>,
    tallies: BTreeMap<String, Tally>,
    beneficiaries: HashMap<String, String>,
    total_exchanged: Decimal,
    total_donated: Decimal,
}

impl<'a> Allocation<'a> {
    /// Starts with every qualifying association at zero.
    #[must_use]
    pub fn new(associations: &'a [Association], config: &'a DonationConfig) -> Self {
        let tallies = associations
            .iter()
            .filter(|association| association.sponsorship_count >= config.minimum_sponsorships)
            .map(|association| {
                (
                    association.member_number.clone(),
                    Tally {
                        name: association.name.clone(),
                        sponsorships: association.sponsorship_count,
                        second_choices: 0,
                        donated: Decimal::ZERO,
                    },
                )
            })
            .collect();

        Self {
            config,
            by_id: associations
                .iter()
                .map(|association| (association.id.as_str(), association))
                .collect(),
            tallies,
            beneficiaries: HashMap::new(),
            total_exchanged: Decimal::ZERO,
            total_donated: Decimal::ZERO,
        }
    }

    /// Beneficiary already resolved for a member.
    #[must_use]
    pub fn beneficiary(&self, member_login: &str) -> Option<&str> {
        self.beneficiaries.get(member_login).map(String::as_str)
    }

    /// Resolves and remembers a member's beneficiary.
    ///
    /// `member` is `None` when the directory does not know the member.
    pub fn resolve(&mut self, member_login: &str, member: Option<&Member>) -> String {
        if let Some(known) = self.beneficiaries.get(member_login) {
            return known.clone();
        }

        let first = member.and_then(|m| self.qualifying(m.first_choice_association.as_deref()));
        let beneficiary = if let Some(number) = first {
            number
        } else if let Some(number) =
            member.and_then(|m| self.qualifying(m.second_choice_association.as_deref()))
        {
            if let Some(tally) = self.tallies.get_mut(&number) {
                tally.second_choices += 1;
            }
            number
        } else {
            self.config.default_association.clone()
        };

        self.beneficiaries
            .insert(member_login.to_string(), beneficiary.clone());
        beneficiary
    }

    /// Adds an exchange to a beneficiary's donation.
    pub fn credit(&mut self, beneficiary: &str, amount: Decimal) {
        let donation = amount * DONATION_RATE;
        if !self.tallies.contains_key(beneficiary) {
            let known = self
                .by_id
                .values()
                .find(|association| association.member_number == beneficiary);
            self.tallies.insert(
                beneficiary.to_string(),
                Tally {
                    name: known.map_or_else(
                        || self.config.default_association_name.clone(),
                        |association| association.name.clone(),
                    ),
                    sponsorships: known.map_or(0, |association| association.sponsorship_count),
                    second_choices: 0,
                    donated: Decimal::ZERO,
                },
            );
        }
        if let Some(tally) = self.tallies.get_mut(beneficiary) {
            tally.donated += donation;
        }
        self.total_exchanged += amount;
        self.total_donated += donation;
    }

    /// Closes the calculation.
    #[must_use]
    pub fn into_report(self, period: DonationPeriod) -> DonationReport {
        DonationReport {
            begin: period.begin,
            end: period.end,
            donations: self
                .tallies
                .into_iter()
                .map(|(member_number, tally)| AssociationDonation {
                    association: AssociationRef {
                        member_number,
                        name: tally.name,
                    },
                    amount: round(tally.donated, CENTS),
                    sponsorship_count: tally.sponsorships + tally.second_choices,
                })
                .collect(),
            total_exchanged: self.total_exchanged,
            total_donated: round(self.total_donated, CENTS),
        }
    }

    /// Member number of a directory association id, if it qualifies.
    fn qualifying(&self, association_id: Option<&str>) -> Option<String> {
        let association = self.by_id.get(association_id?)?;
        (association.sponsorship_count >= self.config.minimum_sponsorships)
            .then(|| association.member_number.clone())
    }
}
