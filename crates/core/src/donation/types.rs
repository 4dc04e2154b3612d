//! Donation report types.
//!
//! The report keeps the French field names the accounting team reads.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive date window of a donation calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationPeriod {
    /// First day.
    pub begin: NaiveDate,
    /// Last day, included.
    pub end: NaiveDate,
}

/// A euro to eusko exchange made by a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Login of the member who exchanged.
    pub member_login: String,
    /// Exchanged amount, positive.
    pub amount: Decimal,
}

/// Association identity in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRef {
    /// Member number of the association.
    #[serde(rename = "num_adherent")]
    pub member_number: String,
    /// Name.
    #[serde(rename = "nom")]
    pub name: String,
}

/// Donation owed to one association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationDonation {
    /// Receiving association.
    pub association: AssociationRef,
    /// Donation, rounded to cents.
    #[serde(rename = "montant_don")]
    pub amount: Decimal,
    /// First-choice sponsorships plus second-choice attributions.
    #[serde(rename = "nb_parrainages")]
    pub sponsorship_count: u32,
}

/// Result of a donation calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationReport {
    /// First day of the period, inclusive.
    #[serde(rename = "debut")]
    pub begin: NaiveDate,
    /// Last day of the period, inclusive.
    #[serde(rename = "fin")]
    pub end: NaiveDate,
    /// One entry per association, sorted by member number.
    #[serde(rename = "dons")]
    pub donations: Vec<AssociationDonation>,
    /// Euro exchanged into eusko over the period.
    #[serde(rename = "montant_total_changes")]
    pub total_exchanged: Decimal,
    /// Total donated, rounded to cents.
    #[serde(rename = "montant_total_dons")]
    pub total_donated: Decimal,
}

impl DonationReport {
    /// Entry of an association, if it received anything.
    #[must_use]
    pub fn donation_to(&self, member_number: &str) -> Option<&AssociationDonation> {
        self.donations
            .iter()
            .find(|donation| donation.association.member_number == member_number)
    }
}
