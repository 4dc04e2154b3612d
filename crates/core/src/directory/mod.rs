//! Member directory contract.
//!
//! Members and associations live in the member-management system. The core
//! only reads them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// A private person.
    Individual,
    /// A business accepting eusko.
    Business,
    /// Any other membership (associations, partners).
    Other,
}

impl MemberKind {
    /// Maps the directory's membership type label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "particulier" => Self::Individual,
            "entreprise" | "prestataire" => Self::Business,
            _ => Self::Other,
        }
    }
}

/// A member as known by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Directory id.
    pub id: String,
    /// Member number, also the ledger login (e.g. `E12345`).
    pub login: String,
    /// Membership kind.
    pub kind: MemberKind,
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Company name for businesses.
    pub company: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Directory id of the first-choice sponsored association.
    pub first_choice_association: Option<String>,
    /// Directory id of the second-choice sponsored association.
    pub second_choice_association: Option<String>,
}

impl Member {
    /// Name shown in ledger descriptions.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.company {
            Some(company) if !company.is_empty() => company.clone(),
            _ => format!("{} {}", self.firstname, self.lastname).trim().to_string(),
        }
    }
}

/// An association that may receive donations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Directory id, referenced by members' sponsor choices.
    pub id: String,
    /// Member number of the association (e.g. `Z00001`).
    pub member_number: String,
    /// Name.
    pub name: String,
    /// Number of members sponsoring it as first choice.
    pub sponsorship_count: u32,
}

/// Failure of a directory call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Member directory call {call} failed: {message}")]
pub struct DirectoryError {
    /// Remote resource.
    pub call: String,
    /// Error detail.
    pub message: String,
}

impl DirectoryError {
    /// Creates an error for a remote resource.
    #[must_use]
    pub fn new(call: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            call: call.into(),
            message: message.into(),
        }
    }
}

/// Read access to the member directory.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Finds a member by login.
    async fn member_by_login(&self, login: &str) -> Result<Option<Member>, DirectoryError>;

    /// Lists every association with its sponsorship count.
    async fn associations(&self) -> Result<Vec<Association>, DirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Particulier", MemberKind::Individual)]
    #[case("particulier ", MemberKind::Individual)]
    #[case("Entreprise", MemberKind::Business)]
    #[case("Association", MemberKind::Other)]
    fn test_member_kind_from_label(#[case] label: &str, #[case] kind: MemberKind) {
        assert_eq!(MemberKind::from_label(label), kind);
    }

    #[test]
    fn test_display_name_prefers_company() {
        let mut member = Member {
            id: "1".to_string(),
            login: "E00001".to_string(),
            kind: MemberKind::Business,
            firstname: "Maite".to_string(),
            lastname: "Bidart".to_string(),
            company: Some("Txokoa".to_string()),
            email: None,
            first_choice_association: None,
            second_choice_association: None,
        };
        assert_eq!(member.display_name(), "Txokoa");
        member.company = None;
        assert_eq!(member.display_name(), "Maite Bidart");
    }
}
