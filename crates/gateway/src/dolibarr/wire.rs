//! JSON shapes of the Dolibarr REST API.

use serde::Deserialize;

use eusko_core::directory::{Association, Member, MemberKind};

/// Dolibarr renders numbers either as JSON numbers or as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Count {
    Number(u32),
    Text(String),
}

impl Count {
    fn value(&self) -> Option<u32> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Ids come back as strings, sometimes as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_id(value: Option<RawId>) -> Option<String> {
    non_empty(value.map(RawId::into_string)).filter(|v| v != "0")
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemberWire {
    pub id: RawId,
    pub login: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub fk_asso: Option<RawId>,
    #[serde(default)]
    pub fk_asso2: Option<RawId>,
}

impl From<MemberWire> for Member {
    fn from(member: MemberWire) -> Self {
        Self {
            id: member.id.into_string(),
            login: member.login,
            kind: member
                .kind
                .as_deref()
                .map_or(MemberKind::Other, MemberKind::from_label),
            firstname: member.firstname.unwrap_or_default(),
            lastname: member.lastname.unwrap_or_default(),
            company: non_empty(member.company),
            email: non_empty(member.email),
            first_choice_association: non_empty_id(member.fk_asso),
            second_choice_association: non_empty_id(member.fk_asso2),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssociationWire {
    pub id: RawId,
    pub code_client: String,
    pub nom: String,
    pub nb_parrains: Option<Count>,
}

impl From<AssociationWire> for Association {
    fn from(association: AssociationWire) -> Self {
        Self {
            id: association.id.into_string(),
            member_number: association.code_client,
            name: association.nom,
            sponsorship_count: association
                .nb_parrains
                .as_ref()
                .and_then(Count::value)
                .unwrap_or(0),
        }
    }
}
