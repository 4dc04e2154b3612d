//! Payment modes accepted at a bureau de change desk.

use std::fmt;

use serde::{Deserialize, Serialize};

use eusko_shared::types::Currency;

/// How a member pays at the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    /// Euro notes and coins.
    #[serde(rename = "Euro-LIQ")]
    EuroCash,
    /// Euro cheque.
    #[serde(rename = "Euro-CHQ")]
    EuroCheque,
    /// Eusko notes.
    #[serde(rename = "Eusko-LIQ")]
    EuskoCash,
}

impl PaymentMode {
    /// All modes, in display order.
    pub const ALL: [Self; 3] = [Self::EuroCash, Self::EuroCheque, Self::EuskoCash];

    /// Returns the wire code of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EuroCash => "Euro-LIQ",
            Self::EuroCheque => "Euro-CHQ",
            Self::EuskoCash => "Eusko-LIQ",
        }
    }

    /// Parses a mode from its wire code.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Euro-LIQ" => Some(Self::EuroCash),
            "Euro-CHQ" => Some(Self::EuroCheque),
            "Eusko-LIQ" => Some(Self::EuskoCash),
            _ => None,
        }
    }

    /// Label shown in ledger descriptions.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EuroCash | Self::EuskoCash => "Espèces",
            Self::EuroCheque => "Chèque",
        }
    }

    /// Currency the member pays in.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        match self {
            Self::EuroCash | Self::EuroCheque => Currency::Euro,
            Self::EuskoCash => Currency::Eusko,
        }
    }

    /// Returns true if the mode is a cheque.
    #[must_use]
    pub const fn is_cheque(&self) -> bool {
        matches!(self, Self::EuroCheque)
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
