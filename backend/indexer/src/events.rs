//! Canonical event types emitted by the crowdfund ledger contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfund_ledger/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the ledger contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new project was opened (`created` topic).
    ProjectCreated,
    /// A contributor pledged funds (`funded` topic).
    ContributionMade,
    /// The beneficiary cancelled the project (`archived` topic).
    ProjectArchived,
    /// The beneficiary collected a funded project (`withdrawn` topic).
    FundsWithdrawn,
    /// A contributor reclaimed their stake (`refunded` topic).
    ContributionRefunded,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::ProjectCreated,
            "funded" => Self::ContributionMade,
            "archived" => Self::ProjectArchived,
            "withdrawn" => Self::FundsWithdrawn,
            "refunded" => Self::ContributionRefunded,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectCreated => "project_created",
            Self::ContributionMade => "contribution_made",
            Self::ProjectArchived => "project_archived",
            Self::FundsWithdrawn => "funds_withdrawn",
            Self::ContributionRefunded => "contribution_refunded",
            Self::Unknown => "unknown",
        }
    }

    /// Payload keys that may hold the acting address, in lookup order.
    pub(crate) fn actor_keys(&self) -> &'static [&'static str] {
        match self {
            Self::ProjectCreated => &["creator", "beneficiary"],
            Self::ContributionMade | Self::ContributionRefunded => &["contributor"],
            Self::ProjectArchived | Self::FundsWithdrawn => &["beneficiary"],
            Self::Unknown => &[],
        }
    }

    /// Payload keys that may hold the amount, in lookup order.
    pub(crate) fn amount_keys(&self) -> &'static [&'static str] {
        match self {
            Self::ProjectCreated => &["funding_goal"],
            Self::ContributionMade | Self::FundsWithdrawn | Self::ContributionRefunded => {
                &["amount"]
            }
            Self::ProjectArchived | Self::Unknown => &[],
        }
    }
}

/// A fully decoded ledger event, ready to be stored in the database.
///
/// Amounts are kept as decimal strings: the contract uses `i128`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
