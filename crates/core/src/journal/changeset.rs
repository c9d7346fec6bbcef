//! Units of atomic persistence.

use serde::{Deserialize, Serialize};

use super::entry::JournalEntry;
use super::event::MovementEvent;
use crate::account::Account;
use crate::asset::Asset;
use crate::disposal::DisposalRecord;
use crate::lot::{AcquisitionLot, LotReduction};

/// Everything one event produces, committed all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// The generated entry.
    pub entry: JournalEntry,
    /// Lots created by the event. Sequences are assigned on commit.
    pub new_lots: Vec<AcquisitionLot>,
    /// Reductions of existing lots.
    pub lot_reductions: Vec<LotReduction>,
    /// Disposal records.
    pub disposals: Vec<DisposalRecord>,
    /// The event, appended to the tenant's event log.
    pub event: MovementEvent,
    /// Assets defined by first use. An asset stored meanwhile wins.
    pub new_assets: Vec<Asset>,
    /// System accounts the entry's lines point at that do not exist yet.
    pub new_accounts: Vec<Account>,
}

/// Result of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A new entry was generated and committed.
    Created(JournalEntry),
    /// The source event was already booked; nothing changed.
    Existing(JournalEntry),
}

impl GenerationOutcome {
    /// The entry, regardless of outcome.
    #[must_use]
    pub fn entry(&self) -> &JournalEntry {
        match self {
            Self::Created(entry) | Self::Existing(entry) => entry,
        }
    }

    /// Consumes the outcome.
    #[must_use]
    pub fn into_entry(self) -> JournalEntry {
        match self {
            Self::Created(entry) | Self::Existing(entry) => entry,
        }
    }

    /// Returns true if this call created the entry.
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
