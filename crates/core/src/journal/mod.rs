//! Automated journal entries.
//!
//! Every inbound [`MovementEvent`] becomes exactly one balanced
//! [`JournalEntry`]. Each movement kind has its own recipe; the generator
//! binds recipe lines to accounts, checks the balance and commits the
//! entry together with its lot changes as one [`ChangeSet`].

pub mod changeset;
pub mod entry;
pub mod error;
pub mod event;
pub mod recipe;
pub mod service;

#[cfg(test)]
mod recipe_props;

pub use changeset::{ChangeSet, GenerationOutcome};
pub use entry::{EntryStatus, JournalEntry, JournalLine};
pub use error::JournalError;
pub use event::{AssetLeg, Fee, MovementEvent, MovementKind, RecordedEvent};
pub use recipe::{DraftLine, bind_lines, draft_lines, required_roles};
pub use service::JournalGenerator;
